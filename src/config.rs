//! Engine tunables, with optional environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use crate::consts::{
    CLICK_THRESHOLD, FINE_ROTATE_SNAP_DEG, GUIDELINE_OFFSET, ROTATE_SNAP_DEG, ROTATE_SNAP_TOLERANCE_DEG,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Snap distance in screen pixels.
    pub guideline_offset: f64,
    /// Displacement in page units below which a drag counts as a click.
    pub click_threshold: f64,
    pub rotate_snap_deg: f64,
    pub fine_rotate_snap_deg: f64,
    pub rotate_snap_tolerance_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            guideline_offset: GUIDELINE_OFFSET,
            click_threshold: CLICK_THRESHOLD,
            rotate_snap_deg: ROTATE_SNAP_DEG,
            fine_rotate_snap_deg: FINE_ROTATE_SNAP_DEG,
            rotate_snap_tolerance_deg: ROTATE_SNAP_TOLERANCE_DEG,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `CANVAS_GUIDELINE_OFFSET`: default 5
    /// - `CANVAS_CLICK_THRESHOLD`: default 1
    /// - `CANVAS_ROTATE_SNAP_DEG`: default 90
    /// - `CANVAS_FINE_ROTATE_SNAP_DEG`: default 15
    /// - `CANVAS_ROTATE_SNAP_TOLERANCE_DEG`: default 5
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env_value(key, std::env::var(key)))
    }

    /// Build config from an arbitrary key lookup. Unparseable or non-positive
    /// values keep the default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let get = |key: &str, default: f64| -> f64 {
            match lookup(key).map(|raw| raw.trim().parse::<f64>()) {
                Some(Ok(v)) if v.is_finite() && v > 0.0 => v,
                Some(_) => {
                    tracing::warn!(%key, "ignoring invalid value");
                    default
                }
                None => default,
            }
        };
        Self {
            guideline_offset: get("CANVAS_GUIDELINE_OFFSET", d.guideline_offset),
            click_threshold: get("CANVAS_CLICK_THRESHOLD", d.click_threshold),
            rotate_snap_deg: get("CANVAS_ROTATE_SNAP_DEG", d.rotate_snap_deg),
            fine_rotate_snap_deg: get("CANVAS_FINE_ROTATE_SNAP_DEG", d.fine_rotate_snap_deg),
            rotate_snap_tolerance_deg: get("CANVAS_ROTATE_SNAP_TOLERANCE_DEG", d.rotate_snap_tolerance_deg),
        }
    }
}

/// Value of an environment lookup. Unset is `None`; a non-Unicode value is
/// logged and treated as unset.
fn env_value(key: &str, value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(v) => Some(v),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            tracing::warn!(%key, ?raw, "ignoring non-unicode value");
            None
        }
    }
}
