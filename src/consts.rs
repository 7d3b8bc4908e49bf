//! Shared numeric constants for the design canvas.

// ── Snapping ────────────────────────────────────────────────────

/// Snap distance in screen pixels. Divided by the page zoom ratio before use.
pub const GUIDELINE_OFFSET: f64 = 5.0;

/// Rotation snaps to multiples of this angle during a free rotate.
pub const ROTATE_SNAP_DEG: f64 = 90.0;

/// Rotation snap step while Shift is held.
pub const FINE_ROTATE_SNAP_DEG: f64 = 15.0;

/// A rotation snaps only when it is within this many degrees of a step.
pub const ROTATE_SNAP_TOLERANCE_DEG: f64 = 5.0;

// ── Pointer ─────────────────────────────────────────────────────

/// Total pointer displacement (page units) below which a drag is a click.
pub const CLICK_THRESHOLD: f64 = 1.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Smallest allowed `v_size + p_diff` on a patch-diff shape axis.
pub const MIN_PATCH_SIZE: f64 = 30.0;

/// Smallest width or height a scale gesture may produce, in page units.
pub const MIN_LAYER_SIZE: f64 = 1.0;

// ── Control points ──────────────────────────────────────────────

/// Side of a corner scaler / edge resizer square, in screen pixels.
pub const CONTROL_POINT_SIZE_PX: f64 = 12.0;

/// Distance from a corner to its rotater, in screen pixels.
pub const ROTATER_OFFSET_PX: f64 = 20.0;

/// Number of precomputed rotated cursor assets.
pub const CURSOR_STEPS: usize = 8;
