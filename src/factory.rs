//! Layer factory and design JSON import / export.
//!
//! Builders produce layers with consistent init sizes and fresh ids. Import
//! validates every `type` tag up front so an unknown or transient layer kind
//! is reported by name instead of as a generic serde error.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use serde_json::Value;
use uuid::Uuid;

use crate::control;
use crate::doc::{
    Design, FrameLayer, GroupLayer, ImageFormat, ImageLayer, Layer, LayerFlags, ScaleType, ShapeCategory, ShapeLayer,
    Styles, TextFormat, TextLayer,
};
use crate::geometry::Point;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("layer is missing a `type` tag")]
    MissingType,
    #[error("unknown layer type: {0}")]
    UnknownType(String),
    #[error("layer type `tmp` is transient and cannot be imported")]
    TransientType,
    #[error("malformed design json: {0}")]
    Malformed(#[from] serde_json::Error),
}

const PERSISTED_TYPES: [&str; 5] = ["shape", "text", "image", "group", "frame"];

// =============================================================================
// BUILDERS
// =============================================================================

#[must_use]
pub fn text_layer(text: &str, x: f64, y: f64, width: f64, height: f64) -> Layer {
    Layer::Text(TextLayer {
        id: Uuid::new_v4(),
        styles: Styles::with_rect(x, y, width, height),
        flags: LayerFlags::default(),
        text: text.to_owned(),
        format: TextFormat::default(),
    })
}

#[must_use]
pub fn image_layer(src: &str, x: f64, y: f64, width: f64, height: f64) -> Layer {
    Layer::Image(ImageLayer {
        id: Uuid::new_v4(),
        styles: Styles::with_rect(x, y, width, height),
        flags: LayerFlags::default(),
        src: src.to_owned(),
        format: ImageFormat::default(),
    })
}

/// A vector shape whose authored size equals its initial box.
#[must_use]
pub fn shape_layer(category: ShapeCategory, x: f64, y: f64, width: f64, height: f64) -> Layer {
    Layer::Shape(ShapeLayer {
        id: Uuid::new_v4(),
        styles: Styles::with_rect(x, y, width, height),
        flags: LayerFlags::default(),
        category,
        v_size: [width, height],
        p_diff: [0.0, 0.0],
        scale_type: ScaleType::Both,
        ratio: 1.0,
        point: None,
        stroke: 0.0,
        color: Vec::new(),
    })
}

/// A two-point line from `start` to `end` in page units.
#[must_use]
pub fn line_layer(start: Point, end: Point, stroke: f64) -> Layer {
    let (patch, point) = control::line_layout(start, end, stroke, 1.0);
    Layer::Shape(ShapeLayer {
        id: Uuid::new_v4(),
        styles: Styles::default().patched(&patch),
        flags: LayerFlags::default(),
        category: ShapeCategory::D,
        v_size: [0.0, 0.0],
        p_diff: [0.0, 0.0],
        scale_type: ScaleType::Both,
        ratio: 1.0,
        point: Some(point),
        stroke,
        color: vec!["#000000".to_owned()],
    })
}

/// A persisted group around page-level layers.
#[must_use]
pub fn group_layer(children: Vec<Layer>) -> Layer {
    Layer::Group(GroupLayer::wrap(children))
}

/// A frame with image clips positioned in the frame's local space.
#[must_use]
pub fn frame_layer(x: f64, y: f64, width: f64, height: f64, clips: Vec<Layer>) -> Layer {
    Layer::Frame(FrameLayer {
        id: Uuid::new_v4(),
        styles: Styles::with_rect(x, y, width, height),
        flags: LayerFlags::default(),
        clips,
        decoration: None,
    })
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

/// Build a layer from its JSON record.
///
/// # Errors
///
/// `MissingType` / `UnknownType` / `TransientType` when a `type` tag (here or
/// in any child) is absent or not a persisted kind, `Malformed` when the
/// record does not fit the kind.
pub fn new_layer(value: Value) -> Result<Layer, FactoryError> {
    check_layer_types(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn check_layer_types(value: &Value) -> Result<(), FactoryError> {
    let Some(kind) = value.get("type") else {
        return Err(FactoryError::MissingType);
    };
    let kind = kind.as_str().ok_or(FactoryError::MissingType)?;
    if kind == "tmp" {
        return Err(FactoryError::TransientType);
    }
    if !PERSISTED_TYPES.contains(&kind) {
        return Err(FactoryError::UnknownType(kind.to_owned()));
    }
    for key in ["layers", "clips"] {
        if let Some(Value::Array(children)) = value.get(key) {
            for child in children {
                check_layer_types(child)?;
            }
        }
    }
    Ok(())
}

/// Parse a design document.
///
/// # Errors
///
/// Any [`FactoryError`] raised by a page's layers.
pub fn design_from_json(json: &str) -> Result<Design, FactoryError> {
    let value: Value = serde_json::from_str(json)?;
    if let Some(Value::Array(pages)) = value.get("pages") {
        for page in pages {
            if let Some(Value::Array(layers)) = page.get("layers") {
                for layer in layers {
                    check_layer_types(layer)?;
                }
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Serialize a design document as pretty JSON.
///
/// # Errors
///
/// `Malformed` if serialization fails.
pub fn design_to_json(design: &Design) -> Result<String, FactoryError> {
    Ok(serde_json::to_string_pretty(design)?)
}
