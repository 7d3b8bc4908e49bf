//! Scripted input replay.
//!
//! A script is a JSON array of steps fed to an [`EngineCore`] in order. It is
//! how the `design-canvas replay` command reproduces an interaction headlessly.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use serde::Deserialize;
use tracing::debug;

use crate::align::Alignment;
use crate::camera::PageViewport;
use crate::engine::{Action, EngineCore};
use crate::geometry::Point;
use crate::input::PointerEvent;
use crate::zindex::LayerOrder;

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum ScriptStep {
    Viewport {
        page: usize,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        #[serde(default = "default_scale")]
        zoom: f64,
        #[serde(default = "default_scale")]
        content_scale: f64,
    },
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    Cancel { pointer_id: i32 },
    Frame,
    Pinch,
    EndPinch,
    Select { page: usize, index: usize },
    Deselect,
    Align { alignment: Alignment },
    Order { order: LayerOrder },
    Group,
    Ungroup,
    EditText,
    Delete,
}

/// Parse a script document.
///
/// # Errors
///
/// Returns the serde error when the script is not a valid step array.
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Run one step and return what it produced.
pub fn run_step(engine: &mut EngineCore, step: &ScriptStep) -> Vec<Action> {
    debug!(?step, "replay step");
    match step {
        ScriptStep::Viewport { page, x, y, zoom, content_scale } => {
            let viewport = PageViewport { origin: Point::new(*x, *y), zoom: *zoom, content_scale: *content_scale };
            engine.set_viewport(*page, viewport);
            Vec::new()
        }
        ScriptStep::Down(event) => engine.on_pointer_down(*event),
        ScriptStep::Move(event) => engine.on_pointer_move(*event),
        ScriptStep::Up(event) => engine.on_pointer_up(*event),
        ScriptStep::Cancel { pointer_id } => engine.on_pointer_cancel(*pointer_id),
        ScriptStep::Frame => engine.on_frame(),
        ScriptStep::Pinch => engine.begin_pinch(),
        ScriptStep::EndPinch => {
            engine.end_pinch();
            Vec::new()
        }
        ScriptStep::Select { page, index } => {
            engine.editor.select_layer(*page, *index);
            Vec::new()
        }
        ScriptStep::Deselect => {
            engine.editor.deselect();
            Vec::new()
        }
        ScriptStep::Align { alignment } => engine.align_selected(*alignment),
        ScriptStep::Order { order } => engine.order_selected(*order),
        ScriptStep::Group => engine.group_selected(),
        ScriptStep::Ungroup => engine.ungroup_selected(),
        ScriptStep::EditText => engine.edit_selected_text(),
        ScriptStep::Delete => engine.delete_selected(),
    }
}

/// Run every step in order.
pub fn run_script(engine: &mut EngineCore, steps: &[ScriptStep]) -> Vec<Action> {
    steps.iter().flat_map(|step| run_step(engine, step)).collect()
}
