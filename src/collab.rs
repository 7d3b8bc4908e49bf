//! Collaborator interfaces the engine calls out to.
//!
//! The engine never renders, edits text, or keeps undo history itself. It
//! reports through these traits, which the host implements per platform and
//! injects into [`crate::store::Editor`]. The `Noop*` implementations are the
//! defaults for headless use.

#[cfg(test)]
#[path = "collab_test.rs"]
mod collab_test;

use serde::Serialize;

use crate::doc::{LayerId, LayerKind};
use crate::geometry::Point;

/// Side panel tabs the engine can ask the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelTab {
    Text,
    Photo,
    Crop,
    Shape,
}

impl PanelTab {
    /// Panel that edits a freshly selected layer of `kind`, if it has one.
    #[must_use]
    pub fn for_kind(kind: LayerKind) -> Option<Self> {
        match kind {
            LayerKind::Text => Some(Self::Text),
            LayerKind::Image | LayerKind::Frame => Some(Self::Photo),
            LayerKind::Shape => Some(Self::Shape),
            LayerKind::Group | LayerKind::Tmp => None,
        }
    }
}

/// UI notifications published by the engine. Delivery is up to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum BusEvent {
    /// Switch the side panel to a tab.
    SwitchPanel { tab: PanelTab },
    /// Close the color picker if open.
    CloseColorPanel,
    /// A layer was dragged off the page and removed.
    LayerDropped { id: LayerId },
    /// A layer was moved to another page by drag and drop.
    LayerMovedToPage { id: LayerId, page_index: usize },
}

/// Publish / subscribe channel for UI-level notifications.
pub trait EventBus {
    fn emit(&mut self, event: BusEvent);
}

/// Where to put the caret when a text layer enters edit mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Caret {
    /// Where the click landed, in the layer's own unscaled, unrotated
    /// space. The text editor owns the layout and resolves the offset.
    At(Point),
    End,
}

/// Which text layer (or text child of a group) receives focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTarget {
    pub page_index: usize,
    pub layer_index: usize,
    pub sub_index: Option<usize>,
}

/// Rich-text editing surface.
pub trait TextEditor {
    /// Focus the target and place the caret.
    fn focus(&mut self, target: TextTarget, caret: Caret);
    /// Select every character of the target.
    fn select_all(&mut self, target: TextTarget);
}

/// Undo checkpoint recorder.
pub trait StepsRecorder {
    /// Push a checkpoint for a committed change.
    fn record(&mut self);
    /// Push a checkpoint once pending asynchronous work settles.
    fn async_record(&mut self);
}

#[derive(Debug, Default)]
pub struct NoopBus;

impl EventBus for NoopBus {
    fn emit(&mut self, event: BusEvent) {
        tracing::trace!(?event, "bus event");
    }
}

#[derive(Debug, Default)]
pub struct NoopTextEditor;

impl TextEditor for NoopTextEditor {
    fn focus(&mut self, target: TextTarget, caret: Caret) {
        tracing::trace!(?target, ?caret, "text focus");
    }

    fn select_all(&mut self, target: TextTarget) {
        tracing::trace!(?target, "text select all");
    }
}

#[derive(Debug, Default)]
pub struct NoopSteps;

impl StepsRecorder for NoopSteps {
    fn record(&mut self) {
        tracing::trace!("step recorded");
    }

    fn async_record(&mut self) {
        tracing::trace!("async step recorded");
    }
}

/// The injected collaborator set.
pub struct Collaborators {
    pub bus: Box<dyn EventBus>,
    pub text: Box<dyn TextEditor>,
    pub steps: Box<dyn StepsRecorder>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self { bus: Box::new(NoopBus), text: Box::new(NoopTextEditor), steps: Box::new(NoopSteps) }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
