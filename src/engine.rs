//! Event dispatch facade.
//!
//! `EngineCore` turns host input into controller calls: it tracks pointers,
//! routes a press to a [`MoveController`] or a [`HandleGesture`] by hit
//! testing, coalesces moves through the [`FrameScheduler`], and reports what
//! changed as a list of [`Action`]s for the host to render.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::align::{self, Alignment};
use crate::camera::PageViewport;
use crate::collab::{BusEvent, Collaborators};
use crate::config::EngineConfig;
use crate::doc::Design;
use crate::geometry::Point;
use crate::gesture::{Handle, HandleGesture};
use crate::hit::{self, HitPart};
use crate::input::{PointerEvent, PointerTracker};
use crate::moving::{DownOutcome, MoveController, MoveOutcome, UpOutcome};
use crate::scheduler::FrameScheduler;
use crate::store::{ControllerId, Editor, LayerPath};
use crate::zindex::LayerOrder;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LayerSelected { page: usize, index: usize },
    SelectionCleared,
    SubLayerSelected { path: LayerPath },
    LayerMoved { path: LayerPath, position: Point },
    LayerUpdated { path: LayerPath },
    LayerDeleted { page: usize },
    LayerMovedToPage { page: usize, index: usize },
    EditTextRequested { path: LayerPath },
    LayerReordered { page: usize, index: usize },
    GestureCancelled,
    SetCursor(String),
}

/// The controller that currently owns the pointer lifecycle.
#[derive(Debug)]
enum Active {
    Move(MoveController),
    Handle(HandleGesture),
}

impl Active {
    fn id(&self) -> ControllerId {
        match self {
            Self::Move(c) => c.id(),
            Self::Handle(g) => g.id(),
        }
    }

    fn pointer_id(&self) -> Option<i32> {
        match self {
            Self::Move(c) => c.pointer_id(),
            Self::Handle(g) => Some(g.pointer_id()),
        }
    }
}

/// Core engine state: everything that doesn't depend on a rendering surface.
#[derive(Debug)]
pub struct EngineCore {
    pub editor: Editor,
    pub input: PointerTracker,
    scheduler: FrameScheduler<ControllerId, PointerEvent>,
    active: Option<Active>,
}

impl EngineCore {
    #[must_use]
    pub fn new(editor: Editor) -> Self {
        Self { editor, input: PointerTracker::new(), scheduler: FrameScheduler::new(), active: None }
    }

    #[must_use]
    pub fn from_design(design: Design, config: EngineConfig) -> Self {
        Self::new(Editor::with_config(design, config, Collaborators::default()))
    }

    // --- Viewport ---

    pub fn set_viewport(&mut self, page: usize, viewport: PageViewport) {
        self.editor.set_viewport(page, viewport);
    }

    // --- Queries ---

    /// Whether a controller currently owns the pointer.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Moves waiting for the next frame.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Resize / rotate cursor for the selected layer's control point under
    /// `screen`, if any.
    #[must_use]
    pub fn cursor_at(&self, screen: Point) -> Option<&'static str> {
        let path = self.editor.selected_path()?;
        let layer = self.editor.layer(path)?;
        let cp = hit::hit_control_point(layer, screen, &self.editor.viewport(path.page))?;
        Some(cp.cursor.css())
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, event: PointerEvent) -> Vec<Action> {
        self.input.add(event);
        if self.input.is_multi_touch() {
            return self.begin_pinch();
        }
        if self.active.is_some() {
            debug!(pointer_id = event.pointer_id, "press ignored while a gesture is active");
            return Vec::new();
        }
        // Handles may sit outside the page rect (rotaters always do).
        if let Some(actions) = self.press_selected_handle(&event) {
            return actions;
        }
        let Some(page_index) = self.editor.page_at(event.position) else {
            return self.clear_selection();
        };
        let viewport = self.editor.viewport(page_index);
        let selected = match self.editor.selected_path() {
            Some(p) if p.page == page_index => Some(p.layer),
            _ => None,
        };
        let Some(page) = self.editor.page(page_index) else {
            return Vec::new();
        };
        let Some(hit) = hit::hit_test(page, page_index, event.position, &viewport, selected) else {
            return self.clear_selection();
        };

        match hit.part {
            HitPart::Control(kind, compass) => {
                self.start_handle(LayerPath::new(hit.page, hit.layer), Handle::from_control(kind, compass), &event)
            }
            HitPart::Body | HitPart::SubLayer(_) => {
                let target = match hit.part {
                    HitPart::SubLayer(sub) => LayerPath::child(hit.page, hit.layer, sub),
                    _ => LayerPath::new(hit.page, hit.layer),
                };
                let mut controller = MoveController::new(&mut self.editor, target);
                match controller.pointer_down(&mut self.editor, &event, false) {
                    DownOutcome::Pressed => {
                        self.active = Some(Active::Move(controller));
                        Vec::new()
                    }
                    DownOutcome::Toggled | DownOutcome::Selected => self.selection_actions(),
                    DownOutcome::Ignored => Vec::new(),
                }
            }
        }
    }

    /// Press on a control point of the selected layer, wherever it lies on
    /// screen. `None` when no handle is under the pointer.
    fn press_selected_handle(&mut self, event: &PointerEvent) -> Option<Vec<Action>> {
        let path = self.editor.selected_path()?;
        let layer = self.editor.layer(path)?;
        let cp = hit::hit_control_point(layer, event.position, &self.editor.viewport(path.page))?;
        Some(self.start_handle(path, Handle::from_control(cp.kind, cp.compass), event))
    }

    fn start_handle(&mut self, path: LayerPath, handle: Handle, event: &PointerEvent) -> Vec<Action> {
        let Some(gesture) = HandleGesture::begin(&mut self.editor, path, handle, event) else {
            return Vec::new();
        };
        self.active = Some(Active::Handle(gesture));
        self.cursor_at(event.position).map(|c| vec![Action::SetCursor(c.to_owned())]).unwrap_or_default()
    }

    /// Queue a move for the next frame. Moves for a controller that already
    /// has one pending are dropped.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        self.input.update(event);
        match &self.active {
            Some(active) => {
                if active.pointer_id() == Some(event.pointer_id) {
                    self.scheduler.schedule(active.id(), event);
                }
                Vec::new()
            }
            None => self.cursor_at(event.position).map(|c| vec![Action::SetCursor(c.to_owned())]).unwrap_or_default(),
        }
    }

    /// Run the work coalesced since the last frame.
    pub fn on_frame(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for (id, event) in self.scheduler.flush() {
            if self.active.as_ref().is_none_or(|a| a.id() != id) {
                continue;
            }
            actions.extend(self.dispatch_move(&event));
        }
        actions
    }

    fn dispatch_move(&mut self, event: &PointerEvent) -> Vec<Action> {
        let actions = match &mut self.active {
            Some(Active::Move(controller)) => match controller.pointer_move(&mut self.editor, event) {
                MoveOutcome::Moved { position } => vec![Action::LayerMoved { path: controller.path(), position }],
                MoveOutcome::Cancelled => vec![Action::GestureCancelled],
                MoveOutcome::Ignored => Vec::new(),
            },
            Some(Active::Handle(gesture)) => {
                if gesture.update(&mut self.editor, event) {
                    vec![Action::LayerUpdated { path: gesture.path() }]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };
        if actions.contains(&Action::GestureCancelled) {
            self.active = None;
        }
        actions
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        self.input.remove(event.pointer_id);
        if self.editor.is_pinching() {
            if !self.input.is_multi_touch() {
                self.editor.end_pinch();
                debug!("pinch ended");
            }
            return Vec::new();
        }
        let mut actions = self.on_frame();
        let Some(active) = self.active.take() else {
            return actions;
        };
        match active {
            Active::Move(mut controller) => {
                let outcome = controller.pointer_up(&mut self.editor, &event);
                if outcome == UpOutcome::Ignored {
                    if controller.is_live() {
                        self.active = Some(Active::Move(controller));
                    } else {
                        actions.push(Action::GestureCancelled);
                    }
                    return actions;
                }
                actions.extend(self.up_actions(&controller, outcome));
            }
            Active::Handle(gesture) => {
                let path = gesture.path();
                if gesture.end(&mut self.editor) {
                    actions.push(Action::LayerUpdated { path });
                }
            }
        }
        actions
    }

    /// The host lost the pointer (e.g. `pointercancel`): abort its gesture.
    pub fn on_pointer_cancel(&mut self, pointer_id: i32) -> Vec<Action> {
        self.input.remove(pointer_id);
        self.cancel_active()
    }

    fn up_actions(&self, controller: &MoveController, outcome: UpOutcome) -> Vec<Action> {
        match outcome {
            UpOutcome::Clicked { editing } => {
                let mut actions = self.selection_actions();
                if editing {
                    actions.push(Action::EditTextRequested { path: controller.target() });
                }
                actions
            }
            UpOutcome::Moved { .. } => {
                let path = controller.path();
                let position = self.editor.layer(path).map_or(Point::default(), |l| {
                    let s = l.styles();
                    Point::new(s.x, s.y)
                });
                vec![Action::LayerMoved { path, position }]
            }
            UpOutcome::MovedToPage { page, index } => vec![Action::LayerMovedToPage { page, index }],
            UpOutcome::Deleted => vec![Action::LayerDeleted { page: controller.path().page }],
            UpOutcome::Ignored => Vec::new(),
        }
    }

    // --- Pinch ---

    /// A pinch-zoom takes over: any in-flight gesture is cancelled.
    pub fn begin_pinch(&mut self) -> Vec<Action> {
        self.editor.begin_pinch();
        let mut actions = self.cancel_active();
        if actions.is_empty() {
            actions.push(Action::GestureCancelled);
        }
        actions
    }

    pub fn end_pinch(&mut self) {
        self.editor.end_pinch();
    }

    fn cancel_active(&mut self) -> Vec<Action> {
        let Some(active) = self.active.take() else {
            return Vec::new();
        };
        self.scheduler.cancel(&active.id());
        match active {
            Active::Move(mut controller) => controller.cancel(&mut self.editor),
            Active::Handle(gesture) => gesture.cancel(&mut self.editor),
        }
        vec![Action::GestureCancelled]
    }

    // --- Selection ---

    fn clear_selection(&mut self) -> Vec<Action> {
        if self.editor.selected_path().is_none() {
            return Vec::new();
        }
        self.editor.deselect();
        self.editor.emit(BusEvent::CloseColorPanel);
        vec![Action::SelectionCleared]
    }

    fn selection_actions(&self) -> Vec<Action> {
        let Some(path) = self.editor.selected_path() else {
            return vec![Action::SelectionCleared];
        };
        let mut actions = vec![Action::LayerSelected { page: path.page, index: path.layer }];
        if let Some(sub) = self.editor.sub_selected().index {
            actions.push(Action::SubLayerSelected { path: LayerPath { sub: Some(sub), ..path } });
        }
        actions
    }

    // --- Commands ---

    /// Align the selection to its page, or a multi-selection's members to
    /// each other.
    pub fn align_selected(&mut self, alignment: Alignment) -> Vec<Action> {
        let Some(path) = self.editor.selected_path() else {
            debug!(?alignment, "align with no selection");
            return Vec::new();
        };
        let Some(page) = self.editor.page_mut(path.page) else {
            return Vec::new();
        };
        if !align::align_layer(page, path.layer, alignment) {
            return Vec::new();
        }
        self.editor.record_step();
        vec![Action::LayerUpdated { path }]
    }

    pub fn order_selected(&mut self, order: LayerOrder) -> Vec<Action> {
        let Some(path) = self.editor.selected_path() else {
            debug!(?order, "reorder with no selection");
            return Vec::new();
        };
        let Some(index) = self.editor.update_layer_order(path.page, path.layer, order) else {
            return Vec::new();
        };
        self.editor.record_step();
        vec![Action::LayerReordered { page: path.page, index }]
    }

    pub fn group_selected(&mut self) -> Vec<Action> {
        if self.editor.group_selection() { self.selection_actions() } else { Vec::new() }
    }

    pub fn ungroup_selected(&mut self) -> Vec<Action> {
        if self.editor.ungroup() { self.selection_actions() } else { Vec::new() }
    }

    /// Start editing the selected text layer (or sub-selected text child)
    /// with its whole content selected.
    pub fn edit_selected_text(&mut self) -> Vec<Action> {
        let Some(path) = self.editor.selected_path() else {
            return Vec::new();
        };
        let path = LayerPath { sub: self.editor.sub_selected().index, ..path };
        if self.editor.select_all_text(path) { vec![Action::EditTextRequested { path }] } else { Vec::new() }
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(path) = self.editor.selected_path() else {
            return Vec::new();
        };
        if self.editor.delete_layer(path.page, path.layer).is_none() {
            return Vec::new();
        }
        self.editor.record_step();
        vec![Action::LayerDeleted { page: path.page }]
    }
}
