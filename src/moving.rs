//! Per-layer move/select controller.
//!
//! DESIGN
//! ======
//! One `MoveController` is created for each press on a layer and bound to the
//! layer's path. It owns the pointer lifecycle from press to release:
//!
//! ```text
//! Idle --down--> Pressed --first movement--> Dragging --up--> Idle
//!                   |                            |
//!                   +--------up (click)----------+--> selection / text edit
//!                   +----pinch / cancel----------+--> Cancelled
//! ```
//!
//! Only the pointer that pressed may move or release it, and only while the
//! editor's control-state token names this controller. A pinch takes the
//! token away; the next move notices and restores the layer.
//!
//! Offsets are computed from the last pointer position the controller
//! processed, so moves dropped by the frame scheduler fold into the next one.
//! After a snap the remembered pointer is shifted by the snap offset, so the
//! unsnapped position keeps following the pointer and the snap is re-decided
//! on every tick instead of accumulating.

#[cfg(test)]
#[path = "moving_test.rs"]
mod moving_test;

use tracing::{debug, warn};

use crate::collab::{BusEvent, PanelTab};
use crate::doc::{Layer, LayerKind, StylePatch};
use crate::geometry::Point;
use crate::hit;
use crate::input::{Button, PointerEvent};
use crate::snap;
use crate::store::{ControlKind, ControllerId, Editor, LayerPath};
use crate::sub_controller;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pressed,
    Dragging,
    Cancelled,
}

/// Result of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownOutcome {
    /// The press was not for this controller (multi-touch, wrong button,
    /// token held elsewhere).
    Ignored,
    /// Modifier click toggled multi-selection membership.
    Toggled,
    /// A locked layer was selected; there is nothing to drag.
    Selected,
    /// The controller owns the pointer.
    Pressed,
}

/// Result of a pointer-move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Ignored,
    /// The layer was written at `position` (page units, after snapping).
    Moved { position: Point },
    /// A pinch took over; the layer is back at its start position.
    Cancelled,
}

/// Result of a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpOutcome {
    Ignored,
    /// Below the click threshold: selection changed, nothing moved.
    Clicked { editing: bool },
    /// Drag committed on the same page.
    Moved { delta: Point },
    /// Dropped onto another page.
    MovedToPage { page: usize, index: usize },
    /// Dropped outside every page.
    Deleted,
}

#[derive(Debug, Clone)]
pub struct MoveController {
    id: ControllerId,
    /// What was pressed; may address a child of a group or frame.
    target: LayerPath,
    /// The page-level layer that actually moves.
    path: LayerPath,
    phase: Phase,
    pointer_id: Option<i32>,
    start: Point,
    last: Point,
    initial_pos: Point,
    page_origin: Point,
    /// Alt was held on press: leave a copy behind once the drag starts.
    copy_on_drag: bool,
    /// Copies inserted below the moving layer.
    copies: usize,
}

impl MoveController {
    /// Bind a controller to the layer (or child) at `target`.
    #[must_use]
    pub fn new(editor: &mut Editor, target: LayerPath) -> Self {
        Self {
            id: editor.next_controller_id(),
            target,
            path: target.primary(),
            phase: Phase::Idle,
            pointer_id: None,
            start: Point::default(),
            last: Point::default(),
            initial_pos: Point::default(),
            page_origin: Point::default(),
            copy_on_drag: false,
            copies: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    #[must_use]
    pub fn path(&self) -> LayerPath {
        self.path
    }

    #[must_use]
    pub fn target(&self) -> LayerPath {
        self.target
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn pointer_id(&self) -> Option<i32> {
        self.pointer_id
    }

    /// Whether the controller still expects moves or a release.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Pressed | Phase::Dragging)
    }

    // --- Pointer down ---

    /// Handle the press that created this controller.
    ///
    /// `multi_touch` is true when more than one pointer is down; the press
    /// then belongs to pinch-zoom and is ignored.
    pub fn pointer_down(&mut self, editor: &mut Editor, event: &PointerEvent, multi_touch: bool) -> DownOutcome {
        if multi_touch || event.button != Button::Primary {
            return DownOutcome::Ignored;
        }
        if editor.copied_format().is_some() {
            editor.apply_copied_format(self.target);
        }
        let Some(layer) = editor.layer(self.path) else {
            warn!(path = ?self.path, "pointer_down: no such layer");
            return DownOutcome::Ignored;
        };
        let locked = layer.is_locked();
        let is_tmp = layer.kind() == LayerKind::Tmp;

        if event.modifiers.multi_select() && self.target.sub.is_none() {
            if is_tmp {
                let point = editor.viewport(self.path.page).screen_to_page(event.position);
                let member = editor.layer(self.path).and_then(|tmp| hit::hit_sub_layer(tmp, point));
                if let Some(sub) = member {
                    editor.drop_from_multi_select(sub);
                }
            } else {
                editor.toggle_multi_select(self.path.page, self.path.layer);
            }
            return DownOutcome::Toggled;
        }
        if !editor.claim_control(ControlKind::Move, self.id, self.path) {
            return DownOutcome::Ignored;
        }
        if locked {
            editor.release_control(self.id);
            editor.select_layer(self.path.page, self.path.layer);
            debug!(path = ?self.path, "locked layer selected");
            return DownOutcome::Selected;
        }
        let Some(layer) = editor.layer(self.path) else {
            editor.release_control(self.id);
            return DownOutcome::Ignored;
        };
        let s = layer.styles();
        self.initial_pos = Point::new(s.x, s.y);
        self.pointer_id = Some(event.pointer_id);
        self.start = event.position;
        self.last = event.position;
        self.page_origin = editor.viewport(self.path.page).origin;
        self.copy_on_drag = event.modifiers.alt && self.target.sub.is_none();
        self.phase = Phase::Pressed;
        debug!(path = ?self.path, pointer_id = event.pointer_id, "press captured");
        DownOutcome::Pressed
    }

    /// Alt-drag: a copy stays where the layer was and the original moves.
    fn leave_copy_behind(&mut self, editor: &mut Editor) {
        let Some(layer) = editor.layer(self.path) else {
            return;
        };
        let copies = match layer.duplicate() {
            Layer::Tmp(tmp) => tmp.unwrap_children(),
            copy => vec![copy],
        };
        let count = copies.len();
        for (offset, copy) in copies.into_iter().enumerate() {
            editor.insert_layer(self.path.page, self.path.layer + offset, copy);
        }
        self.path.layer += count;
        self.target.layer += count;
        self.copies = count;
        editor.claim_control(ControlKind::Move, self.id, self.path);
        debug!(path = ?self.path, count, "copy left behind");
    }

    /// Undo [`Self::leave_copy_behind`] when the drag does not commit.
    fn discard_copies(&mut self, editor: &mut Editor) {
        if self.copies == 0 {
            return;
        }
        let first = self.path.layer - self.copies;
        for _ in 0..self.copies {
            editor.delete_layer(self.path.page, first);
        }
        self.path.layer = first;
        self.target.layer -= self.copies;
        debug!(path = ?self.path, count = self.copies, "copy discarded");
        self.copies = 0;
    }

    // --- Pointer move ---

    pub fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) -> MoveOutcome {
        if !self.is_live() || self.pointer_id != Some(event.pointer_id) {
            return MoveOutcome::Ignored;
        }
        if editor.is_pinching() || editor.control_state().id != Some(self.id) {
            self.cancel(editor);
            return MoveOutcome::Cancelled;
        }
        let viewport = editor.viewport(self.path.page);
        let pan = viewport.origin - self.page_origin;
        let screen_delta = event.position - self.last - pan;
        let ratio = viewport.ratio();
        let offset = Point::new(screen_delta.x / ratio, screen_delta.y / ratio);
        if offset.x == 0.0 && offset.y == 0.0 {
            return MoveOutcome::Ignored;
        }
        self.page_origin = viewport.origin;

        if self.phase == Phase::Pressed {
            self.phase = Phase::Dragging;
            if self.copy_on_drag {
                self.leave_copy_behind(editor);
            }
            editor.update_layer_flags(self.path, |f| {
                f.dragging = true;
                f.moved = true;
                f.editing = false;
            });
            editor.set_moving(true);
            debug!(path = ?self.path, "drag started");
        }

        let Some(s) = editor.layer(self.path).map(|l| l.styles().clone()) else {
            warn!(path = ?self.path, "pointer_move: layer vanished");
            self.cancel(editor);
            return MoveOutcome::Cancelled;
        };
        editor.update_layer_styles(self.path, &StylePatch::position(s.x + offset.x, s.y + offset.y));
        let snapped = snap::calc_move_snap(editor, self.path);
        self.last = Point::new(event.position.x + snapped.x * ratio, event.position.y + snapped.y * ratio);

        let position = editor.layer(self.path).map_or(Point::default(), |l| {
            let s = l.styles();
            Point::new(s.x, s.y)
        });
        MoveOutcome::Moved { position }
    }

    // --- Pointer up ---

    pub fn pointer_up(&mut self, editor: &mut Editor, event: &PointerEvent) -> UpOutcome {
        if !self.is_live() || self.pointer_id != Some(event.pointer_id) {
            return UpOutcome::Ignored;
        }
        if event.position != self.last && self.pointer_move(editor, event) == MoveOutcome::Cancelled {
            return UpOutcome::Ignored;
        }
        let dragged = self.phase == Phase::Dragging;
        self.phase = Phase::Idle;
        editor.release_control(self.id);
        editor.set_moving(false);
        editor.update_layer_flags(self.path, |f| {
            f.dragging = false;
            f.moved = false;
        });

        let ratio = editor.viewport(self.path.page).ratio();
        let displacement = (event.position - self.start).length() / ratio;
        if displacement < editor.config.click_threshold {
            if dragged {
                self.restore(editor);
                self.discard_copies(editor);
            }
            return self.click(editor, event.position);
        }
        self.drop_at(editor, event.position)
    }

    fn click(&mut self, editor: &mut Editor, screen: Point) -> UpOutcome {
        let caret = editor.caret_at(self.target, screen);
        if self.target.sub.is_some() {
            let editing = sub_controller::click_sub_layer(editor, self.target, caret).is_some_and(|c| c.editing);
            return UpOutcome::Clicked { editing };
        }
        let Some(layer) = editor.layer(self.path) else {
            return UpOutcome::Ignored;
        };
        let kind = layer.kind();
        let was_shown = layer.flags().active && layer.flags().shown;
        let id = layer.id();
        editor.select_layer(self.path.page, self.path.layer);
        let Some(index) = editor.page(self.path.page).and_then(|p| p.index_of(id)) else {
            return UpOutcome::Ignored;
        };
        self.path.layer = index;
        sub_controller::exit_sub_selection(editor);

        let mut editing = false;
        match (kind, was_shown) {
            (LayerKind::Text, true) => editing = editor.begin_text_edit(self.path, caret),
            (LayerKind::Image, true) => editor.emit(BusEvent::SwitchPanel { tab: PanelTab::Crop }),
            (_, false) => {
                if let Some(tab) = PanelTab::for_kind(kind) {
                    editor.emit(BusEvent::SwitchPanel { tab });
                }
            }
            _ => {}
        }
        editor.update_layer_flags(self.path, |f| f.shown = true);
        debug!(path = ?self.path, editing, "layer clicked");
        UpOutcome::Clicked { editing }
    }

    /// Resolve where a drag ended: another page, off every page, or in place.
    fn drop_at(&mut self, editor: &mut Editor, screen: Point) -> UpOutcome {
        let Some(layer) = editor.layer(self.path) else {
            return UpOutcome::Ignored;
        };
        let id = layer.id();
        let is_tmp = layer.kind() == LayerKind::Tmp;
        let s = layer.styles();
        let current = Point::new(s.x, s.y);
        let bounds = layer.bounding();
        let on_page = editor.page(self.path.page).is_some_and(|p| bounds.intersects(&p.rect()));

        match editor.page_at(screen) {
            Some(dest) if dest != self.path.page => {
                let from = editor.viewport(self.path.page);
                let to = editor.viewport(dest);
                let position = to.screen_to_page(from.page_to_screen(current));
                let Some(index) = editor.move_layer_to_page(self.path.page, self.path.layer, dest, position) else {
                    return UpOutcome::Ignored;
                };
                editor.emit(BusEvent::LayerMovedToPage { id, page_index: dest });
                if is_tmp {
                    editor.deselect();
                } else {
                    editor.select_layer(dest, index);
                }
                editor.record_step();
                debug!(from = self.path.page, to = dest, index, "layer moved to page");
                self.path = LayerPath::new(dest, index);
                UpOutcome::MovedToPage { page: dest, index }
            }
            None if !on_page => {
                editor.delete_layer(self.path.page, self.path.layer);
                editor.emit(BusEvent::LayerDropped { id });
                editor.record_step();
                debug!(path = ?self.path, %id, "layer dropped off page");
                UpOutcome::Deleted
            }
            _ => {
                editor.select_layer(self.path.page, self.path.layer);
                if let Some(index) = editor.page(self.path.page).and_then(|p| p.index_of(id)) {
                    self.path.layer = index;
                }
                editor.record_step();
                UpOutcome::Moved { delta: current - self.initial_pos }
            }
        }
    }

    // --- Cancel ---

    /// Abort the gesture: put the layer back and give up the token.
    pub fn cancel(&mut self, editor: &mut Editor) {
        if !self.is_live() {
            return;
        }
        if self.phase == Phase::Dragging {
            self.restore(editor);
            self.discard_copies(editor);
        }
        editor.update_layer_flags(self.path, |f| {
            f.dragging = false;
            f.moved = false;
        });
        editor.set_moving(false);
        editor.release_control(self.id);
        self.phase = Phase::Cancelled;
        debug!(path = ?self.path, "drag cancelled");
    }

    fn restore(&self, editor: &mut Editor) {
        editor.update_layer_styles(self.path, &StylePatch::position(self.initial_pos.x, self.initial_pos.y));
    }
}
