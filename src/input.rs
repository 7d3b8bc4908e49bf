//! Input model: pointer events, modifier keys, and the pointer tracking set.
//!
//! The host adapter translates whatever the platform delivers (DOM pointer
//! events, touch lists, native input) into [`PointerEvent`]s. Everything past
//! this module works only against that abstraction.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Shift, Ctrl or Meta: the keys that toggle multi-selection.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// A single pointer event in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: i32,
    /// Screen position in CSS pixels.
    pub position: Point,
    #[serde(default)]
    pub button: Button,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// First contact of a new gesture (the first finger, or any mouse press).
    #[serde(default = "default_primary")]
    pub is_primary: bool,
    #[serde(default)]
    pub kind: PointerKind,
}

fn default_primary() -> bool {
    true
}

impl PointerEvent {
    /// A primary mouse event with no modifiers.
    #[must_use]
    pub fn mouse(pointer_id: i32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            position: Point::new(x, y),
            button: Button::Primary,
            modifiers: Modifiers::default(),
            is_primary: true,
            kind: PointerKind::Mouse,
        }
    }

    /// A touch event. `is_primary` marks the first finger of a gesture.
    #[must_use]
    pub fn touch(pointer_id: i32, x: f64, y: f64, is_primary: bool) -> Self {
        Self { is_primary, kind: PointerKind::Touch, ..Self::mouse(pointer_id, x, y) }
    }

    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    #[must_use]
    pub fn at(self, x: f64, y: f64) -> Self {
        Self { position: Point::new(x, y), ..self }
    }
}

/// Currently pressed pointers, in arrival order.
///
/// A primary pointer-down starts a new gesture and forgets everything tracked
/// before it, so a lost `pointerup` can never leave a ghost finger behind.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pointers: Vec<PointerEvent>,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer-down.
    pub fn add(&mut self, event: PointerEvent) {
        if event.is_primary {
            self.pointers.clear();
        }
        if let Some(existing) = self.pointers.iter_mut().find(|p| p.pointer_id == event.pointer_id) {
            *existing = event;
        } else {
            self.pointers.push(event);
        }
    }

    /// Refresh the stored position of a tracked pointer.
    pub fn update(&mut self, event: PointerEvent) {
        if let Some(existing) = self.pointers.iter_mut().find(|p| p.pointer_id == event.pointer_id) {
            *existing = event;
        }
    }

    /// Forget a pointer on pointer-up / cancel.
    pub fn remove(&mut self, pointer_id: i32) {
        self.pointers.retain(|p| p.pointer_id != pointer_id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// More than one pointer is down: the gesture belongs to pinch-zoom.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.pointers.len() > 1
    }

    #[must_use]
    pub fn pointers(&self) -> &[PointerEvent] {
        &self.pointers
    }
}
