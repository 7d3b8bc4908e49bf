//! Control-point gestures: corner scale, edge resize, rotate, line endpoints.
//!
//! Each gesture snapshots the layer on press and recomputes from that snapshot
//! on every move, so dropped moves never accumulate error. The control-state
//! token is held from press to release; the release records one undo step.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use tracing::{debug, warn};

use crate::consts::MIN_LAYER_SIZE;
use crate::control::{self, Compass, ControlPointKind, LineEnd, ResizeAxis, Size};
use crate::doc::{Layer, StylePatch, Styles};
use crate::geometry::{self, Point};
use crate::hit;
use crate::input::PointerEvent;
use crate::snap::{self, LayerEdges};
use crate::store::{ControlKind, ControllerId, Editor, LayerPath};

/// Which handle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Corner scaler: uniform scale about the opposite corner.
    Scale(Compass),
    /// Edge resizer: one axis, opposite edge fixed.
    Resize(Compass),
    Rotate,
    LineEnd(LineEnd),
}

impl Handle {
    /// Handle for a control point.
    #[must_use]
    pub fn from_control(kind: ControlPointKind, compass: Compass) -> Self {
        match kind {
            ControlPointKind::Scaler => Self::Scale(compass),
            ControlPointKind::Resizer => Self::Resize(compass),
            ControlPointKind::Rotater => Self::Rotate,
            ControlPointKind::LineMover(end) => Self::LineEnd(end),
        }
    }

    fn control_kind(self) -> ControlKind {
        match self {
            Self::Scale(_) | Self::Resize(_) => ControlKind::Scale,
            Self::Rotate => ControlKind::Rotate,
            Self::LineEnd(_) => ControlKind::LineMove,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandleGesture {
    id: ControllerId,
    path: LayerPath,
    handle: Handle,
    pointer_id: i32,
    /// Pointer position at press, in the layer's parent space.
    start_pointer: Point,
    start: Layer,
    changed: bool,
}

/// Pointer position in the parent space of the layer at `path`: page units
/// for a page-level layer, the group's local units for a child.
fn pointer_in_parent(editor: &Editor, path: LayerPath, screen: Point) -> Point {
    let page_pt = editor.viewport(path.page).screen_to_page(screen);
    match path.sub {
        Some(_) => editor.layer(path.primary()).map_or(page_pt, |parent| hit::to_local(parent.styles(), page_pt)),
        None => page_pt,
    }
}

/// Edge a resize from `p` (parent space) should drive. Keeps `edge` unless the
/// press sits clearly on another edge the layer offers.
fn resize_edge_at(layer: &Layer, edge: Compass, p: Point) -> Compass {
    let s = layer.styles();
    let c = s.center();
    let local = geometry::rotated_point(-s.rotate, c, p);
    let nearest = match control::dir_handler(local, &s.rect()) {
        ResizeAxis::Horizontal if local.x >= c.x => Compass::E,
        ResizeAxis::Horizontal => Compass::W,
        ResizeAxis::Vertical if local.y >= c.y => Compass::S,
        ResizeAxis::Vertical => Compass::N,
    };
    if nearest != edge && control::resizer_compasses(layer).contains(&nearest) {
        debug!(?edge, ?nearest, "resize edge taken from press position");
        nearest
    } else {
        edge
    }
}

impl HandleGesture {
    /// Press on a control point. Returns `None` when the layer is missing,
    /// locked, or the control-state token is owned elsewhere.
    pub fn begin(editor: &mut Editor, path: LayerPath, handle: Handle, event: &PointerEvent) -> Option<Self> {
        if editor.copied_format().is_some() {
            editor.apply_copied_format(path);
        }
        let Some(layer) = editor.layer(path) else {
            warn!(?path, "gesture on missing layer");
            return None;
        };
        if layer.is_locked() {
            return None;
        }
        let start = layer.clone();
        let start_pointer = pointer_in_parent(editor, path, event.position);
        let handle = match handle {
            Handle::Resize(edge) => Handle::Resize(resize_edge_at(&start, edge, start_pointer)),
            other => other,
        };
        let id = editor.next_controller_id();
        if !editor.claim_control(handle.control_kind(), id, path) {
            return None;
        }
        debug!(?path, ?handle, pointer_id = event.pointer_id, "handle gesture started");
        Some(Self {
            id,
            path,
            handle,
            pointer_id: event.pointer_id,
            start_pointer,
            start,
            changed: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    #[must_use]
    pub fn pointer_id(&self) -> i32 {
        self.pointer_id
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[must_use]
    pub fn path(&self) -> LayerPath {
        self.path
    }

    /// Styles the layer had when the gesture started.
    #[must_use]
    pub fn start_styles(&self) -> &Styles {
        self.start.styles()
    }

    /// Apply a pointer move. Returns `false` when the event is not for this
    /// gesture or the gesture lost the token.
    pub fn update(&mut self, editor: &mut Editor, event: &PointerEvent) -> bool {
        if event.pointer_id != self.pointer_id || editor.control_state().id != Some(self.id) {
            return false;
        }
        let p = pointer_in_parent(editor, self.path, event.position);
        let applied = match self.handle {
            Handle::Scale(corner) => self.scale(editor, corner, p),
            Handle::Resize(edge) => self.resize(editor, edge, p),
            Handle::Rotate => self.rotate(editor, p, event.modifiers.shift),
            Handle::LineEnd(end) => self.move_endpoint(editor, end, p),
        };
        self.changed |= applied;
        applied
    }

    /// Release: give up the token and record a step if anything changed.
    pub fn end(self, editor: &mut Editor) -> bool {
        editor.release_control(self.id);
        if self.changed {
            editor.record_step();
        }
        debug!(path = ?self.path, changed = self.changed, "handle gesture ended");
        self.changed
    }

    /// Abort: restore the layer as it was at press.
    pub fn cancel(self, editor: &mut Editor) {
        editor.replace_layer(self.path, self.start);
        editor.release_control(self.id);
        debug!(path = ?self.path, "handle gesture cancelled");
    }

    // --- Scale ---

    fn scale(&self, editor: &mut Editor, corner: Compass, p: Point) -> bool {
        let s = self.start.styles();
        if s.width <= 0.0 || s.height <= 0.0 {
            return false;
        }
        let rect = s.rect();
        let c = s.center();
        let fixed = geometry::rotated_point(s.rotate, c, opposite(corner).anchor_on(&rect));
        let moving = geometry::rotated_point(s.rotate, c, corner.anchor_on(&rect));
        let diag = moving - fixed;
        let len_sq = diag.x * diag.x + diag.y * diag.y;
        let along = p - fixed;
        let min_ratio = (MIN_LAYER_SIZE / s.width).max(MIN_LAYER_SIZE / s.height);
        let ratio = ((along.x * diag.x + along.y * diag.y) / len_sq).max(min_ratio);
        let width = s.width * ratio;
        let height = s.height * ratio;
        let center = Point::new(fixed.x + (c.x - fixed.x) * ratio, fixed.y + (c.y - fixed.y) * ratio);
        let patch = StylePatch {
            x: Some(center.x - width / 2.0),
            y: Some(center.y - height / 2.0),
            width: Some(width),
            height: Some(height),
            scale: Some(s.scale * ratio),
            ..StylePatch::default()
        };
        if !editor.update_layer_styles(self.path, &patch) {
            return false;
        }
        if s.rotate == 0.0 {
            snap::calc_scale_snap(editor, self.path, corner);
        }
        true
    }

    // --- Resize ---

    fn resize(&self, editor: &mut Editor, edge: Compass, p: Point) -> bool {
        let s = self.start.styles();
        let rect = s.rect();
        let c = s.center();
        let fixed = geometry::rotated_point(s.rotate, c, opposite(edge).anchor_on(&rect));
        let (dx, dy) = edge.direction();
        let dir = geometry::rotated_point(s.rotate, Point::default(), Point::new(f64::from(dx), f64::from(dy)));
        let along = p - fixed;
        let length = (along.x * dir.x + along.y * dir.y).max(MIN_LAYER_SIZE);
        let horizontal = dx != 0;
        let (width, height) = if horizontal { (length, s.height) } else { (s.width, length) };

        let mut next = self.start.clone();
        if matches!(next, Layer::Group(_) | Layer::Tmp(_)) {
            return false;
        }
        let (width, height) = if let Layer::Shape(shape) = &mut next {
            let init = Size { width: s.init_width, height: s.init_height };
            let resolved = control::resize_shape_handler(shape, s.scale, init, width, height);
            *shape = control::apply_shape_resize(shape, &resolved);
            (resolved.width, resolved.height)
        } else {
            let scale = if s.scale > 0.0 { s.scale } else { 1.0 };
            next.patch_styles(&StylePatch {
                width: Some(width),
                height: Some(height),
                init_width: Some(width / scale),
                init_height: Some(height / scale),
                ..StylePatch::default()
            });
            (width, height)
        };
        let half = if horizontal { width / 2.0 } else { height / 2.0 };
        let center = Point::new(fixed.x + dir.x * half, fixed.y + dir.y * half);
        next.patch_styles(&StylePatch::position(center.x - width / 2.0, center.y - height / 2.0));
        editor.replace_layer(self.path, next)
    }

    // --- Rotate ---

    fn rotate(&self, editor: &mut Editor, p: Point, fine: bool) -> bool {
        let s = self.start.styles();
        let c = s.center();
        let swept = geometry::angle_of(c, p) - geometry::angle_of(c, self.start_pointer);
        let angle = geometry::normalize_degrees(s.rotate + swept);
        let step = if fine { editor.config.fine_rotate_snap_deg } else { editor.config.rotate_snap_deg };
        let angle =
            snap::closest_snap_angle(angle, step, editor.config.rotate_snap_tolerance_deg).unwrap_or(angle);
        editor.update_layer_styles(self.path, &StylePatch::rotation(angle))
    }

    // --- Line endpoints ---

    fn move_endpoint(&self, editor: &mut Editor, end: LineEnd, p: Point) -> bool {
        let Layer::Shape(shape) = &self.start else {
            return false;
        };
        let target = match (self.path.sub, editor.page(self.path.page)) {
            (None, Some(page)) => {
                let threshold = snap::snap_threshold(editor.config.guideline_offset, &editor.viewport(self.path.page));
                let targets = snap::snapline_pos(page, &[self.path.layer]);
                let edges = LayerEdges { v: vec![p.x], h: vec![p.y] };
                p + snap::closest_snaplines(&targets, &edges, threshold).offset()
            }
            _ => p,
        };
        let Some(next) = control::move_line_endpoint(shape, end, target) else {
            return false;
        };
        editor.replace_layer(self.path, Layer::Shape(next))
    }
}

fn opposite(compass: Compass) -> Compass {
    Compass::ALL[(compass.index() + 4) % 8]
}
