//! Control-point geometry and shape resize policies.
//!
//! Control points are laid out in the layer's own (unrotated) frame, in screen
//! pixels: the host renders them inside the layer's rotated container, so only
//! the cursor needs to account for rotation.

#[cfg(test)]
#[path = "control_test.rs"]
mod control_test;

use tracing::warn;

use crate::camera::PageViewport;
use crate::consts::{CONTROL_POINT_SIZE_PX, CURSOR_STEPS, MIN_PATCH_SIZE, ROTATER_OFFSET_PX};
use crate::doc::{Layer, ShapeCategory, ShapeLayer, StylePatch, Styles};
use crate::geometry::{self, Point, Rect};

// =============================================================================
// COMPASS / CURSOR
// =============================================================================

/// Position of a control point around the layer box, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Compass {
    pub const ALL: [Compass; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];
    pub const CORNERS: [Compass; 4] = [Self::Nw, Self::Ne, Self::Se, Self::Sw];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::N => 0,
            Self::Ne => 1,
            Self::E => 2,
            Self::Se => 3,
            Self::S => 4,
            Self::Sw => 5,
            Self::W => 6,
            Self::Nw => 7,
        }
    }

    /// Unit step `(dx, dy)` pointing from the box center toward this position.
    #[must_use]
    pub fn direction(self) -> (i8, i8) {
        match self {
            Self::N => (0, -1),
            Self::Ne => (1, -1),
            Self::E => (1, 0),
            Self::Se => (1, 1),
            Self::S => (0, 1),
            Self::Sw => (-1, 1),
            Self::W => (-1, 0),
            Self::Nw => (-1, -1),
        }
    }

    /// Where this position sits on `rect`.
    #[must_use]
    pub fn anchor_on(self, rect: &Rect) -> Point {
        let (dx, dy) = self.direction();
        Point::new(
            rect.x + rect.width * (f64::from(dx) + 1.0) / 2.0,
            rect.y + rect.height * (f64::from(dy) + 1.0) / 2.0,
        )
    }
}

/// One of the eight precomputed rotated resize cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(pub usize);

impl Cursor {
    const CSS: [&'static str; CURSOR_STEPS] = [
        "ns-resize",
        "nesw-resize",
        "ew-resize",
        "nwse-resize",
        "ns-resize",
        "nesw-resize",
        "ew-resize",
        "nwse-resize",
    ];

    /// Cursor for a control point at `compass` on a layer rotated `rotate` degrees.
    #[must_use]
    pub fn for_point(compass: Compass, rotate: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (geometry::normalize_degrees(rotate) / 45.0).round() as usize;
        Self((compass.index() + steps) % CURSOR_STEPS)
    }

    #[must_use]
    pub fn css(self) -> &'static str {
        Self::CSS[self.0 % CURSOR_STEPS]
    }
}

// =============================================================================
// CONTROL POINTS
// =============================================================================

/// Which endpoint of a line shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnd {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPointKind {
    /// Corner handle: uniform scale.
    Scaler,
    /// Edge handle: stretches one axis.
    Resizer,
    /// Corner rotate handle.
    Rotater,
    /// Line endpoint handle.
    LineMover(LineEnd),
}

/// A renderable control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub kind: ControlPointKind,
    pub compass: Compass,
    /// Top-left of the handle in screen pixels, relative to the layer box's
    /// unrotated top-left.
    pub position: Point,
    pub size: f64,
    pub cursor: Cursor,
}

fn handle_at(kind: ControlPointKind, compass: Compass, center: Point, rotate: f64) -> ControlPoint {
    ControlPoint {
        kind,
        compass,
        position: Point::new(center.x - CONTROL_POINT_SIZE_PX / 2.0, center.y - CONTROL_POINT_SIZE_PX / 2.0),
        size: CONTROL_POINT_SIZE_PX,
        cursor: Cursor::for_point(compass, rotate),
    }
}

/// Edge resizers available for a layer.
pub(crate) fn resizer_compasses(layer: &Layer) -> &'static [Compass] {
    const ALL_EDGES: &[Compass] = &[Compass::N, Compass::E, Compass::S, Compass::W];
    const SIDES: &[Compass] = &[Compass::E, Compass::W];
    const TOP_BOTTOM: &[Compass] = &[Compass::N, Compass::S];
    match layer {
        Layer::Text(_) => SIDES,
        Layer::Image(_) | Layer::Frame(_) => ALL_EDGES,
        Layer::Shape(shape) => match shape.category {
            ShapeCategory::A | ShapeCategory::D => &[],
            ShapeCategory::B | ShapeCategory::E => ALL_EDGES,
            ShapeCategory::C | ShapeCategory::G => {
                match (shape.scale_type.width_adjustable(), shape.scale_type.height_adjustable()) {
                    (true, true) => ALL_EDGES,
                    (true, false) => SIDES,
                    (false, true) => TOP_BOTTOM,
                    (false, false) => &[],
                }
            }
        },
        Layer::Group(_) | Layer::Tmp(_) => &[],
    }
}

/// Control points for the active layer at the given viewport.
///
/// Locked layers get none. Line shapes get only their two endpoint movers.
#[must_use]
pub fn control_points(layer: &Layer, viewport: &PageViewport) -> Vec<ControlPoint> {
    if layer.is_locked() {
        return Vec::new();
    }
    let ratio = viewport.ratio();
    let s = layer.styles();
    if let Layer::Shape(shape) = layer {
        if let Some([x1, y1, x2, y2]) = shape.point {
            let k = s.scale * ratio;
            return vec![
                handle_at(ControlPointKind::LineMover(LineEnd::Start), Compass::W, Point::new(x1 * k, y1 * k), 0.0),
                handle_at(ControlPointKind::LineMover(LineEnd::End), Compass::E, Point::new(x2 * k, y2 * k), 0.0),
            ];
        }
    }
    let frame = Rect::new(0.0, 0.0, s.width * ratio, s.height * ratio);
    let mut points = Vec::with_capacity(12);
    for compass in Compass::CORNERS {
        points.push(handle_at(ControlPointKind::Scaler, compass, compass.anchor_on(&frame), s.rotate));
    }
    for &compass in resizer_compasses(layer) {
        points.push(handle_at(ControlPointKind::Resizer, compass, compass.anchor_on(&frame), s.rotate));
    }
    for compass in Compass::CORNERS {
        let (dx, dy) = compass.direction();
        let anchor = compass.anchor_on(&frame);
        let offset = ROTATER_OFFSET_PX / std::f64::consts::SQRT_2;
        let center = Point::new(anchor.x + f64::from(dx) * offset, anchor.y + f64::from(dy) * offset);
        points.push(handle_at(ControlPointKind::Rotater, compass, center, s.rotate));
    }
    points
}

/// Axis a drag from an ambiguous point should resize along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAxis {
    /// Closer to a vertical edge: resize width.
    Horizontal,
    /// Closer to a horizontal edge: resize height.
    Vertical,
}

/// Classify `point` by which pair of edges of `rect` it is relatively closer to.
///
/// Resize gestures use it to pick the edge when handles overlap on a small
/// layer and the hit handle does not match where the press landed.
#[must_use]
pub fn dir_handler(point: Point, rect: &Rect) -> ResizeAxis {
    let c = geometry::center(rect);
    let h = if rect.width > 0.0 { (point.x - c.x).abs() / rect.width } else { 0.0 };
    let v = if rect.height > 0.0 { (point.y - c.y).abs() / rect.height } else { 0.0 };
    if h >= v { ResizeAxis::Horizontal } else { ResizeAxis::Vertical }
}

/// Whether `point` (page coordinates) falls inside the layer's rotated box.
///
/// Tests `point` against the four directed edges of the rotated rectangle,
/// taken clockwise on screen. A point on the inner side of all four is inside.
#[must_use]
pub fn is_click_on_controller(point: Point, styles: &Styles) -> bool {
    let rect = styles.rect();
    let origin = geometry::center(&rect);
    let corners = rect.corners().map(|c| geometry::rotated_point(styles.rotate, origin, c));
    (0..4).all(|i| {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        (b.x - a.x) * (point.y - a.y) - (b.y - a.y) * (point.x - a.x) >= 0.0
    })
}

// =============================================================================
// SHAPE RESIZE
// =============================================================================

/// Size a shape had at `scale == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Outcome of a shape resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeResize {
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub p_diff: [f64; 2],
    pub init_size: Size,
}

/// Resolve a requested size for a shape according to its category.
///
/// Category A (and D, which is sized by its endpoints) cannot be resized: the
/// attempt is logged and the current size returned. B and E stretch each axis
/// independently. C and G grow their patch diff so decorations keep their
/// size; `v_size + p_diff` never drops below the minimum patch size.
#[must_use]
pub fn resize_shape_handler(shape: &ShapeLayer, scale: f64, init_size: Size, width: f64, height: f64) -> ShapeResize {
    let s = &shape.styles;
    let unchanged = ShapeResize {
        width: s.width,
        height: s.height,
        scale_x: s.scale_x,
        scale_y: s.scale_y,
        p_diff: shape.p_diff,
        init_size,
    };
    match shape.category {
        ShapeCategory::A | ShapeCategory::D => {
            warn!(id = %shape.id, category = ?shape.category, "resize attempted on non-resizable shape");
            unchanged
        }
        ShapeCategory::B | ShapeCategory::E => {
            if init_size.width <= 0.0 || init_size.height <= 0.0 {
                warn!(id = %shape.id, "resize with empty init size");
                return unchanged;
            }
            ShapeResize {
                width,
                height,
                scale_x: width / init_size.width,
                scale_y: height / init_size.height,
                p_diff: shape.p_diff,
                init_size,
            }
        }
        ShapeCategory::C | ShapeCategory::G => {
            if scale <= 0.0 || shape.ratio <= 0.0 {
                warn!(id = %shape.id, scale, ratio = shape.ratio, "resize with degenerate scale");
                return unchanged;
            }
            let [vw, vh] = shape.v_size;
            let mut p_diff = shape.p_diff;
            if shape.scale_type.width_adjustable() {
                p_diff[0] = (width * shape.ratio / scale - vw).max(MIN_PATCH_SIZE - vw);
            }
            if shape.scale_type.height_adjustable() {
                p_diff[1] = (height * shape.ratio / scale - vh).max(MIN_PATCH_SIZE - vh);
            }
            let width = (vw + p_diff[0]) * scale / shape.ratio;
            let height = (vh + p_diff[1]) * scale / shape.ratio;
            ShapeResize {
                width,
                height,
                scale_x: s.scale_x,
                scale_y: s.scale_y,
                p_diff,
                init_size: Size { width: width / scale, height: height / scale },
            }
        }
    }
}

/// Shape with a resize outcome applied.
#[must_use]
pub fn apply_shape_resize(shape: &ShapeLayer, resize: &ShapeResize) -> ShapeLayer {
    let mut next = shape.clone();
    next.p_diff = resize.p_diff;
    next.styles = shape.styles.patched(&StylePatch {
        width: Some(resize.width),
        height: Some(resize.height),
        scale_x: Some(resize.scale_x),
        scale_y: Some(resize.scale_y),
        init_width: Some(resize.init_size.width),
        init_height: Some(resize.init_size.height),
        ..StylePatch::default()
    });
    next
}

// =============================================================================
// LINES
// =============================================================================
//
// A line's box is the bounding box of its two endpoints padded by half the
// stroke on every side. `point` holds the endpoints in unscaled units relative
// to that box. Lines are never rotated; direction lives in the endpoints.

/// Quadrant of the line's direction from start to end, y-down:
/// 1 up-right, 2 up-left, 3 down-left, 4 down-right.
#[must_use]
pub fn line_quadrant(point: [f64; 4]) -> u8 {
    let [x1, y1, x2, y2] = point;
    match (x2 - x1 >= 0.0, y2 - y1 < 0.0) {
        (true, true) => 1,
        (false, true) => 2,
        (false, false) => 3,
        (true, false) => 4,
    }
}

/// Absolute position of a line's start point, read off the box corner it
/// sits at for its quadrant.
#[must_use]
pub fn abs_point_by_quadrant(styles: &Styles, stroke: f64, quadrant: u8) -> Point {
    let pad = stroke / 2.0 * styles.scale;
    let left = styles.x + pad;
    let right = styles.x + styles.width - pad;
    let top = styles.y + pad;
    let bottom = styles.y + styles.height - pad;
    match quadrant {
        1 => Point::new(left, bottom),
        2 => Point::new(right, bottom),
        3 => Point::new(right, top),
        _ => Point::new(left, top),
    }
}

/// Absolute position of the end point given the absolute start point.
#[must_use]
pub fn abs_point_with_respect_to_reference_point(reference: Point, point: [f64; 4], scale: f64) -> Point {
    let [x1, y1, x2, y2] = point;
    Point::new(reference.x + (x2 - x1) * scale, reference.y + (y2 - y1) * scale)
}

/// Absolute start and end points of a line shape.
#[must_use]
pub fn line_endpoints(shape: &ShapeLayer) -> Option<(Point, Point)> {
    let point = shape.point?;
    let start = abs_point_by_quadrant(&shape.styles, shape.stroke, line_quadrant(point));
    let end = abs_point_with_respect_to_reference_point(start, point, shape.styles.scale);
    Some((start, end))
}

/// Box and local endpoints for a line through absolute points `a` and `b`.
pub(crate) fn line_layout(a: Point, b: Point, stroke: f64, scale: f64) -> (StylePatch, [f64; 4]) {
    let pad = stroke / 2.0;
    let min_x = a.x.min(b.x);
    let min_y = a.y.min(b.y);
    let point = [
        (a.x - min_x) / scale + pad,
        (a.y - min_y) / scale + pad,
        (b.x - min_x) / scale + pad,
        (b.y - min_y) / scale + pad,
    ];
    let width = (b.x - a.x).abs() + stroke * scale;
    let height = (b.y - a.y).abs() + stroke * scale;
    let patch = StylePatch {
        x: Some(min_x - pad * scale),
        y: Some(min_y - pad * scale),
        width: Some(width),
        height: Some(height),
        init_width: Some(width / scale),
        init_height: Some(height / scale),
        ..StylePatch::default()
    };
    (patch, point)
}

/// New top-left that keeps the start point fixed when the stroke changes.
#[must_use]
pub fn translate_compensation_for_line(shape: &ShapeLayer, new_stroke: f64) -> Option<Point> {
    let (start, end) = line_endpoints(shape)?;
    let (patch, _) = line_layout(start, end, new_stroke, shape.styles.scale);
    Some(Point::new(patch.x?, patch.y?))
}

/// Line shape with a new stroke, its start point held in place.
#[must_use]
pub fn set_line_stroke(shape: &ShapeLayer, new_stroke: f64) -> Option<ShapeLayer> {
    let (start, end) = line_endpoints(shape)?;
    let (patch, point) = line_layout(start, end, new_stroke, shape.styles.scale);
    let mut next = shape.clone();
    next.stroke = new_stroke;
    next.point = Some(point);
    next.styles = shape.styles.patched(&patch);
    Some(next)
}

/// Line shape with one endpoint moved to `to` (page coordinates).
#[must_use]
pub fn move_line_endpoint(shape: &ShapeLayer, which: LineEnd, to: Point) -> Option<ShapeLayer> {
    let (start, end) = line_endpoints(shape)?;
    let (a, b) = match which {
        LineEnd::Start => (to, end),
        LineEnd::End => (start, to),
    };
    let (patch, point) = line_layout(a, b, shape.stroke, shape.styles.scale);
    let mut next = shape.clone();
    next.point = Some(point);
    next.styles = shape.styles.patched(&patch);
    Some(next)
}
