//! Snap engine.
//!
//! Recomputed from scratch on every drag tick: target lines come from the
//! page (edges, center, user guidelines) and from every other layer's rotated
//! bounding box; the active layer contributes its own left/center/right and
//! top/center/bottom edges (or, for a line, its endpoints and midpoint).
//!
//! Candidate order is page edges, guidelines, then sibling layers in array
//! order. When two targets are equally close, the first one found wins:
//! edges are scanned in order and, within an edge, targets in order; a later
//! candidate replaces the current best only when strictly closer.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use tracing::trace;

use crate::camera::PageViewport;
use crate::control::Compass;
use crate::doc::{Layer, Page, StylePatch};
use crate::geometry::{self, Point};
use crate::store::{Editor, LayerPath};

/// Axis of a snap line: `V` lines are vertical (constant x), `H` horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    V,
    H,
}

/// A matched snap: the target line and the offset that moves the edge onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapLine {
    pub pos: f64,
    pub offset: f64,
    pub orientation: Orientation,
}

/// Candidate target positions on each axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapTargets {
    pub v: Vec<f64>,
    pub h: Vec<f64>,
}

/// Edges of the active layer that may snap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerEdges {
    pub v: Vec<f64>,
    pub h: Vec<f64>,
}

/// Best match on each axis, independently.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClosestSnaps {
    pub v: Option<SnapLine>,
    pub h: Option<SnapLine>,
}

impl ClosestSnaps {
    /// Offset to apply to the layer; zero on an axis without a match.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.v.map_or(0.0, |s| s.offset), self.h.map_or(0.0, |s| s.offset))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.v.is_none() && self.h.is_none()
    }
}

/// Collect snap targets for a page, skipping the layers at `exclude`.
#[must_use]
pub fn snapline_pos(page: &Page, exclude: &[usize]) -> SnapTargets {
    let mut targets = SnapTargets {
        v: vec![0.0, page.width / 2.0, page.width],
        h: vec![0.0, page.height / 2.0, page.height],
    };
    targets.v.extend(page.guidelines.v.iter().copied());
    targets.h.extend(page.guidelines.h.iter().copied());
    for (i, layer) in page.layers.iter().enumerate() {
        if exclude.contains(&i) {
            continue;
        }
        let b = layer.bounding();
        targets.v.extend([b.x, b.x + b.width / 2.0, b.right()]);
        targets.h.extend([b.y, b.y + b.height / 2.0, b.bottom()]);
    }
    targets
}

/// Snappable edges of a page-level layer.
#[must_use]
pub fn layer_edges(layer: &Layer) -> LayerEdges {
    if let Layer::Shape(shape) = layer {
        if let Some([x1, y1, x2, y2]) = shape.point {
            let s = &shape.styles;
            let a = Point::new(s.x + x1 * s.scale, s.y + y1 * s.scale);
            let b = Point::new(s.x + x2 * s.scale, s.y + y2 * s.scale);
            let origin = s.center();
            let a = geometry::rotated_point(s.rotate, origin, a);
            let b = geometry::rotated_point(s.rotate, origin, b);
            return LayerEdges {
                v: vec![a.x, (a.x + b.x) / 2.0, b.x],
                h: vec![a.y, (a.y + b.y) / 2.0, b.y],
            };
        }
    }
    let b = layer.bounding();
    LayerEdges {
        v: vec![b.x, b.x + b.width / 2.0, b.right()],
        h: vec![b.y, b.y + b.height / 2.0, b.bottom()],
    }
}

fn closest_on_axis(targets: &[f64], edges: &[f64], threshold: f64, orientation: Orientation) -> Option<SnapLine> {
    let mut best: Option<SnapLine> = None;
    for &edge in edges {
        for &pos in targets {
            let offset = pos - edge;
            if offset.abs() > threshold {
                continue;
            }
            if best.is_none_or(|b| offset.abs() < b.offset.abs()) {
                best = Some(SnapLine { pos, offset, orientation });
            }
        }
    }
    best
}

/// For each axis, the single closest target within `threshold` of any edge.
#[must_use]
pub fn closest_snaplines(targets: &SnapTargets, edges: &LayerEdges, threshold: f64) -> ClosestSnaps {
    ClosestSnaps {
        v: closest_on_axis(&targets.v, &edges.v, threshold, Orientation::V),
        h: closest_on_axis(&targets.h, &edges.h, threshold, Orientation::H),
    }
}

/// Snap distance in page units for a screen-pixel offset at this viewport.
#[must_use]
pub fn snap_threshold(guideline_offset: f64, viewport: &PageViewport) -> f64 {
    viewport.screen_dist_to_page(guideline_offset)
}

/// Snap a page-level layer after a move and write the result.
///
/// Returns the offset actually applied so the caller can fold it into its
/// running pointer delta. Sub-layers never snap.
pub fn calc_move_snap(editor: &mut Editor, path: LayerPath) -> Point {
    if path.sub.is_some() {
        return Point::default();
    }
    let threshold = snap_threshold(editor.config.guideline_offset, &editor.viewport(path.page));
    let Some(page) = editor.page(path.page) else {
        return Point::default();
    };
    let Some(layer) = page.layers.get(path.layer) else {
        return Point::default();
    };
    let targets = snapline_pos(page, &[path.layer]);
    let snaps = closest_snaplines(&targets, &layer_edges(layer), threshold);
    let offset = snaps.offset();
    if offset.x == 0.0 && offset.y == 0.0 {
        return offset;
    }
    let s = layer.styles();
    let patch = StylePatch::position(s.x + offset.x, s.y + offset.y);
    trace!(?path, dx = offset.x, dy = offset.y, "move snapped");
    editor.update_layer_styles(path, &patch);
    offset
}

/// Snap a corner scale of a page-level layer and write the result.
///
/// Only the edges moved by `corner` are considered. The closer of the two axis
/// matches wins and the other dimension follows the aspect ratio, keeping the
/// opposite corner of the bounding box fixed. Returns the applied edge offset.
pub fn calc_scale_snap(editor: &mut Editor, path: LayerPath, corner: Compass) -> Point {
    if path.sub.is_some() {
        return Point::default();
    }
    let threshold = snap_threshold(editor.config.guideline_offset, &editor.viewport(path.page));
    let Some(page) = editor.page(path.page) else {
        return Point::default();
    };
    let Some(layer) = page.layers.get(path.layer) else {
        return Point::default();
    };
    let b = layer.bounding();
    if b.width <= 0.0 || b.height <= 0.0 {
        return Point::default();
    }
    let (dir_x, dir_y) = corner.direction();
    let moving_x = if dir_x < 0 { b.x } else { b.right() };
    let moving_y = if dir_y < 0 { b.y } else { b.bottom() };
    let targets = snapline_pos(page, &[path.layer]);
    let edges = LayerEdges { v: vec![moving_x], h: vec![moving_y] };
    let snaps = closest_snaplines(&targets, &edges, threshold);

    let use_v = match (snaps.v, snaps.h) {
        (Some(v), Some(h)) => v.offset.abs() <= h.offset.abs(),
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => return Point::default(),
    };
    let (ratio, applied) = if let (true, Some(v)) = (use_v, snaps.v) {
        let grow = if dir_x < 0 { -v.offset } else { v.offset };
        ((b.width + grow) / b.width, Point::new(v.offset, 0.0))
    } else if let Some(h) = snaps.h {
        let grow = if dir_y < 0 { -h.offset } else { h.offset };
        ((b.height + grow) / b.height, Point::new(0.0, h.offset))
    } else {
        return Point::default();
    };
    if ratio <= 0.0 {
        return Point::default();
    }

    let fixed = Point::new(if dir_x < 0 { b.right() } else { b.x }, if dir_y < 0 { b.bottom() } else { b.y });
    let s = layer.styles();
    let c = s.center();
    let new_center = Point::new(fixed.x + (c.x - fixed.x) * ratio, fixed.y + (c.y - fixed.y) * ratio);
    let width = s.width * ratio;
    let height = s.height * ratio;
    let patch = StylePatch {
        x: Some(new_center.x - width / 2.0),
        y: Some(new_center.y - height / 2.0),
        width: Some(width),
        height: Some(height),
        scale: Some(s.scale * ratio),
        ..StylePatch::default()
    };
    trace!(?path, ratio, "scale snapped");
    editor.update_layer_styles(path, &patch);
    applied
}

/// Round `angle` to the nearest multiple of `multiple_of` when it lies within
/// `allowed_offset` degrees of it. `None` means no snap.
#[must_use]
pub fn closest_snap_angle(angle: f64, multiple_of: f64, allowed_offset: f64) -> Option<f64> {
    if multiple_of <= 0.0 {
        return None;
    }
    let nearest = (angle / multiple_of).round() * multiple_of;
    ((angle - nearest).abs() <= allowed_offset).then(|| geometry::normalize_degrees(nearest))
}
