#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::PageViewport;
use crate::control::{self, Compass, ControlPoint, ControlPointKind};
use crate::doc::{Layer, Page, Styles};
use crate::geometry::{self, Point, Rect};

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// A child of the active group or frame.
    SubLayer(usize),
    Control(ControlPointKind, Compass),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub page: usize,
    pub layer: usize,
    pub part: HitPart,
}

/// Map a point in the parent's space into `styles`' own unrotated frame,
/// relative to its top-left and in unscaled units.
#[must_use]
pub fn to_local(styles: &Styles, point: Point) -> Point {
    let unrotated = geometry::rotated_point(-styles.rotate, styles.center(), point);
    let scale = if styles.scale > 0.0 { styles.scale } else { 1.0 };
    Point::new((unrotated.x - styles.x) / scale, (unrotated.y - styles.y) / scale)
}

/// Top-most page-level layer whose rotated box contains `point` (page units).
#[must_use]
pub fn hit_layer(page: &Page, point: Point) -> Option<usize> {
    page.layers
        .iter()
        .enumerate()
        .rev()
        .find(|(_, layer)| control::is_click_on_controller(point, layer.styles()))
        .map(|(i, _)| i)
}

/// Top-most child of a group, frame or `Tmp` under `point` (page units).
#[must_use]
pub fn hit_sub_layer(layer: &Layer, point: Point) -> Option<usize> {
    let children = layer.children();
    if children.is_empty() {
        return None;
    }
    let local = to_local(layer.styles(), point);
    children
        .iter()
        .enumerate()
        .rev()
        .find(|(_, child)| control::is_click_on_controller(local, child.styles()))
        .map(|(i, _)| i)
}

/// Control point of `layer` under `screen`, if any.
#[must_use]
pub fn hit_control_point(layer: &Layer, screen: Point, viewport: &PageViewport) -> Option<ControlPoint> {
    let s = layer.styles();
    let page_pt = viewport.screen_to_page(screen);
    let unrotated = geometry::rotated_point(-s.rotate, s.center(), page_pt);
    let ratio = viewport.ratio();
    let local = Point::new((unrotated.x - s.x) * ratio, (unrotated.y - s.y) * ratio);
    control::control_points(layer, viewport)
        .into_iter()
        .rev()
        .find(|cp| Rect::new(cp.position.x, cp.position.y, cp.size, cp.size).contains(local))
}

/// Test what is under `screen` on page `page_index`.
///
/// The selected layer's control points win, then a child of the selected
/// group or frame, then the top-most layer body.
#[must_use]
pub fn hit_test(
    page: &Page,
    page_index: usize,
    screen: Point,
    viewport: &PageViewport,
    selected: Option<usize>,
) -> Option<Hit> {
    let point = viewport.screen_to_page(screen);
    if let Some(sel) = selected {
        if let Some(layer) = page.layers.get(sel) {
            if let Some(cp) = hit_control_point(layer, screen, viewport) {
                return Some(Hit { page: page_index, layer: sel, part: HitPart::Control(cp.kind, cp.compass) });
            }
        }
    }
    let index = hit_layer(page, point)?;
    if selected == Some(index) {
        let layer = &page.layers[index];
        if matches!(layer, Layer::Group(_) | Layer::Frame(_)) {
            if let Some(sub) = hit_sub_layer(layer, point) {
                return Some(Hit { page: page_index, layer: index, part: HitPart::SubLayer(sub) });
            }
        }
    }
    Some(Hit { page: page_index, layer: index, part: HitPart::Body })
}
