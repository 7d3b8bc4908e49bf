//! Alignment of the selection to the page, or of a multi-selection's members
//! to each other.
//!
//! Edge alignment uses the rotated bounding box, so the visible corner of a
//! rotated layer touches the page edge rather than its unrotated frame.
//! Center alignment uses the raw box, which shares the bounding box's center.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::doc::{Layer, Page, StylePatch, Styles};
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    CenterHorizontal,
    Right,
    Top,
    CenterVertical,
    Bottom,
}

/// Position patch that aligns `styles` inside `container`.
#[must_use]
pub fn align_patch(styles: &Styles, container: Rect, alignment: Alignment) -> StylePatch {
    let bbox = styles.bounding();
    let mut patch = StylePatch::default();
    match alignment {
        Alignment::Left => patch.x = Some(styles.x + (container.x - bbox.x)),
        Alignment::Right => patch.x = Some(styles.x + (container.right() - bbox.right())),
        Alignment::CenterHorizontal => patch.x = Some(container.x + (container.width - styles.width) / 2.0),
        Alignment::Top => patch.y = Some(styles.y + (container.y - bbox.y)),
        Alignment::Bottom => patch.y = Some(styles.y + (container.bottom() - bbox.bottom())),
        Alignment::CenterVertical => patch.y = Some(container.y + (container.height - styles.height) / 2.0),
    }
    patch
}

/// Align the page-level layer at `index`.
///
/// A single layer is aligned to the page. A `Tmp` multi-selection aligns each
/// member within the wrapper's own box and then refits the wrapper.
/// Returns `false` when `index` does not address a layer.
pub fn align_layer(page: &mut Page, index: usize, alignment: Alignment) -> bool {
    let page_rect = page.rect();
    let Some(layer) = page.layers.get_mut(index) else {
        warn!(index, ?alignment, "align_layer: no layer at index");
        return false;
    };
    match layer {
        Layer::Tmp(tmp) => {
            let scale = tmp.styles.scale;
            let local = Rect::new(0.0, 0.0, tmp.styles.width / scale, tmp.styles.height / scale);
            for child in &mut tmp.layers {
                let patch = align_patch(child.styles(), local, alignment);
                child.patch_styles(&patch);
            }
            tmp.recalc_bounds();
        }
        other => {
            let patch = align_patch(other.styles(), page_rect, alignment);
            other.patch_styles(&patch);
        }
    }
    true
}
