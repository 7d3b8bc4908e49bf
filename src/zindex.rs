//! Z-order maintenance.
//!
//! A page's render order is its `layers` array. Each layer's `styles.zindex`
//! mirrors that order as `index + 1`. Every structural change (insert, remove,
//! reorder, wrap, dissolve) is followed by [`reassign_zindex`] so the two never
//! drift apart.

#[cfg(test)]
#[path = "zindex_test.rs"]
mod zindex_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::doc::{Layer, Page, StylePatch};

/// Layer-order commands from the arrange menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrder {
    /// To the top of the stack.
    Front,
    /// To the bottom of the stack.
    Back,
    /// One step up.
    Forward,
    /// One step down.
    Backward,
}

/// Write `zindex = index + 1` into every layer of the page. A `Tmp` wrapper
/// hands its own zindex to every wrapped child so they render as one block.
pub fn reassign_zindex(page: &mut Page) {
    for (i, layer) in page.layers.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_wrap)]
        let z = i as i64 + 1;
        set_zindex(layer, z);
        if let Layer::Tmp(tmp) = layer {
            for child in &mut tmp.layers {
                set_zindex(child, z);
            }
        }
    }
}

fn set_zindex(layer: &mut Layer, z: i64) {
    if layer.styles().zindex != z {
        layer.patch_styles(&StylePatch { zindex: Some(z), ..StylePatch::default() });
    }
}

/// Move the layer at `index` according to `order`, then renumber.
///
/// Returns the layer's new index, or `None` when `index` is out of range.
/// Forward on the top layer and Backward on the bottom layer leave the order
/// unchanged but still renumber.
pub fn update_layer_order(page: &mut Page, index: usize, order: LayerOrder) -> Option<usize> {
    let len = page.layers.len();
    if index >= len {
        warn!(index, len, ?order, "update_layer_order: index out of range");
        return None;
    }
    let target = match order {
        LayerOrder::Front => len - 1,
        LayerOrder::Back => 0,
        LayerOrder::Forward => (index + 1).min(len - 1),
        LayerOrder::Backward => index.saturating_sub(1),
    };
    if target != index {
        let layer = page.layers.remove(index);
        page.layers.insert(target, layer);
        debug!(from = index, to = target, ?order, "layer reordered");
    }
    reassign_zindex(page);
    Some(target)
}

/// Whether zindex values are exactly `1..=n` in array order.
#[must_use]
pub fn is_contiguous(page: &Page) -> bool {
    page.layers
        .iter()
        .enumerate()
        .all(|(i, layer)| usize::try_from(layer.styles().zindex).is_ok_and(|z| z == i + 1))
}
