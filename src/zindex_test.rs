use rand::Rng;

use super::*;
use crate::doc::{GroupLayer, ShapeCategory};
use crate::factory::shape_layer;
use crate::test_support::page_with;

// =============================================================
// Helpers
// =============================================================

fn page_of(n: usize) -> Page {
    #[allow(clippy::cast_precision_loss)]
    let layers = (0..n).map(|i| shape_layer(ShapeCategory::E, i as f64 * 10.0, 0.0, 5.0, 5.0)).collect();
    page_with(layers)
}

fn ids(page: &Page) -> Vec<uuid::Uuid> {
    page.layers.iter().map(Layer::id).collect()
}

// =============================================================
// reassign_zindex
// =============================================================

#[test]
fn reassign_numbers_from_one() {
    let mut page = page_of(4);
    reassign_zindex(&mut page);
    assert!(is_contiguous(&page));
    assert_eq!(page.layers[3].styles().zindex, 4);
}

#[test]
fn tmp_children_share_wrapper_zindex() {
    let mut page = page_of(3);
    let wrapped = vec![page.layers.remove(1), page.layers.remove(1)];
    page.layers.insert(1, Layer::Tmp(GroupLayer::wrap(wrapped)));
    reassign_zindex(&mut page);
    assert!(is_contiguous(&page));
    if let Layer::Tmp(tmp) = &page.layers[1] {
        assert!(tmp.layers.iter().all(|c| c.styles().zindex == 2));
    } else {
        panic!("expected tmp at index 1");
    }
}

#[test]
fn empty_page_is_contiguous() {
    let mut page = page_with(vec![]);
    reassign_zindex(&mut page);
    assert!(is_contiguous(&page));
}

#[test]
fn stale_zindex_is_not_contiguous() {
    let mut page = page_of(2);
    reassign_zindex(&mut page);
    page.layers[0].patch_styles(&StylePatch { zindex: Some(7), ..StylePatch::default() });
    assert!(!is_contiguous(&page));
}

// =============================================================
// update_layer_order
// =============================================================

#[test]
fn front_and_back() {
    let mut page = page_of(4);
    let before = ids(&page);
    assert_eq!(update_layer_order(&mut page, 1, LayerOrder::Front), Some(3));
    assert_eq!(page.layers[3].id(), before[1]);
    assert_eq!(update_layer_order(&mut page, 3, LayerOrder::Back), Some(0));
    assert_eq!(page.layers[0].id(), before[1]);
    assert!(is_contiguous(&page));
}

#[test]
fn forward_and_backward_step_once() {
    let mut page = page_of(4);
    let before = ids(&page);
    assert_eq!(update_layer_order(&mut page, 1, LayerOrder::Forward), Some(2));
    assert_eq!(ids(&page), vec![before[0], before[2], before[1], before[3]]);
    assert_eq!(update_layer_order(&mut page, 2, LayerOrder::Backward), Some(1));
    assert_eq!(ids(&page), before);
}

#[test]
fn forward_at_top_and_backward_at_bottom_are_noops() {
    let mut page = page_of(3);
    let before = ids(&page);
    assert_eq!(update_layer_order(&mut page, 2, LayerOrder::Forward), Some(2));
    assert_eq!(update_layer_order(&mut page, 0, LayerOrder::Backward), Some(0));
    assert_eq!(ids(&page), before);
    assert!(is_contiguous(&page));
}

#[test]
fn out_of_range_index_is_rejected() {
    let mut page = page_of(2);
    assert_eq!(update_layer_order(&mut page, 2, LayerOrder::Front), None);
    let mut empty = page_with(vec![]);
    assert_eq!(update_layer_order(&mut empty, 0, LayerOrder::Back), None);
}

#[test]
fn random_reorders_stay_contiguous() {
    let orders = [LayerOrder::Front, LayerOrder::Back, LayerOrder::Forward, LayerOrder::Backward];
    let mut rng = rand::rng();
    for _ in 0..50 {
        let n = rng.random_range(1..12);
        let mut page = page_of(n);
        reassign_zindex(&mut page);
        for _ in 0..40 {
            let index = rng.random_range(0..n);
            let order = orders[rng.random_range(0..orders.len())];
            assert!(update_layer_order(&mut page, index, order).is_some());
            assert!(is_contiguous(&page), "after {order:?} on {index} of {n}");
        }
    }
}

#[test]
fn layer_order_serde_is_lowercase() {
    let order: LayerOrder = serde_json::from_str("\"backward\"").expect("order");
    assert_eq!(order, LayerOrder::Backward);
}
