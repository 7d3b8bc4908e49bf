#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::camera::PageViewport;
use crate::collab::{BusEvent, Caret};
use crate::doc::{ShapeCategory, TextFormat};
use crate::factory::{group_layer, image_layer, shape_layer, text_layer};
use crate::input::Modifiers;
use crate::store::CopiedFormat;
use crate::test_support::{editor_with, editor_with_pages, page_with};

// =============================================================
// Helpers
// =============================================================

fn rect_layer(x: f64, y: f64, w: f64, h: f64) -> Layer {
    shape_layer(ShapeCategory::E, x, y, w, h)
}

fn pos(editor: &Editor, path: LayerPath) -> Point {
    editor.layer(path).map(|l| Point::new(l.styles().x, l.styles().y)).unwrap_or_default()
}

fn press(editor: &mut Editor, path: LayerPath, x: f64, y: f64) -> (MoveController, DownOutcome) {
    let mut mc = MoveController::new(editor, path);
    let outcome = mc.pointer_down(editor, &PointerEvent::mouse(1, x, y), false);
    (mc, outcome)
}

fn mv(mc: &mut MoveController, editor: &mut Editor, x: f64, y: f64) -> MoveOutcome {
    mc.pointer_move(editor, &PointerEvent::mouse(1, x, y))
}

fn up(mc: &mut MoveController, editor: &mut Editor, x: f64, y: f64) -> UpOutcome {
    mc.pointer_up(editor, &PointerEvent::mouse(1, x, y))
}

// =============================================================
// Press
// =============================================================

#[test]
fn press_claims_token() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let (mc, outcome) = press(&mut editor, LayerPath::new(0, 0), 350.0, 350.0);
    assert_eq!(outcome, DownOutcome::Pressed);
    assert_eq!(mc.phase(), Phase::Pressed);
    assert_eq!(mc.pointer_id(), Some(1));
    assert_eq!(editor.control_state().id, Some(mc.id()));
    assert_eq!(editor.control_state().kind, ControlKind::Move);
}

#[test]
fn multi_touch_and_secondary_button_are_ignored() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let mut mc = MoveController::new(&mut editor, LayerPath::new(0, 0));
    assert_eq!(mc.pointer_down(&mut editor, &PointerEvent::touch(1, 350.0, 350.0, false), true), DownOutcome::Ignored);
    let right = PointerEvent { button: Button::Secondary, ..PointerEvent::mouse(1, 350.0, 350.0) };
    assert_eq!(mc.pointer_down(&mut editor, &right, false), DownOutcome::Ignored);
    assert!(!mc.is_live());
}

#[test]
fn press_fails_while_another_controller_owns_token() {
    let (mut editor, _) = editor_with(vec![rect_layer(0.0, 0.0, 100.0, 100.0), rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let (_first, outcome) = press(&mut editor, LayerPath::new(0, 0), 50.0, 50.0);
    assert_eq!(outcome, DownOutcome::Pressed);
    let (second, outcome) = press(&mut editor, LayerPath::new(0, 1), 350.0, 350.0);
    assert_eq!(outcome, DownOutcome::Ignored);
    assert!(!second.is_live());
}

#[test]
fn locked_layer_is_selected_not_dragged() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    editor.update_layer_flags(LayerPath::new(0, 0), |f| f.locked = true);
    let (mut mc, outcome) = press(&mut editor, LayerPath::new(0, 0), 350.0, 350.0);
    assert_eq!(outcome, DownOutcome::Selected);
    assert_eq!(editor.selected_path(), Some(LayerPath::new(0, 0)));
    assert_eq!(editor.control_state(), crate::store::ControlState::default());
    assert_eq!(mv(&mut mc, &mut editor, 400.0, 400.0), MoveOutcome::Ignored);
    assert_eq!(pos(&editor, LayerPath::new(0, 0)), Point::new(300.0, 300.0));
}

#[test]
fn modifier_press_toggles_multi_selection() {
    let (mut editor, _) = editor_with(vec![rect_layer(0.0, 0.0, 100.0, 100.0), rect_layer(300.0, 300.0, 100.0, 100.0)]);
    editor.select_layer(0, 0);
    let mut mc = MoveController::new(&mut editor, LayerPath::new(0, 1));
    let shift = PointerEvent::mouse(1, 350.0, 350.0).with_modifiers(Modifiers { shift: true, ..Modifiers::default() });
    assert_eq!(mc.pointer_down(&mut editor, &shift, false), DownOutcome::Toggled);
    assert!(matches!(editor.selected_layer(), Some(Layer::Tmp(t)) if t.layers.len() == 2));
    assert_eq!(editor.control_state().id, None);
}

#[test]
fn modifier_press_on_tmp_member_drops_it() {
    let (mut editor, _) = editor_with(vec![
        rect_layer(0.0, 0.0, 100.0, 100.0),
        rect_layer(300.0, 300.0, 100.0, 100.0),
        rect_layer(600.0, 600.0, 100.0, 100.0),
    ]);
    editor.select_many(0, &[0, 1, 2]);
    let tmp = editor.selected_path().unwrap_or(LayerPath::new(0, 0));
    let mut mc = MoveController::new(&mut editor, tmp);
    let shift = PointerEvent::mouse(1, 350.0, 350.0).with_modifiers(Modifiers { shift: true, ..Modifiers::default() });
    assert_eq!(mc.pointer_down(&mut editor, &shift, false), DownOutcome::Toggled);
    let Some(Layer::Tmp(t)) = editor.selected_layer() else {
        panic!("expected multi-selection");
    };
    assert_eq!(t.layers.len(), 2);
}

#[test]
fn copied_format_is_applied_on_press() {
    let (mut editor, _) = editor_with(vec![text_layer("hi", 300.0, 300.0, 100.0, 40.0)]);
    editor.set_copied_format(CopiedFormat::Text(TextFormat { bold: true, ..TextFormat::default() }));
    let (_mc, outcome) = press(&mut editor, LayerPath::new(0, 0), 350.0, 320.0);
    assert_eq!(outcome, DownOutcome::Pressed);
    assert!(matches!(editor.layer(LayerPath::new(0, 0)), Some(Layer::Text(t)) if t.format.bold));
    assert!(editor.copied_format().is_none());
}

// =============================================================
// Click vs drag
// =============================================================

#[test]
fn click_below_threshold_selects_without_moving() {
    let (mut editor, rec) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    assert_eq!(up(&mut mc, &mut editor, 350.5, 350.0), UpOutcome::Clicked { editing: false });
    assert_eq!(pos(&editor, path), Point::new(300.0, 300.0));
    assert_eq!(editor.selected_path(), Some(path));
    assert!(!editor.is_moving());
    assert_eq!(editor.control_state().id, None);
    assert_eq!(rec.steps(), 0);
    assert_eq!(rec.events(), vec![BusEvent::SwitchPanel { tab: PanelTab::Shape }]);
}

#[test]
fn drag_applies_exact_displacement() {
    let (mut editor, rec) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    assert_eq!(mv(&mut mc, &mut editor, 387.0, 373.0), MoveOutcome::Moved { position: Point::new(337.0, 323.0) });
    assert_eq!(mc.phase(), Phase::Dragging);
    assert!(editor.is_moving());
    assert!(editor.layer(path).is_some_and(|l| l.flags().dragging));
    assert_eq!(up(&mut mc, &mut editor, 387.0, 373.0), UpOutcome::Moved { delta: Point::new(37.0, 23.0) });
    assert_eq!(pos(&editor, path), Point::new(337.0, 323.0));
    assert!(!editor.is_moving());
    assert!(editor.layer(path).is_some_and(|l| !l.flags().dragging && !l.flags().moved));
    assert_eq!(editor.selected_path(), Some(path));
    assert_eq!(rec.steps(), 1);
}

#[test]
fn release_position_is_applied_even_without_a_move() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    assert_eq!(up(&mut mc, &mut editor, 370.0, 360.0), UpOutcome::Moved { delta: Point::new(20.0, 10.0) });
}

#[test]
fn drag_back_under_threshold_restores_and_clicks() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    mv(&mut mc, &mut editor, 420.0, 350.0);
    assert_eq!(up(&mut mc, &mut editor, 350.5, 350.0), UpOutcome::Clicked { editing: false });
    assert_eq!(pos(&editor, path), Point::new(300.0, 300.0));
}

#[test]
fn threshold_is_measured_in_page_units() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    editor.set_viewport(0, PageViewport::new(Point::default(), 2.0));
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 700.0, 700.0);
    // 1.8 screen px at zoom 2 is 0.9 page units.
    assert_eq!(up(&mut mc, &mut editor, 701.8, 700.0), UpOutcome::Clicked { editing: false });
    assert_eq!(pos(&editor, path), Point::new(300.0, 300.0));
}

#[test]
fn zoomed_drag_divides_by_ratio() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    editor.set_viewport(0, PageViewport::new(Point::default(), 2.0));
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 700.0, 700.0);
    assert_eq!(up(&mut mc, &mut editor, 740.0, 720.0), UpOutcome::Moved { delta: Point::new(20.0, 10.0) });
}

// =============================================================
// Pointer ownership / cancellation
// =============================================================

#[test]
fn only_the_pressing_pointer_moves_the_layer() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    let other = PointerEvent::mouse(2, 500.0, 500.0);
    assert_eq!(mc.pointer_move(&mut editor, &other), MoveOutcome::Ignored);
    assert_eq!(mc.pointer_up(&mut editor, &other), UpOutcome::Ignored);
    assert_eq!(pos(&editor, path), Point::new(300.0, 300.0));
    assert!(mc.is_live());
    assert_eq!(up(&mut mc, &mut editor, 370.0, 350.0), UpOutcome::Moved { delta: Point::new(20.0, 0.0) });
}

#[test]
fn pinch_cancels_and_restores() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    mv(&mut mc, &mut editor, 400.0, 400.0);
    editor.begin_pinch();
    assert_eq!(mv(&mut mc, &mut editor, 450.0, 450.0), MoveOutcome::Cancelled);
    assert_eq!(mc.phase(), Phase::Cancelled);
    assert_eq!(pos(&editor, path), Point::new(300.0, 300.0));
    assert!(!editor.is_moving());
    assert_eq!(up(&mut mc, &mut editor, 450.0, 450.0), UpOutcome::Ignored);
}

#[test]
fn explicit_cancel_releases_token() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    mv(&mut mc, &mut editor, 360.0, 370.0);
    mc.cancel(&mut editor);
    assert_eq!(pos(&editor, path), Point::new(300.0, 300.0));
    assert_eq!(editor.control_state().id, None);
    assert!(!mc.is_live());
}

// =============================================================
// Snapping during drag
// =============================================================

#[test]
fn drag_snaps_to_page_edge_and_keeps_following() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
    // x would land on 3, within 5 of the left page edge.
    assert_eq!(mv(&mut mc, &mut editor, 53.0, 350.0), MoveOutcome::Moved { position: Point::new(0.0, 300.0) });
    // Moving 20 further right leaves the snap zone from the unsnapped position.
    assert_eq!(mv(&mut mc, &mut editor, 73.0, 350.0), MoveOutcome::Moved { position: Point::new(23.0, 300.0) });
    assert_eq!(mv(&mut mc, &mut editor, 53.0, 350.0), MoveOutcome::Moved { position: Point::new(0.0, 300.0) });
    assert_eq!(up(&mut mc, &mut editor, 53.0, 350.0), UpOutcome::Moved { delta: Point::new(-300.0, 0.0) });
    assert_eq!(pos(&editor, path), Point::new(0.0, 300.0));
}

// =============================================================
// Drop targets
// =============================================================

#[test]
fn drop_outside_every_page_deletes() {
    let (mut editor, rec) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let id = editor.layer(LayerPath::new(0, 0)).map(Layer::id);
    let (mut mc, _) = press(&mut editor, LayerPath::new(0, 0), 350.0, 350.0);
    mv(&mut mc, &mut editor, 1650.0, 350.0);
    assert_eq!(up(&mut mc, &mut editor, 1650.0, 350.0), UpOutcome::Deleted);
    assert!(editor.page(0).is_some_and(|p| p.layers.is_empty()));
    assert_eq!(rec.events().last(), id.map(|id| BusEvent::LayerDropped { id }).as_ref());
    assert_eq!(rec.steps(), 1);
}

#[test]
fn drop_partly_off_page_keeps_layer() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let (mut mc, _) = press(&mut editor, LayerPath::new(0, 0), 350.0, 350.0);
    // Layer spans 1040..1140, still overlapping the page; pointer is off it.
    assert_eq!(up(&mut mc, &mut editor, 1090.0, 350.0), UpOutcome::Moved { delta: Point::new(740.0, 0.0) });
    assert_eq!(editor.page(0).map(|p| p.layers.len()), Some(1));
}

#[test]
fn drop_on_another_page_moves_it_there() {
    let (mut editor, rec) = editor_with_pages(vec![page_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]), page_with(vec![])]);
    let id = editor.layer(LayerPath::new(0, 0)).map(Layer::id);
    let (mut mc, _) = press(&mut editor, LayerPath::new(0, 0), 350.0, 350.0);
    mv(&mut mc, &mut editor, 1530.0, 350.0);
    assert_eq!(up(&mut mc, &mut editor, 1530.0, 350.0), UpOutcome::MovedToPage { page: 1, index: 0 });
    assert!(editor.page(0).is_some_and(|p| p.layers.is_empty()));
    assert_eq!(pos(&editor, LayerPath::new(1, 0)), Point::new(300.0, 300.0));
    assert_eq!(editor.selected_path(), Some(LayerPath::new(1, 0)));
    assert_eq!(mc.path(), LayerPath::new(1, 0));
    assert_eq!(rec.events().last(), id.map(|id| BusEvent::LayerMovedToPage { id, page_index: 1 }).as_ref());
}

#[test]
fn multi_selection_dropped_on_another_page_is_dissolved() {
    let (mut editor, _) = editor_with_pages(vec![
        page_with(vec![rect_layer(300.0, 300.0, 50.0, 50.0), rect_layer(400.0, 300.0, 50.0, 50.0)]),
        page_with(vec![]),
    ]);
    editor.select_many(0, &[0, 1]);
    let (mut mc, _) = press(&mut editor, LayerPath::new(0, 0), 320.0, 320.0);
    mv(&mut mc, &mut editor, 1500.0, 320.0);
    assert!(matches!(up(&mut mc, &mut editor, 1500.0, 320.0), UpOutcome::MovedToPage { page: 1, .. }));
    assert_eq!(editor.page(1).map(|p| p.layers.len()), Some(2));
    assert!(editor.page(1).is_some_and(|p| p.layers.iter().all(|l| l.kind() == LayerKind::Shape)));
    assert!(editor.selected_path().is_none());
}

// =============================================================
// Alt-drag copy
// =============================================================

#[test]
fn alt_drag_leaves_copy_behind() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let original = editor.layer(LayerPath::new(0, 0)).map(Layer::id);
    let mut mc = MoveController::new(&mut editor, LayerPath::new(0, 0));
    let alt = PointerEvent::mouse(1, 350.0, 350.0).with_modifiers(Modifiers { alt: true, ..Modifiers::default() });
    assert_eq!(mc.pointer_down(&mut editor, &alt, false), DownOutcome::Pressed);
    assert_eq!(mc.path(), LayerPath::new(0, 0));
    assert_eq!(editor.page(0).map(|p| p.layers.len()), Some(1));
    mv(&mut mc, &mut editor, 420.0, 350.0);
    assert_eq!(mc.path(), LayerPath::new(0, 1));
    assert_eq!(editor.control_state().layer, Some(LayerPath::new(0, 1)));
    up(&mut mc, &mut editor, 420.0, 350.0);
    let page = editor.page(0).map(|p| p.layers.clone()).unwrap_or_default();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].styles().x, 300.0);
    assert_eq!(page[1].styles().x, 370.0);
    assert_eq!(Some(page[1].id()), original);
    assert_ne!(page[0].id(), page[1].id());
}

#[test]
fn alt_click_in_place_makes_no_copy() {
    let (mut editor, rec) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let mut mc = MoveController::new(&mut editor, LayerPath::new(0, 0));
    let alt = PointerEvent::mouse(1, 350.0, 350.0).with_modifiers(Modifiers { alt: true, ..Modifiers::default() });
    mc.pointer_down(&mut editor, &alt, false);
    assert_eq!(up(&mut mc, &mut editor, 350.0, 350.0), UpOutcome::Clicked { editing: false });
    assert_eq!(editor.page(0).map(|p| p.layers.len()), Some(1));
    assert_eq!(editor.selected_path(), Some(LayerPath::new(0, 0)));
    assert_eq!(rec.steps(), 0);
}

#[test]
fn alt_drag_back_under_threshold_discards_copy() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let mut mc = MoveController::new(&mut editor, LayerPath::new(0, 0));
    let alt = PointerEvent::mouse(1, 350.0, 350.0).with_modifiers(Modifiers { alt: true, ..Modifiers::default() });
    mc.pointer_down(&mut editor, &alt, false);
    mv(&mut mc, &mut editor, 400.0, 350.0);
    assert_eq!(editor.page(0).map(|p| p.layers.len()), Some(2));
    assert!(matches!(up(&mut mc, &mut editor, 350.0, 350.0), UpOutcome::Clicked { .. }));
    assert_eq!(editor.page(0).map(|p| p.layers.len()), Some(1));
    assert_eq!(mc.path(), LayerPath::new(0, 0));
    assert_eq!(pos(&editor, LayerPath::new(0, 0)), Point::new(300.0, 300.0));
}

#[test]
fn cancelled_alt_drag_discards_copy() {
    let (mut editor, _) = editor_with(vec![rect_layer(300.0, 300.0, 100.0, 100.0)]);
    let original = editor.layer(LayerPath::new(0, 0)).map(Layer::id);
    let mut mc = MoveController::new(&mut editor, LayerPath::new(0, 0));
    let alt = PointerEvent::mouse(1, 350.0, 350.0).with_modifiers(Modifiers { alt: true, ..Modifiers::default() });
    mc.pointer_down(&mut editor, &alt, false);
    mv(&mut mc, &mut editor, 420.0, 350.0);
    mc.cancel(&mut editor);
    let layers = editor.page(0).map(|p| p.layers.clone()).unwrap_or_default();
    assert_eq!(layers.len(), 1);
    assert_eq!(Some(layers[0].id()), original);
    assert_eq!(layers[0].styles().x, 300.0);
    assert_eq!(editor.control_state(), crate::store::ControlState::default());
}

// =============================================================
// Click routing
// =============================================================

#[test]
fn second_click_on_text_starts_editing() {
    let (mut editor, rec) = editor_with(vec![text_layer("hi", 300.0, 300.0, 100.0, 40.0)]);
    let path = LayerPath::new(0, 0);
    let (mut mc, _) = press(&mut editor, path, 350.0, 320.0);
    assert_eq!(up(&mut mc, &mut editor, 350.0, 320.0), UpOutcome::Clicked { editing: false });
    let (mut mc, _) = press(&mut editor, path, 350.0, 320.0);
    assert_eq!(up(&mut mc, &mut editor, 350.0, 320.0), UpOutcome::Clicked { editing: true });
    assert!(editor.layer(path).is_some_and(|l| l.flags().editing));
    let focus = rec.focus();
    assert_eq!(focus.len(), 1);
    assert_eq!(focus[0].1, Caret::At(Point::new(50.0, 20.0)));
}

#[test]
fn drag_clears_text_editing() {
    let (mut editor, _) = editor_with(vec![text_layer("hi", 300.0, 300.0, 100.0, 40.0)]);
    let path = LayerPath::new(0, 0);
    editor.select_layer(0, 0);
    editor.begin_text_edit(path, Caret::End);
    let (mut mc, _) = press(&mut editor, path, 350.0, 320.0);
    mv(&mut mc, &mut editor, 380.0, 320.0);
    assert!(editor.layer(path).is_some_and(|l| !l.flags().editing));
}

#[test]
fn second_click_on_image_opens_crop() {
    let (mut editor, rec) = editor_with(vec![image_layer("a.png", 300.0, 300.0, 100.0, 100.0)]);
    let path = LayerPath::new(0, 0);
    for _ in 0..2 {
        let (mut mc, _) = press(&mut editor, path, 350.0, 350.0);
        up(&mut mc, &mut editor, 350.0, 350.0);
    }
    assert_eq!(
        rec.events(),
        vec![BusEvent::SwitchPanel { tab: PanelTab::Photo }, BusEvent::SwitchPanel { tab: PanelTab::Crop }]
    );
}

#[test]
fn click_on_group_child_sub_selects() {
    let (mut editor, _) = editor_with(vec![group_layer(vec![
        rect_layer(100.0, 100.0, 50.0, 50.0),
        text_layer("t", 300.0, 100.0, 50.0, 50.0),
    ])]);
    editor.select_layer(0, 0);
    let target = LayerPath::child(0, 0, 1);
    let (mut mc, outcome) = press(&mut editor, target, 320.0, 120.0);
    assert_eq!(outcome, DownOutcome::Pressed);
    assert_eq!(mc.path(), LayerPath::new(0, 0));
    assert_eq!(up(&mut mc, &mut editor, 320.0, 120.0), UpOutcome::Clicked { editing: false });
    assert_eq!(editor.sub_selected().index, Some(1));
}

#[test]
fn drag_on_group_child_moves_whole_group() {
    let (mut editor, _) = editor_with(vec![group_layer(vec![
        rect_layer(100.0, 100.0, 50.0, 50.0),
        rect_layer(300.0, 100.0, 50.0, 50.0),
    ])]);
    editor.select_layer(0, 0);
    let (mut mc, _) = press(&mut editor, LayerPath::child(0, 0, 1), 320.0, 120.0);
    assert_eq!(up(&mut mc, &mut editor, 340.0, 160.0), UpOutcome::Moved { delta: Point::new(20.0, 40.0) });
    assert_eq!(pos(&editor, LayerPath::new(0, 0)), Point::new(120.0, 140.0));
    assert_eq!(pos(&editor, LayerPath::child(0, 0, 1)), Point::new(200.0, 0.0));
}
