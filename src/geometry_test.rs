#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use rand::Rng;

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn approx_pt(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

fn approx_rect(a: Rect, b: Rect) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.width, b.width) && approx(a.height, b.height)
}

// =============================================================
// Trig
// =============================================================

#[test]
fn cos_sin_take_degrees() {
    assert!(approx(cos(0.0), 1.0));
    assert!(approx(cos(90.0), 0.0));
    assert!(approx(sin(90.0), 1.0));
    assert!(approx(sin(180.0), 0.0));
    assert!(approx(cos(60.0), 0.5));
}

#[test]
fn normalize_degrees_folds_into_range() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    assert_eq!(normalize_degrees(725.0), 5.0);
}

#[test]
fn angle_of_is_clockwise_from_positive_x() {
    let o = Point::new(0.0, 0.0);
    assert!(approx(angle_of(o, Point::new(1.0, 0.0)), 0.0));
    assert!(approx(angle_of(o, Point::new(0.0, 1.0)), 90.0));
    assert!(approx(angle_of(o, Point::new(-1.0, 0.0)), 180.0));
    assert!(approx(angle_of(o, Point::new(0.0, -1.0)), 270.0));
}

// =============================================================
// Point / Rect
// =============================================================

#[test]
fn point_ops() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(4.0, 6.0);
    assert_eq!(a + b, Point::new(5.0, 8.0));
    assert_eq!(b - a, Point::new(3.0, 4.0));
    assert_eq!((b - a).length(), 5.0);
}

#[test]
fn rect_edges_and_contains() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.bottom(), 60.0);
    assert!(r.contains(Point::new(10.0, 20.0)));
    assert!(r.contains(Point::new(40.0, 60.0)));
    assert!(!r.contains(Point::new(41.0, 30.0)));
}

#[test]
fn rect_intersects_requires_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(-20.0, -20.0, 5.0, 5.0)));
}

#[test]
fn rect_union() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(20.0, -5.0, 5.0, 5.0);
    assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 25.0, 15.0));
}

#[test]
fn rect_corners_clockwise_from_top_left() {
    let c = Rect::new(0.0, 0.0, 2.0, 1.0).corners();
    assert_eq!(c[0], Point::new(0.0, 0.0));
    assert_eq!(c[1], Point::new(2.0, 0.0));
    assert_eq!(c[2], Point::new(2.0, 1.0));
    assert_eq!(c[3], Point::new(0.0, 1.0));
}

#[test]
fn center_of_rect() {
    assert_eq!(center(&Rect::new(10.0, 20.0, 100.0, 50.0)), Point::new(60.0, 45.0));
}

// =============================================================
// Rotation
// =============================================================

#[test]
fn rotated_point_positive_angle_is_clockwise_on_screen() {
    let o = Point::new(0.0, 0.0);
    // Right of origin rotates to below it on a y-down screen.
    assert!(approx_pt(rotated_point(90.0, o, Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    assert!(approx_pt(rotated_point(180.0, o, Point::new(1.0, 0.0)), Point::new(-1.0, 0.0)));
}

#[test]
fn rotated_point_about_non_origin() {
    let o = Point::new(10.0, 10.0);
    assert!(approx_pt(rotated_point(90.0, o, Point::new(20.0, 10.0)), Point::new(10.0, 20.0)));
}

#[test]
fn rotation_round_trip_random() {
    let mut rng = rand::rng();
    for _ in 0..1000 {
        let angle = rng.random_range(0.0..360.0);
        let origin = Point::new(rng.random_range(-1000.0..1000.0), rng.random_range(-1000.0..1000.0));
        let p = Point::new(rng.random_range(-1000.0..1000.0), rng.random_range(-1000.0..1000.0));
        let back = rotated_point(-angle, origin, rotated_point(angle, origin, p));
        assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6, "angle {angle}: {p:?} -> {back:?}");
    }
}

// =============================================================
// Bounding
// =============================================================

#[test]
fn bounding_at_zero_is_the_rect() {
    let r = Rect::new(100.0, 100.0, 200.0, 80.0);
    assert_eq!(bounding(&r, 0.0), r);
}

#[test]
fn bounding_at_90_and_270_swaps_size_around_same_center() {
    let r = Rect::new(0.0, 0.0, 200.0, 100.0);
    let expected = Rect::new(50.0, -50.0, 100.0, 200.0);
    assert!(approx_rect(bounding(&r, 90.0), expected));
    assert!(approx_rect(bounding(&r, 270.0), expected));
    assert!(approx_pt(center(&bounding(&r, 90.0)), center(&r)));
}

#[test]
fn bounding_at_45_grows_square() {
    let r = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = bounding(&r, 45.0);
    let side = 100.0 * std::f64::consts::SQRT_2;
    assert!(approx(b.width, side));
    assert!(approx(b.height, side));
    assert!(approx_pt(center(&b), Point::new(50.0, 50.0)));
}

#[test]
fn bounding_at_180_is_the_rect() {
    let r = Rect::new(5.0, 5.0, 40.0, 20.0);
    assert!(approx_rect(bounding(&r, 180.0), r));
}
