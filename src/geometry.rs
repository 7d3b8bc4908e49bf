//! Geometry primitives: degree trig, rotated points and rotated bounding boxes.
//!
//! Screen space is y-down, so a positive angle rotates a point clockwise on
//! screen. Every bounding box is recomputed from the layer's current styles;
//! nothing here caches, because styles change on every drag tick.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in either screen or page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is read as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `p` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the two rectangles overlap with a non-empty area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// The four corners, clockwise on screen from the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Cosine of an angle in degrees.
#[must_use]
pub fn cos(angle_deg: f64) -> f64 {
    angle_deg.to_radians().cos()
}

/// Sine of an angle in degrees.
#[must_use]
pub fn sin(angle_deg: f64) -> f64 {
    angle_deg.to_radians().sin()
}

/// Center of a rectangle.
#[must_use]
pub fn center(rect: &Rect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// Rotate `point` about `origin` by `angle_deg`, clockwise on a y-down screen.
#[must_use]
pub fn rotated_point(angle_deg: f64, origin: Point, point: Point) -> Point {
    let (c, s) = (cos(angle_deg), sin(angle_deg));
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    Point::new(origin.x + dx * c - dy * s, origin.y + dx * s + dy * c)
}

/// Axis-aligned envelope of `rect` rotated by `rotate` degrees about its center.
#[must_use]
pub fn bounding(rect: &Rect, rotate: f64) -> Rect {
    if rotate == 0.0 {
        return *rect;
    }
    let origin = center(rect);
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for corner in rect.corners() {
        let p = rotated_point(rotate, origin, corner);
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Fold an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Angle in degrees of the vector from `origin` to `p`, measured clockwise from
/// the positive x axis on a y-down screen.
#[must_use]
pub fn angle_of(origin: Point, p: Point) -> f64 {
    normalize_degrees((p.y - origin.y).atan2(p.x - origin.x).to_degrees())
}
