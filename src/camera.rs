#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::geometry::{Point, Rect};

/// Where a page is drawn on screen and at what magnification.
///
/// `origin` is the screen position (CSS pixels) of the page's top-left.
/// `zoom` is the page scale ratio (1.0 = 100%). `content_scale` is the extra
/// device / content scale factor applied on top of the zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageViewport {
    pub origin: Point,
    pub zoom: f64,
    pub content_scale: f64,
}

impl Default for PageViewport {
    fn default() -> Self {
        Self { origin: Point::default(), zoom: 1.0, content_scale: 1.0 }
    }
}

impl PageViewport {
    #[must_use]
    pub fn new(origin: Point, zoom: f64) -> Self {
        Self { origin, zoom, ..Self::default() }
    }

    /// Combined screen pixels per page unit.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.zoom * self.content_scale
    }

    /// Convert a screen-space point (CSS pixels) to page coordinates.
    #[must_use]
    pub fn screen_to_page(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin.x) / self.ratio(),
            y: (screen.y - self.origin.y) / self.ratio(),
        }
    }

    /// Convert a page-space point to screen coordinates.
    #[must_use]
    pub fn page_to_screen(&self, page: Point) -> Point {
        Point {
            x: page.x * self.ratio() + self.origin.x,
            y: page.y * self.ratio() + self.origin.y,
        }
    }

    /// Convert a screen-space distance to page units.
    #[must_use]
    pub fn screen_dist_to_page(&self, screen_dist: f64) -> f64 {
        screen_dist / self.ratio()
    }

    /// The page's on-screen rectangle for a page of the given size.
    #[must_use]
    pub fn screen_rect(&self, width: f64, height: f64) -> Rect {
        Rect::new(self.origin.x, self.origin.y, width * self.ratio(), height * self.ratio())
    }
}
