//! 2D camera representing where the map window is looking at.

use super::Viewport;
use crate::geometry::{Point, Rect};
use crate::tracks::LatLon;
use std::cell::RefCell;

/// 2D camera representing where the map window is looking at.
pub struct Camera {
    /// Window width, in pixels.
    width: f64,
    /// Window height, in pixels.
    height: f64,
    /// Minimal zoom level that is acceptable, based on the window size.
    min_zoom: f64,
    /// Current zoom level, measured in pixels per Mercator unit.
    ///
    /// Under Mercator coordinates, the whole world is a unit square (i.e. of
    /// size 1.0 x 1.0).
    zoom: f64,
    /// Offset of the top-left corner of the world w.r.t the center of the
    /// window, in Mercator coordinates.
    offset: Point<f64>,
}

impl Camera {
    /// Maximum zoom level that is acceptable, in pixels per Mercator unit.
    const MAX_ZOOM: f64 = /* 2^25 */ 33_554_432.0;

    /// Returns a default camera view, based on the given window size.
    pub fn new(width: u32, height: u32) -> Self {
        let min_zoom = std::cmp::min(width, height) as f64;

        Self {
            width: width as f64,
            height: height as f64,
            min_zoom,
            zoom: min_zoom,
            offset: Point { x: -0.5, y: -0.5 },
        }
    }

    /// Returns the window width, in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the window height, in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the zoom level, in pixels per Mercator unit.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Adjusts the camera based on the given new window size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.min_zoom = self.width.min(self.height);
        if self.zoom < self.min_zoom {
            self.zoom = self.min_zoom;
        }
    }

    /// Adjusts the zoom level based on the given mouse scroll.
    pub fn scroll(&mut self, scroll: f64) {
        self.zoom *= (scroll / 10.0).exp2();
        if self.zoom < self.min_zoom {
            self.zoom = self.min_zoom;
        }
        self.zoom = self.zoom.min(Self::MAX_ZOOM);
    }

    /// Sets the zoom level directly, clamped to the acceptable range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, Self::MAX_ZOOM);
    }

    /// Adjusts the offset based on the given mouse drag, in pixels.
    pub fn drag_relative(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx / self.zoom;
        self.offset.y += dy / self.zoom;
    }

    /// Centers the camera on the given coordinate.
    pub fn look_at(&mut self, coord: LatLon) {
        let m = coord.as_mercator();
        self.offset = Point { x: -m.x, y: -m.y };
    }

    /// Projects a coordinate to window pixel coordinates under the current
    /// pan/zoom.
    pub fn project(&self, coord: LatLon) -> Point<f64> {
        let m = coord.as_mercator();
        Point {
            x: (m.x + self.offset.x) * self.zoom + self.width / 2.0,
            y: (m.y + self.offset.y) * self.zoom + self.height / 2.0,
        }
    }

    /// Returns the window rectangle, in pixels.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Viewport for RefCell<Camera> {
    fn project(&self, coord: LatLon) -> Point<f64> {
        self.borrow().project(coord)
    }

    fn bounds(&self) -> Rect {
        self.borrow().bounds()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn looked_at_coordinate_projects_to_window_center() {
        let mut camera = Camera::new(640, 480);
        let coord = LatLon {
            lat: 22.629052,
            lon: 114.136977,
        };
        camera.look_at(coord);

        let p = camera.project(coord);
        assert!((p.x - 320.0).abs() < 1e-9);
        assert!((p.y - 240.0).abs() < 1e-9);
    }

    #[test]
    fn default_view_centers_the_world() {
        let camera = Camera::new(640, 480);
        let p = camera.project(LatLon { lat: 0.0, lon: 0.0 });
        assert!((p.x - 320.0).abs() < 1e-9);
        assert!((p.y - 240.0).abs() < 1e-9);
    }

    #[test]
    fn scroll_zooms_exponentially() {
        let mut camera = Camera::new(640, 480);
        let before = camera.zoom();
        camera.scroll(10.0);
        assert!((camera.zoom() - before * 2.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped_to_the_window_size() {
        let mut camera = Camera::new(640, 480);
        camera.scroll(-100.0);
        assert_eq!(camera.zoom(), 480.0);
    }

    #[test]
    fn drag_moves_the_projection_linearly() {
        let mut camera = Camera::new(640, 480);
        let coord = LatLon { lat: 10.0, lon: 20.0 };
        let before = camera.project(coord);
        camera.drag_relative(15.0, -7.0);
        let after = camera.project(coord);
        assert!((after.x - before.x - 15.0).abs() < 1e-9);
        assert!((after.y - before.y + 7.0).abs() < 1e-9);
    }
}
