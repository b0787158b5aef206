//! Module animating the "you are here" marker: a white outline disc with a
//! pulsing inner dot.

use super::{Blend, Color, DrawTarget, RenderMode, Viewport};
use crate::geometry::path::{self, Path};
use crate::tracks::LatLon;

/// Animated location marker. A frame-tick consumer: each tick advances the
/// pulse by one step and rebuilds the marker circles under the current
/// projection.
pub struct LocationMarker {
    coordinate: Option<LatLon>,
    pulse_index: f64,
    reverse_pulse: bool,
    inner_radius: f64,
    outline_path: Option<Path>,
    inner_path: Option<Path>,
}

impl LocationMarker {
    /// Radius of the marker outline, in pixels.
    const OUTLINE_RADIUS: f64 = 12.0;
    /// First step of the pulse cycle.
    const MIN_INDEX: f64 = 0.0;
    /// Last step of the pulse cycle.
    const MAX_INDEX: f64 = 120.0;

    /// Step at which the growing pulse starts holding its size.
    fn hold_start_index() -> f64 {
        Self::MAX_INDEX * 0.7
    }

    /// Smallest inner dot radius.
    fn min_inner_radius() -> f64 {
        Self::OUTLINE_RADIUS * 0.6
    }

    /// Largest inner dot radius.
    fn max_inner_radius() -> f64 {
        Self::OUTLINE_RADIUS * 0.8
    }

    /// Creates a marker with no position.
    pub fn new() -> Self {
        LocationMarker {
            coordinate: None,
            pulse_index: Self::MIN_INDEX,
            reverse_pulse: false,
            inner_radius: 0.0,
            outline_path: None,
            inner_path: None,
        }
    }

    /// Moves the marker to the given coordinate.
    pub fn update_coordinate(&mut self, coordinate: LatLon) {
        self.coordinate = Some(coordinate);
    }

    /// Returns the current inner dot radius, in pixels.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Advances the pulse by one step and returns the inner radius for this
    /// frame.
    ///
    /// The radius sweeps up from the minimum, holds near the maximum for the
    /// last 30% of the cycle, then sweeps back down.
    fn advance_pulse(&mut self) -> f64 {
        let radius_at = |index: f64| {
            (Self::max_inner_radius() - Self::min_inner_radius())
                / (Self::MAX_INDEX - Self::MIN_INDEX)
                * (index - Self::MIN_INDEX)
                + Self::min_inner_radius()
        };

        if !self.reverse_pulse {
            if self.pulse_index < Self::hold_start_index() {
                self.inner_radius = radius_at(self.pulse_index);
            }

            self.pulse_index += 1.0;
            if self.pulse_index > Self::MAX_INDEX {
                self.pulse_index = Self::hold_start_index();
                self.reverse_pulse = true;
            }
        } else {
            self.inner_radius = radius_at(self.pulse_index);

            self.pulse_index -= 1.0;
            if self.pulse_index < Self::MIN_INDEX {
                self.pulse_index = Self::MIN_INDEX;
                self.reverse_pulse = false;
            }
        }

        self.inner_radius
    }

    /// Advances the animation and rebuilds the marker circles under the
    /// given projection. Without a coordinate this does nothing.
    pub fn on_tick(&mut self, viewport: &dyn Viewport) {
        let Some(coordinate) = self.coordinate else {
            return;
        };

        let inner_radius = self.advance_pulse();
        let center = viewport.project(coordinate);
        self.outline_path = Some(path::circle(center, Self::OUTLINE_RADIUS));
        self.inner_path = Some(path::circle(center, inner_radius));
    }

    /// Draws the marker above the track overlay.
    ///
    /// In fog mode the outline disc is first erased out of the fog, so the
    /// marker sits on the revealed map rather than under the fog.
    pub fn draw(&self, target: &mut dyn DrawTarget, mode: RenderMode) {
        let (Some(outline), Some(inner)) = (&self.outline_path, &self.inner_path) else {
            return;
        };

        let outline_color = Color::rgba(1.0, 1.0, 1.0, 1.0);
        let inner_color = Color::rgba(0.036, 0.518, 0.996, 1.0);

        if mode == RenderMode::Fog {
            target.set_blend(Blend::Clear);
            target.stroke_path(outline, 1.0, outline_color);
            target.fill_path(outline, outline_color);
        }

        target.set_blend(Blend::Normal);

        target.stroke_path(outline, 1.0, outline_color);
        target.fill_path(outline, outline_color);

        target.stroke_path(inner, 1.0, inner_color);
        target.fill_path(inner, inner_color);
    }
}

impl Default for LocationMarker {
    fn default() -> Self {
        LocationMarker::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{Point, Rect};

    struct FixedViewport;

    impl Viewport for FixedViewport {
        fn project(&self, _coord: LatLon) -> Point<f64> {
            Point { x: 50.0, y: 50.0 }
        }

        fn bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 100.0)
        }
    }

    #[test]
    fn pulse_stays_within_its_radius_range() {
        let mut marker = LocationMarker::new();
        marker.update_coordinate(LatLon { lat: 0.0, lon: 0.0 });

        // Run through several full cycles.
        for _ in 0..500 {
            marker.on_tick(&FixedViewport);
            let r = marker.inner_radius();
            assert!(r >= LocationMarker::min_inner_radius() - 1e-9);
            assert!(r <= LocationMarker::max_inner_radius() + 1e-9);
        }
    }

    #[test]
    fn pulse_grows_then_shrinks() {
        let mut marker = LocationMarker::new();
        marker.update_coordinate(LatLon { lat: 0.0, lon: 0.0 });

        marker.on_tick(&FixedViewport);
        let start = marker.inner_radius();
        for _ in 0..60 {
            marker.on_tick(&FixedViewport);
        }
        let grown = marker.inner_radius();
        assert!(grown > start);

        // Past the top of the cycle, the pulse sweeps back down.
        for _ in 0..110 {
            marker.on_tick(&FixedViewport);
        }
        assert!(marker.inner_radius() < grown);
    }

    #[test]
    fn tick_without_coordinate_builds_nothing() {
        let mut marker = LocationMarker::new();
        marker.on_tick(&FixedViewport);
        assert!(marker.outline_path.is_none());
        assert!(marker.inner_path.is_none());
    }
}
