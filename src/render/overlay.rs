//! Module rendering each track as its own stroked polyline overlay, the way
//! the host map's built-in overlay machinery draws them.

use super::{Blend, Color, DrawTarget, RenderMode, Surface, TrackRenderer, Viewport};
use crate::geometry::path::{self, LineCap, LineJoin, Path};
use crate::geometry::{reduce, scale, Rect};
use crate::tracks::store::{TrackId, TrackStore};
use crate::tracks::LatLon;
use log::{error, info, trace};
use std::collections::HashMap;
use std::rc::Rc;

/// Renders each track as an individually colored stroked polyline.
///
/// This strategy delegates compositing to the host's overlay layer, which
/// cannot punch holes through the map: fog mode is rejected.
pub struct OverlayRenderer {
    mode: RenderMode,
    surface: Option<Rc<dyn Surface>>,
    /// Colors assigned to static tracks, stable across frames.
    colors: HashMap<TrackId, Color>,
    /// Color of the dynamic track.
    track_color: Color,
    /// Stroked polylines rebuilt on the last tick.
    polylines: Vec<(Path, Color)>,
    line_width: f64,
}

impl OverlayRenderer {
    /// Creates a renderer in [`RenderMode::Clear`] mode.
    pub fn new() -> Self {
        OverlayRenderer {
            mode: RenderMode::Clear,
            surface: None,
            colors: HashMap::new(),
            track_color: Color::rgba(1.0, 0.0, 0.0, 1.0),
            polylines: Vec::new(),
            line_width: 1.0,
        }
    }

    /// Builds the stroked ribbon of one track under the given projection.
    fn build_ribbon(track_coords: &[LatLon], viewport: &dyn Viewport) -> Path {
        let points = reduce::reduce_points(track_coords, |c| viewport.project(c));
        let mut ribbon = path::track_ribbon(&points);
        ribbon.line_join = LineJoin::Round;
        ribbon.line_cap = LineCap::Round;
        ribbon
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        OverlayRenderer::new()
    }
}

impl TrackRenderer for OverlayRenderer {
    fn open(&mut self, surface: Option<Rc<dyn Surface>>) -> bool {
        self.surface = surface;
        true
    }

    fn close(&mut self) {
        info!("Closing overlay renderer");
        self.surface = None;
        self.polylines.clear();
    }

    fn switch_mode(&mut self, mode: RenderMode) -> bool {
        if mode == RenderMode::Fog {
            error!("Overlay renderer does not support fog mode!");
            return false;
        }

        self.mode = mode;
        true
    }

    fn mode(&self) -> RenderMode {
        self.mode
    }

    fn on_tick(&mut self, store: &TrackStore, viewport: &dyn Viewport) {
        self.polylines.clear();

        for (id, track) in store.static_tracks() {
            let color = *self
                .colors
                .entry(id)
                .or_insert_with(Color::new_random);
            self.polylines
                .push((Self::build_ribbon(track.coords(), viewport), color));
        }

        if let Some(track) = store.dynamic_track() {
            self.polylines
                .push((Self::build_ribbon(track.coords(), viewport), self.track_color));
        }

        self.line_width = scale::line_width(|c| viewport.project(c));
        trace!(
            "Rebuilt {} polylines at width {:.1}",
            self.polylines.len(),
            self.line_width
        );

        if let Some(surface) = &self.surface {
            surface.set_needs_display();
        }
    }

    fn draw(&self, target: &mut dyn DrawTarget, _bounds: Rect) {
        target.set_blend(Blend::Normal);
        for (polyline, color) in &self.polylines {
            let color = color.with_alpha(0.5);
            target.stroke_path(polyline, self.line_width, color);
            target.fill_path(polyline, color);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Point;
    use crate::tracks::LatLon;

    struct FixedViewport;

    impl Viewport for FixedViewport {
        fn project(&self, coord: LatLon) -> Point<f64> {
            Point {
                x: coord.lon,
                y: coord.lat,
            }
        }

        fn bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 100.0)
        }
    }

    #[test]
    fn fog_mode_is_rejected_and_state_unchanged() {
        let mut renderer = OverlayRenderer::new();
        assert!(!renderer.switch_mode(RenderMode::Fog));
        assert_eq!(renderer.mode(), RenderMode::Clear);
    }

    #[test]
    fn clear_mode_is_accepted() {
        let mut renderer = OverlayRenderer::new();
        assert!(renderer.switch_mode(RenderMode::Clear));
        assert_eq!(renderer.mode(), RenderMode::Clear);
    }

    #[test]
    fn tick_builds_one_polyline_per_track() {
        let mut renderer = OverlayRenderer::new();
        let mut store = TrackStore::new();
        store.add_static(vec![
            LatLon { lat: 0.0, lon: 0.0 },
            LatLon { lat: 10.0, lon: 10.0 },
        ]);
        store.add_static(vec![
            LatLon { lat: 20.0, lon: 0.0 },
            LatLon { lat: 30.0, lon: 10.0 },
        ]);
        store.set_dynamic(vec![
            LatLon { lat: 50.0, lon: 0.0 },
            LatLon { lat: 60.0, lon: 10.0 },
        ]);

        renderer.on_tick(&store, &FixedViewport);
        assert_eq!(renderer.polylines.len(), 3);
    }

    #[test]
    fn static_track_colors_are_stable_across_ticks() {
        let mut renderer = OverlayRenderer::new();
        let mut store = TrackStore::new();
        let id = store.add_static(vec![
            LatLon { lat: 0.0, lon: 0.0 },
            LatLon { lat: 10.0, lon: 10.0 },
        ]);

        renderer.on_tick(&store, &FixedViewport);
        let first = renderer.colors[&id];
        renderer.on_tick(&store, &FixedViewport);
        assert_eq!(renderer.colors[&id], first);
    }
}
