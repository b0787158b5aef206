//! Module rendering all tracks into a single custom layer, supporting both
//! the plain and the fog-of-war compositing modes.

use super::{Blend, Color, DrawTarget, RenderMode, Surface, TrackRenderer, Viewport};
use crate::geometry::path::{self, LineCap, LineJoin, Path};
use crate::geometry::{reduce, scale, Rect};
use crate::tracks::store::TrackStore;
use crate::tracks::Track;
use log::{info, trace};
use std::rc::Rc;

/// Renders the whole track set into one custom layer.
///
/// The layer owns the merged ribbon path and composites it above the map:
/// plain translucent strokes in clear mode, or an opaque fog sheet with the
/// tracks erased out of it in fog mode.
pub struct LayerRenderer {
    mode: RenderMode,
    layer: TrackLayer,
}

/// Drawable state of the custom layer: the merged path built on the last
/// tick, and the stroke width to apply.
struct TrackLayer {
    surface: Option<Rc<dyn Surface>>,
    track_path: Path,
    line_width: f64,
    fog_color: Color,
    track_color: Color,
}

impl LayerRenderer {
    /// Creates a renderer in [`RenderMode::Clear`] mode.
    pub fn new() -> Self {
        LayerRenderer {
            mode: RenderMode::Clear,
            layer: TrackLayer {
                surface: None,
                track_path: Path::new(),
                line_width: 1.0,
                fog_color: Color::rgba(0.33, 0.33, 0.33, 1.0),
                track_color: Color::rgba(1.0, 0.0, 0.0, 1.0),
            },
        }
    }

    /// Builds the ribbon of one track under the given projection.
    fn generate_track(track: &Track, viewport: &dyn Viewport) -> Path {
        let points = reduce::reduce_points(track.coords(), |c| viewport.project(c));
        path::track_ribbon(&points)
    }
}

impl Default for LayerRenderer {
    fn default() -> Self {
        LayerRenderer::new()
    }
}

impl TrackRenderer for LayerRenderer {
    fn open(&mut self, surface: Option<Rc<dyn Surface>>) -> bool {
        self.layer.surface = surface;
        true
    }

    fn close(&mut self) {
        info!("Closing layer renderer");
        self.layer.surface = None;
        self.layer.track_path = Path::new();
    }

    fn switch_mode(&mut self, mode: RenderMode) -> bool {
        self.mode = mode;
        true
    }

    fn mode(&self) -> RenderMode {
        self.mode
    }

    fn on_tick(&mut self, store: &TrackStore, viewport: &dyn Viewport) {
        let mut track_path = Path::new();

        for track in store.active_tracks() {
            track_path.append(Self::generate_track(track, viewport));
        }

        track_path.line_join = LineJoin::Round;
        track_path.line_cap = LineCap::Round;

        self.layer.line_width = scale::line_width(|c| viewport.project(c));
        trace!(
            "Rebuilt layer path ({} elements) at width {:.1}",
            track_path.elements().len(),
            self.layer.line_width
        );
        self.layer.track_path = track_path;

        if let Some(surface) = &self.layer.surface {
            surface.set_needs_display();
        }
    }

    fn draw(&self, target: &mut dyn DrawTarget, bounds: Rect) {
        self.layer.draw(self.mode, target, bounds);
    }
}

impl TrackLayer {
    /// Draws the layer contents onto the given context.
    ///
    /// Fog mode paints the whole viewport with translucent fog, then erases
    /// the track path out of it so the map shows through along traveled
    /// paths. Clear mode strokes the path with a translucent track color.
    fn draw(&self, mode: RenderMode, target: &mut dyn DrawTarget, bounds: Rect) {
        match mode {
            RenderMode::Fog => {
                target.set_blend(Blend::Normal);
                target.fill_rect(bounds, self.fog_color.with_alpha(0.75));
                target.set_blend(Blend::Clear);
            }
            RenderMode::Clear => {
                target.set_blend(Blend::Normal);
            }
        }

        let color = self.track_color.with_alpha(0.5);
        target.stroke_path(&self.track_path, self.line_width, color);
        target.fill_path(&self.track_path, color);

        target.set_blend(Blend::Normal);
    }
}
