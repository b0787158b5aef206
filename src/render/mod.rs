//! Module to render travel tracks as a fog-of-war overlay above a map
//! viewport.

pub mod camera;
pub mod debounce;
pub mod engine;
pub mod layer;
pub mod marker;
pub mod overlay;
pub mod pixmap;

use crate::geometry::path::Path;
use crate::geometry::{Point, Rect};
use crate::tracks::store::TrackStore;
use crate::tracks::LatLon;
use clap::ValueEnum;
use rand::distr::Open01;
use rand::{rng, Rng};
use std::rc::Rc;

/// How the track overlay is composited above the map.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Tracks are drawn as plain translucent strokes.
    Clear,
    /// The viewport is covered with fog; tracks are erased out of it,
    /// revealing the map along traveled paths.
    Fog,
}

/// Which rendering strategy backs the overlay.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererKind {
    /// One stroked polyline per track, drawn by the host's overlay
    /// machinery. Does not support [`RenderMode::Fog`].
    Overlay,
    /// A single custom layer compositing all tracks at once.
    Layer,
}

/// RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    /// Creates a color from its RGBA components, each in `[0, 1]`.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color([r, g, b, a])
    }

    /// Creates a new random opaque color.
    pub fn new_random() -> Self {
        let mut rng = rng();
        let r = rng.sample(Open01);
        let g = rng.sample(Open01);
        let b = rng.sample(Open01);
        Self([r, g, b, 1.0])
    }

    /// Returns the same color with the given alpha component.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color([self.0[0], self.0[1], self.0[2], alpha])
    }
}

/// Compositing mode applied by a [`DrawTarget`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Source-over alpha compositing.
    Normal,
    /// Erases the destination wherever the source covers it.
    Clear,
}

/// The hosting map widget's view of the world: a synchronous
/// coordinate-to-pixel projection reflecting the current pan/zoom.
pub trait Viewport {
    /// Projects a geographic coordinate to window pixel coordinates.
    fn project(&self, coord: LatLon) -> Point<f64>;
    /// Returns the visible window rectangle, in pixels.
    fn bounds(&self) -> Rect;
}

/// A drawable surface that can be told its contents are stale.
///
/// The host redraws dirty surfaces on its own schedule by calling back into
/// the renderer's draw routine.
pub trait Surface {
    /// Marks the surface as needing a redraw.
    fn set_needs_display(&self);
}

/// The periodic callback producer driving per-frame updates.
pub trait TickSource {
    /// Adjusts the tick cadence. A rate of 0 restores the platform's default
    /// full rate.
    fn set_frames_per_second(&self, frames_per_second: u32);
}

/// A raw drawing context handed to the renderer when a dirty surface is
/// redrawn.
pub trait DrawTarget {
    /// Switches the compositing mode for subsequent operations.
    fn set_blend(&mut self, blend: Blend);
    /// Fills a rectangle with the given color.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Strokes a path with the given width and color, honoring the path's
    /// join and cap styles.
    fn stroke_path(&mut self, path: &Path, width: f64, color: Color);
    /// Fills a path with the given color.
    fn fill_path(&mut self, path: &Path, color: Color);
}

/// A rendering strategy: rebuilds drawable track geometry on each frame tick
/// and draws it when the host redraws the surface.
pub trait TrackRenderer {
    /// Acquires the strategy's on-screen resources, attaching it to the
    /// given surface.
    fn open(&mut self, surface: Option<Rc<dyn Surface>>) -> bool;

    /// Releases the strategy's on-screen resources, detaching it from its
    /// surface.
    fn close(&mut self);

    /// Requests a render mode change. Returns whether the strategy accepted
    /// the mode.
    fn switch_mode(&mut self, mode: RenderMode) -> bool;

    /// Returns the current render mode.
    fn mode(&self) -> RenderMode;

    /// Rebuilds the drawable geometry from the given tracks and viewport,
    /// and marks the attached surface dirty.
    fn on_tick(&mut self, store: &TrackStore, viewport: &dyn Viewport);

    /// Draws the last built geometry onto the given context.
    fn draw(&self, target: &mut dyn DrawTarget, bounds: Rect);
}
