//! Module orchestrating the per-frame rendering: owns the track store, the
//! active rendering strategy and the location marker, and drives them from
//! the host's frame ticks.

use super::layer::LayerRenderer;
use super::marker::LocationMarker;
use super::overlay::OverlayRenderer;
use super::{DrawTarget, RenderMode, RendererKind, Surface, TrackRenderer, Viewport};
use crate::tracks::store::{TrackId, TrackStore};
use crate::tracks::LatLon;
use log::{debug, info, trace};
use std::rc::Rc;

/// Owns the rendering state and rebuilds the drawable overlay on each frame
/// tick.
///
/// The engine is an explicitly owned instance: whoever owns the map viewport
/// creates one, attaches the collaborators, and forwards frame ticks to it.
pub struct RendererEngine {
    store: TrackStore,
    kind: RendererKind,
    renderer: Box<dyn TrackRenderer>,
    marker: LocationMarker,
    viewport: Option<Rc<dyn Viewport>>,
    surface: Option<Rc<dyn Surface>>,
}

impl RendererEngine {
    /// Creates an engine backed by the given strategy, attempting to start
    /// in the given mode.
    ///
    /// If the strategy rejects the mode (the overlay strategy does not
    /// support fog), the engine starts in [`RenderMode::Clear`]; the
    /// rejection is logged.
    pub fn new(kind: RendererKind, mode: RenderMode) -> Self {
        let mut renderer = Self::create_renderer(kind);
        renderer.switch_mode(mode);
        renderer.open(None);

        RendererEngine {
            store: TrackStore::new(),
            kind,
            renderer,
            marker: LocationMarker::new(),
            viewport: None,
            surface: None,
        }
    }

    /// Instantiates a strategy of the given kind, in its default mode.
    fn create_renderer(kind: RendererKind) -> Box<dyn TrackRenderer> {
        match kind {
            RendererKind::Overlay => Box::new(OverlayRenderer::new()),
            RendererKind::Layer => Box::new(LayerRenderer::new()),
        }
    }

    /// Attaches the viewport used to project coordinates. Until one is
    /// attached, ticks and draws are no-ops.
    pub fn attach_viewport(&mut self, viewport: Rc<dyn Viewport>) {
        self.viewport = Some(viewport);
    }

    /// Attaches the drawable surface, re-opening the active strategy on it.
    pub fn attach_surface(&mut self, surface: Rc<dyn Surface>) {
        self.renderer.close();
        self.surface = Some(surface);
        self.renderer.open(self.surface.clone());
    }

    /// Returns the kind of the active strategy.
    pub fn kind(&self) -> RendererKind {
        self.kind
    }

    /// Returns the current render mode.
    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    /// Requests a render mode change on the active strategy. Returns whether
    /// the mode was accepted.
    pub fn switch_mode(&mut self, mode: RenderMode) -> bool {
        self.renderer.switch_mode(mode)
    }

    /// Switches to the given strategy, releasing the current strategy's
    /// resources first.
    ///
    /// Switching to the already-active kind does nothing. The new strategy
    /// starts in its default [`RenderMode::Clear`] mode; callers wanting
    /// another mode switch it explicitly afterwards.
    pub fn switch_kind(&mut self, kind: RendererKind) {
        if self.kind == kind {
            // Do nothing
            return;
        }

        info!("Switching track renderer to {kind:?}");

        // Release the resource
        self.renderer.close();

        self.kind = kind;
        self.renderer = Self::create_renderer(kind);
        self.renderer.open(self.surface.clone());
    }

    /// Replaces the in-progress route wholesale. An empty sequence clears
    /// it.
    pub fn update_dynamic_track(&mut self, coords: Vec<LatLon>) {
        self.store.set_dynamic(coords);
    }

    /// Stores a completed track and returns its identifier.
    pub fn add_static_track(&mut self, coords: Vec<LatLon>) -> TrackId {
        self.store.add_static(coords)
    }

    /// Removes the static track with the given identifier, if present.
    pub fn remove_static_track(&mut self, id: TrackId) {
        self.store.remove_static(id);
    }

    /// Removes all static tracks.
    pub fn remove_all_static_tracks(&mut self) {
        self.store.remove_all_static();
    }

    /// Returns the track store.
    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    /// Moves the location marker to the given coordinate.
    pub fn update_location(&mut self, coordinate: LatLon) {
        self.marker.update_coordinate(coordinate);
    }

    /// Rebuilds the drawable overlay from the current tracks and viewport,
    /// and marks the surface dirty.
    ///
    /// Without an attached viewport this is a no-op, not an error: the frame
    /// is skipped entirely.
    pub fn on_tick(&mut self) {
        let Some(viewport) = &self.viewport else {
            // Do nothing
            trace!("Tick without a viewport, skipping frame");
            return;
        };

        self.renderer.on_tick(&self.store, viewport.as_ref());
        self.marker.on_tick(viewport.as_ref());
    }

    /// Draws the last built overlay onto the given context.
    ///
    /// Invoked by the host when it redraws a surface previously marked
    /// dirty. Without an attached viewport this is a no-op.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        let Some(viewport) = &self.viewport else {
            return;
        };

        let bounds = viewport.bounds();
        self.renderer.draw(target, bounds);
        self.marker.draw(target, self.renderer.mode());
        debug!("Drawn overlay frame");
    }
}

impl Drop for RendererEngine {
    fn drop(&mut self) {
        self.renderer.close();
    }
}
