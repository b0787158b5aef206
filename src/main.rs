//! WorldRoad - reveal the world along your tracks!
//!
//! Headless demo: replays a scenario through the rendering engine over a
//! simulated frame clock, and writes the final overlay frame as a PNG.

#![forbid(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use log::{debug, info, trace};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use worldroad::cli::Cli;
use worldroad::config::Scenario;
use worldroad::render::camera::Camera;
use worldroad::render::debounce::RefreshRateController;
use worldroad::render::engine::RendererEngine;
use worldroad::render::pixmap::{DirtyFlag, Pixmap};
use worldroad::render::TickSource;
use worldroad::tracks::{geojson, LatLon};

/// Simulated frame duration (60 fps).
const FRAME: Duration = Duration::from_millis(16);

/// Tick source of the simulated frame loop.
#[derive(Default)]
struct SimTicks {
    frames_per_second: Cell<u32>,
}

impl TickSource for SimTicks {
    fn set_frames_per_second(&self, frames_per_second: u32) {
        self.frames_per_second.set(frames_per_second);
    }
}

impl SimTicks {
    /// Checks whether the given frame gets a tick at the current rate.
    fn ticks_at(&self, frame: u32) -> bool {
        match self.frames_per_second.get() {
            RefreshRateController::FULL_RATE => true,
            fps => frame % (60 / fps.min(60)) == 0,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Cli {
        scenario,
        geojson_files,
        kind,
        mode,
        frames,
        idle_window_secs,
        output,
    } = Cli::parse();

    let scenario = scenario.unwrap_or_default();

    // Collaborators: the viewport, the surface and the tick source.
    let camera = Rc::new(RefCell::new(Camera::new(scenario.width, scenario.height)));
    {
        let mut camera = camera.borrow_mut();
        camera.look_at(coord(scenario.center));
        camera.set_zoom(scenario.zoom);
    }
    let surface = Rc::new(DirtyFlag::new());
    let ticks = Rc::new(SimTicks::default());

    let mut controller = RefreshRateController::with_idle_window(
        ticks.clone(),
        Duration::from_secs(idle_window_secs),
    );

    let mut engine = RendererEngine::new(kind, mode);
    engine.attach_viewport(camera.clone());
    engine.attach_surface(surface.clone());
    info!(
        "Rendering with the {:?} strategy in {:?} mode",
        engine.kind(),
        engine.mode()
    );

    for track in &scenario.tracks {
        let id = engine.add_static_track(track.iter().copied().map(coord).collect());
        debug!("Added scenario track #{id}");
    }
    for path in &geojson_files {
        for track in geojson::read_tracks(path)
            .with_context(|| format!("Failed to load tracks from {path}"))?
        {
            let id = engine.add_static_track(track.coords().to_vec());
            debug!("Added GeoJSON track #{id} from {path}");
        }
    }

    let route: Vec<LatLon> = scenario.route.iter().copied().map(coord).collect();

    let mut pixmap = Pixmap::new(scenario.width, scenario.height);
    let mut now = Instant::now();
    let mut drawn_frames = 0usize;

    controller.on_activity(now);

    for frame in 0..frames {
        // Scripted camera movement counts as activity.
        let mut moved = false;
        if let Some([dx, dy]) = scenario.pan {
            camera.borrow_mut().drag_relative(dx, dy);
            moved = true;
        }
        if let Some(scroll) = scenario.scroll {
            camera.borrow_mut().scroll(scroll);
            moved = true;
        }

        // The route grows by one point every second of simulated time.
        let visited = (frame / 60 + 2).min(route.len() as u32) as usize;
        if visited >= 2 {
            engine.update_dynamic_track(route[..visited].to_vec());
            engine.update_location(route[visited - 1]);
            moved = true;
        }

        if moved {
            controller.on_activity(now);
        }
        controller.poll(now);

        if ticks.ticks_at(frame) {
            trace!("[{frame}] Tick");
            engine.on_tick();
        }

        if surface.take() {
            trace!("[{frame}] Render");
            pixmap.clear();
            engine.draw(&mut pixmap);
            drawn_frames += 1;
        }

        now += FRAME;
    }

    info!(
        "Drawn {drawn_frames} frames; {:.1}% of the final frame is transparent",
        pixmap.transparent_ratio() * 100.0
    );

    pixmap.save_png(&output)?;
    info!("Wrote final frame to {output}");

    Ok(())
}

/// Converts a `[latitude, longitude]` pair into a coordinate.
fn coord(pair: [f64; 2]) -> LatLon {
    LatLon {
        lat: pair[0],
        lon: pair[1],
    }
}
