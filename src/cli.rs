//! Command-line interface.

use crate::config::Scenario;
use crate::render::{RenderMode, RendererKind};
use clap::Parser;

/// Render your world roads.
#[derive(Parser, Debug)]
#[command(name = "WorldRoad")]
#[command(version)]
#[command(about = "Reveal the world along your tracks", long_about = None)]
pub struct Cli {
    /// JSON file describing the demo scenario.
    #[arg(long = "scenario", value_parser = clap::value_parser!(Scenario))]
    pub scenario: Option<Scenario>,

    /// GeoJSON file(s) with additional completed tracks.
    #[arg(long = "geojson", short = 'f', value_delimiter = ',')]
    pub geojson_files: Vec<String>,

    /// Rendering strategy backing the overlay.
    #[arg(long, value_enum, default_value_t = RendererKind::Layer)]
    pub kind: RendererKind,

    /// Render mode to start in.
    #[arg(long, value_enum, default_value_t = RenderMode::Fog)]
    pub mode: RenderMode,

    /// Number of simulated frames to run.
    #[arg(long, default_value_t = 180, value_parser = clap::value_parser!(u32).range(1..=100_000))]
    pub frames: u32,

    /// Idle window, in seconds, before the tick rate drops.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub idle_window_secs: u64,

    /// Path of the PNG file to write the final frame to.
    #[arg(long, short = 'o', default_value = "worldroad.png")]
    pub output: String,
}
