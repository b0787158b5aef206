//! Configuration utilities.

use anyhow::Context;
use clap::builder;
use clap::error::ErrorKind;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Description of a demo scenario: the window, the initial camera view, the
/// tracks to show and an optional route to replay.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    /// Window width, in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Window height, in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Initial camera center, as a `[latitude, longitude]` pair.
    pub center: [f64; 2],
    /// Initial zoom level, in pixels per Mercator unit.
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Completed tracks, each a list of `[latitude, longitude]` pairs.
    #[serde(default)]
    pub tracks: Vec<Vec<[f64; 2]>>,
    /// In-progress route, replayed point by point over the simulation.
    #[serde(default)]
    pub route: Vec<[f64; 2]>,
    /// Camera drag per frame, in pixels.
    #[serde(default)]
    pub pan: Option<[f64; 2]>,
    /// Scroll amount applied every frame, in mouse-wheel steps.
    #[serde(default)]
    pub scroll: Option<f64>,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_zoom() -> f64 {
    /* 2^24 */ 16_777_216.0
}

impl Scenario {
    /// Reads a scenario from the given JSON file.
    fn read_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to read scenario from: {}", path.display()))?;
        let reader = BufReader::new(file);
        let scenario: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse scenario from: {}", path.display()))?;

        Ok(scenario)
    }
}

impl Default for Scenario {
    /// A built-in scenario: a short walk around a block, with a route
    /// growing along the same streets.
    fn default() -> Self {
        Scenario {
            width: default_width(),
            height: default_height(),
            center: [22.629052, 114.136977],
            zoom: default_zoom(),
            tracks: vec![vec![
                [22.629052, 114.136977],
                [22.629180, 114.137098],
                [22.629519, 114.137098],
                [22.629619, 114.136577],
                [22.629052, 114.136977],
            ]],
            route: vec![
                [22.629052, 114.136977],
                [22.628852, 114.136677],
                [22.628652, 114.136877],
                [22.628452, 114.136577],
            ],
            pan: Some([0.5, 0.2]),
            scroll: None,
        }
    }
}

/// Helper struct to parse a [`Scenario`] directly from a Clap argument.
#[derive(Clone)]
pub struct ScenarioParser;

impl builder::TypedValueParser for ScenarioParser {
    type Value = Scenario;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        Scenario::read_from_file(value).map_err(|e| {
            let arg_str = arg.map(|a| a.to_string());
            let msg = format!(
                "Failed to parse scenario{}{}: {}\n",
                arg_str.map(|a| format!(" ({})", a)).unwrap_or_default(),
                value
                    .to_str()
                    .map(|f| format!(" from file `{}`", f))
                    .unwrap_or_default(),
                e
            );
            clap::Error::raw(ErrorKind::Io, msg).with_cmd(cmd)
        })
    }
}

impl builder::ValueParserFactory for Scenario {
    type Parser = ScenarioParser;

    fn value_parser() -> Self::Parser {
        ScenarioParser
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scenario_parses_with_defaults() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "center": [22.6, 114.1],
                "tracks": [[[22.6, 114.1], [22.7, 114.2]]]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.width, 640);
        assert_eq!(scenario.height, 480);
        assert_eq!(scenario.tracks.len(), 1);
        assert!(scenario.route.is_empty());
        assert!(scenario.pan.is_none());
    }

    #[test]
    fn default_scenario_has_a_closed_walk() {
        let scenario = Scenario::default();
        assert!(!scenario.tracks.is_empty());
        let walk = &scenario.tracks[0];
        assert_eq!(walk.first(), walk.last());
    }
}
