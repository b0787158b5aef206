//! Module to extract travel tracks from a GeoJSON file.

use super::{LatLon, Track};
use anyhow::Context;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, LineStringType, Value};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

struct GeoJsonFile {
    inner: GeoJson,
}

impl GeoJsonFile {
    /// Parses the given GeoJSON file.
    fn read_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open GeoJSON file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let geojson = geojson::GeoJson::from_reader(reader)
            .with_context(|| format!("Failed to parse GeoJSON file: {}", path.display()))?;

        Ok(Self { inner: geojson })
    }
}

impl From<&LineStringType> for Track {
    fn from(line: &LineStringType) -> Self {
        let coords = line
            .iter()
            .map(|point| LatLon {
                lat: point[1],
                lon: point[0],
            })
            .collect();
        Track::new(coords)
    }
}

impl From<GeoJsonFile> for Vec<Track> {
    fn from(geo: GeoJsonFile) -> Self {
        fn visit_feature_collection(collection: &FeatureCollection, tracks: &mut Vec<Track>) {
            for feature in &collection.features {
                visit_feature(feature, tracks);
            }
        }

        fn visit_feature(feature: &Feature, tracks: &mut Vec<Track>) {
            if let Some(geometry) = &feature.geometry {
                visit_geometry(geometry, tracks);
            }
        }

        fn visit_geometry(geometry: &Geometry, tracks: &mut Vec<Track>) {
            match &geometry.value {
                Value::LineString(line) => {
                    tracks.push(Track::from(line));
                }
                Value::MultiLineString(lines) => {
                    for line in lines {
                        tracks.push(Track::from(line));
                    }
                }
                Value::Point(_)
                | Value::MultiPoint(_)
                | Value::Polygon(_)
                | Value::MultiPolygon(_) => (),
                Value::GeometryCollection(collection) => {
                    for geometry in collection {
                        visit_geometry(geometry, tracks);
                    }
                }
            }
        }

        let mut tracks = Vec::new();
        match &geo.inner {
            GeoJson::FeatureCollection(collection) => {
                visit_feature_collection(collection, &mut tracks)
            }
            GeoJson::Feature(feature) => visit_feature(feature, &mut tracks),
            GeoJson::Geometry(geometry) => visit_geometry(geometry, &mut tracks),
        }
        tracks
    }
}

/// Reads and parses the tracks contained in the given GeoJSON file.
pub fn read_tracks<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Track>> {
    let tracks = Vec::<Track>::from(GeoJsonFile::read_from_file(path)?);
    debug!("GeoJson has {} tracks", tracks.len());
    Ok(tracks)
}
