//! Module to reduce a GPS track to the minimal set of screen points worth
//! drawing at the current pan/zoom level.

use super::{pixel_distance, Point};
use crate::tracks::LatLon;

/// Projects the given coordinates and drops every point that lands within
/// one pixel of the previously kept point.
///
/// The projection depends on the current pan/zoom, so the reduction must be
/// re-run on every frame. The first point is always kept; a single input
/// point yields a single output point.
pub fn reduce_points<F>(coords: &[LatLon], project: F) -> Vec<Point<f64>>
where
    F: Fn(LatLon) -> Point<f64>,
{
    let mut points: Vec<Point<f64>> = Vec::new();

    for &coord in coords {
        let point = project(coord);
        let keep = match points.last() {
            None => true,
            // Points closer than 1 pixel needn't be drawn.
            Some(&last) => pixel_distance(last, point) >= 1.0,
        };
        if keep {
            points.push(point);
        }
    }

    points
}
