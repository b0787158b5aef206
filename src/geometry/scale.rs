//! Module to derive an on-screen stroke width from a fixed real-world
//! distance, so that tracks keep their physical width across zoom levels.

use super::{pixel_distance, Point};
use crate::tracks::LatLon;

/// First reference coordinate.
const REFERENCE_A: LatLon = LatLon {
    lat: 22.629052,
    lon: 114.136977,
};

/// Second reference coordinate. The distance between the two reference
/// points on the map is about 28m.
const REFERENCE_B: LatLon = LatLon {
    lat: 22.629180,
    lon: 114.137098,
};

/// Returns the stroke width, in pixels, corresponding to the reference
/// real-world distance under the given projection.
///
/// Zoomed out, the projected separation shrinks and the width bottoms out at
/// 1 pixel; zoomed in, it grows proportionally. The projection changes with
/// every pan/zoom, so this is recomputed on each frame.
pub fn line_width<F>(project: F) -> f64
where
    F: Fn(LatLon) -> Point<f64>,
{
    let a = project(REFERENCE_A);
    let b = project(REFERENCE_B);

    let distance = pixel_distance(a, b);
    if distance < 1.0 {
        1.0
    } else {
        distance
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn width_is_floored_at_one_pixel() {
        // A projection collapsing everything to a single point, as when the
        // map is fully zoomed out.
        let collapse = |_: LatLon| Point { x: 42.0, y: 42.0 };
        assert_eq!(line_width(collapse), 1.0);
    }

    #[test]
    fn width_grows_with_zoom() {
        let zoomed = |scale: f64| {
            move |coord: LatLon| Point {
                x: coord.lon * scale,
                y: coord.lat * scale,
            }
        };

        let narrow = line_width(zoomed(1.0e4));
        let wide = line_width(zoomed(1.0e6));
        assert!(narrow >= 1.0);
        assert!(wide > narrow);
        // Projection is linear, so the width scales linearly once above the
        // floor.
        assert!((wide / narrow - 100.0).abs() < 1.0);
    }
}
