//! Module to build drawable paths: track ribbons, circles and callout
//! bubbles, expressed as a flat list of path elements.

use super::{Point, Size};
use std::f64::consts::PI;

/// Style applied where two path segments meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    /// Sharp corner.
    Miter,
    /// Rounded corner.
    Round,
    /// Flattened corner.
    Bevel,
}

/// Style applied at the open ends of a stroked path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    /// Squared-off end at the last point.
    Butt,
    /// Semi-circular end.
    Round,
    /// Squared-off end extending past the last point.
    Square,
}

/// A single drawing instruction in a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathElement {
    /// Starts a new sub-path at the given point.
    MoveTo(Point<f64>),
    /// Draws a straight segment from the current point.
    LineTo(Point<f64>),
    /// Draws a circular arc. Angles are in radians, measured with the Y axis
    /// pointing down, so increasing angles sweep clockwise on screen.
    Arc {
        /// Center of the arc's circle.
        center: Point<f64>,
        /// Radius of the arc's circle.
        radius: f64,
        /// Angle of the arc's starting point.
        start_angle: f64,
        /// Angle of the arc's ending point.
        end_angle: f64,
        /// Whether the sweep goes clockwise on screen.
        clockwise: bool,
    },
    /// Closes the current sub-path back to its starting point.
    Close,
}

/// An ordered list of drawing instructions, with stroke styling.
#[derive(Clone, Debug)]
pub struct Path {
    elements: Vec<PathElement>,
    /// Join style used when the path is stroked.
    pub line_join: LineJoin,
    /// Cap style used when the path is stroked.
    pub line_cap: LineCap,
}

impl Default for Path {
    fn default() -> Self {
        Path::new()
    }
}

impl Path {
    /// Angular step used when flattening arcs into line segments.
    const ARC_STEP: f64 = PI / 24.0;

    /// Creates an empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
        }
    }

    /// Starts a new sub-path at the given point.
    pub fn move_to(&mut self, point: Point<f64>) {
        self.elements.push(PathElement::MoveTo(point));
    }

    /// Draws a straight segment from the current point.
    pub fn line_to(&mut self, point: Point<f64>) {
        self.elements.push(PathElement::LineTo(point));
    }

    /// Draws a circular arc, connected to the current point if there is one.
    pub fn arc(
        &mut self,
        center: Point<f64>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) {
        self.elements.push(PathElement::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        });
    }

    /// Closes the current sub-path.
    pub fn close(&mut self) {
        self.elements.push(PathElement::Close);
    }

    /// Appends all elements of another path, keeping this path's styling.
    pub fn append(&mut self, other: Path) {
        self.elements.extend(other.elements);
    }

    /// Checks whether the path contains any element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the path's drawing instructions.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Flattens the path into polylines, sampling arcs into straight
    /// segments.
    pub fn flatten(&self) -> Vec<Polyline> {
        let mut polylines = Vec::new();
        let mut current = Polyline::new();

        for element in &self.elements {
            match *element {
                PathElement::MoveTo(point) => {
                    if !current.points.is_empty() {
                        polylines.push(std::mem::replace(&mut current, Polyline::new()));
                    }
                    current.points.push(point);
                }
                PathElement::LineTo(point) => {
                    current.points.push(point);
                }
                PathElement::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    clockwise,
                } => {
                    sample_arc(
                        &mut current.points,
                        center,
                        radius,
                        start_angle,
                        end_angle,
                        clockwise,
                    );
                }
                PathElement::Close => {
                    current.closed = true;
                    polylines.push(std::mem::replace(&mut current, Polyline::new()));
                }
            }
        }

        if !current.points.is_empty() {
            polylines.push(current);
        }

        polylines
    }
}

/// A flattened sub-path: straight segments only.
#[derive(Clone, Debug)]
pub struct Polyline {
    /// Vertices of the sub-path, in drawing order.
    pub points: Vec<Point<f64>>,
    /// Whether the sub-path loops back to its first vertex.
    pub closed: bool,
}

impl Polyline {
    fn new() -> Self {
        Polyline {
            points: Vec::new(),
            closed: false,
        }
    }
}

/// Samples an arc into line segments appended to the given vertex list.
fn sample_arc(
    points: &mut Vec<Point<f64>>,
    center: Point<f64>,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    clockwise: bool,
) {
    // Normalize the sweep to the requested direction.
    let mut sweep = end_angle - start_angle;
    if clockwise {
        while sweep < 0.0 {
            sweep += 2.0 * PI;
        }
    } else {
        while sweep > 0.0 {
            sweep -= 2.0 * PI;
        }
    }

    let steps = (sweep.abs() / Path::ARC_STEP).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let angle = start_angle + sweep * (i as f64) / (steps as f64);
        points.push(Point {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        });
    }
}

/// Builds the closed "there-and-back" ribbon outline of a track.
///
/// The outline moves to the first point, runs through all points forward,
/// then through all points in reverse, and closes. The resulting path has
/// zero area; the stroke width applied when drawing gives it its visible
/// thickness.
pub fn track_ribbon(points: &[Point<f64>]) -> Path {
    let mut path = Path::new();

    if let Some(&first) = points.first() {
        path.move_to(first);
    }
    for &point in points {
        path.line_to(point);
    }
    for &point in points.iter().rev() {
        path.line_to(point);
    }

    if !points.is_empty() {
        path.close();
    }

    path
}

/// Builds a full circle, swept clockwise from angle 0.
pub fn circle(center: Point<f64>, radius: f64) -> Path {
    let mut path = Path::new();
    path.arc(center, radius, 0.0, 2.0 * PI, true);
    path.close();
    path
}

/// Builds a rectangle with rounded corners.
pub fn rounded_rect(origin: Point<f64>, size: Size, corner_radius: f64) -> Path {
    let r = corner_radius;
    let mut path = Path::new();

    path.move_to(Point {
        x: origin.x + r,
        y: origin.y,
    });
    path.line_to(Point {
        x: origin.x + size.width - r,
        y: origin.y,
    });
    path.arc(
        Point {
            x: origin.x + size.width - r,
            y: origin.y + r,
        },
        r,
        PI * 1.5,
        0.0,
        true,
    );
    path.line_to(Point {
        x: origin.x + size.width,
        y: origin.y + size.height - r,
    });
    path.arc(
        Point {
            x: origin.x + size.width - r,
            y: origin.y + size.height - r,
        },
        r,
        0.0,
        PI * 0.5,
        true,
    );
    path.line_to(Point {
        x: origin.x + r,
        y: origin.y + size.height,
    });
    path.arc(
        Point {
            x: origin.x + r,
            y: origin.y + size.height - r,
        },
        r,
        PI * 0.5,
        PI,
        true,
    );
    path.line_to(Point {
        x: origin.x,
        y: origin.y + r,
    });
    path.arc(
        Point {
            x: origin.x + r,
            y: origin.y + r,
        },
        r,
        PI,
        PI * 1.5,
        true,
    );
    path.close();

    path
}

/// Builds a speech-bubble callout: a rounded rectangle with a centered
/// triangular tab on its bottom edge.
///
/// The tab occupies the bottom `tab_height` pixels of `size`; the rounded
/// body fills the rest. Four straight edges and four quarter arcs, all
/// derived from the parameters.
pub fn callout(origin: Point<f64>, size: Size, tab_height: f64, corner_radius: f64) -> Path {
    let r = corner_radius;
    let body_bottom = origin.y + size.height - tab_height;
    let mut path = Path::new();
    path.line_join = LineJoin::Round;

    path.move_to(Point {
        x: origin.x + r,
        y: origin.y,
    });
    // Top edge and top-right corner.
    path.line_to(Point {
        x: origin.x + size.width - r,
        y: origin.y,
    });
    path.arc(
        Point {
            x: origin.x + size.width - r,
            y: origin.y + r,
        },
        r,
        PI * 1.5,
        0.0,
        true,
    );
    // Right edge and bottom-right corner.
    path.line_to(Point {
        x: origin.x + size.width,
        y: body_bottom - r,
    });
    path.arc(
        Point {
            x: origin.x + size.width - r,
            y: body_bottom - r,
        },
        r,
        0.0,
        PI * 0.5,
        true,
    );
    // Bottom edge with the centered tab.
    path.line_to(Point {
        x: origin.x + (size.width + tab_height) / 2.0,
        y: body_bottom,
    });
    path.line_to(Point {
        x: origin.x + size.width / 2.0,
        y: origin.y + size.height,
    });
    path.line_to(Point {
        x: origin.x + (size.width - tab_height) / 2.0,
        y: body_bottom,
    });
    path.line_to(Point {
        x: origin.x + r,
        y: body_bottom,
    });
    path.arc(
        Point {
            x: origin.x + r,
            y: body_bottom - r,
        },
        r,
        PI * 0.5,
        PI,
        true,
    );
    // Left edge and top-left corner.
    path.line_to(Point {
        x: origin.x,
        y: origin.y + r,
    });
    path.arc(
        Point {
            x: origin.x + r,
            y: origin.y + r,
        },
        r,
        PI,
        PI * 1.5,
        true,
    );
    path.close();

    path
}

#[cfg(test)]
mod test {
    use super::*;

    fn line_count(path: &Path) -> usize {
        path.elements()
            .iter()
            .filter(|e| matches!(e, PathElement::LineTo(_)))
            .count()
    }

    #[test]
    fn ribbon_of_empty_input_is_empty() {
        let path = track_ribbon(&[]);
        assert!(path.is_empty());
    }

    #[test]
    fn ribbon_of_single_point_is_degenerate_but_closed() {
        let point = Point { x: 4.0, y: 2.0 };
        let path = track_ribbon(&[point]);

        assert_eq!(path.elements().first(), Some(&PathElement::MoveTo(point)));
        assert_eq!(path.elements().last(), Some(&PathElement::Close));
        assert_eq!(line_count(&path), 2);
    }

    #[test]
    fn ribbon_has_twice_as_many_vertices_as_input() {
        for n in 1..=10 {
            let points: Vec<Point<f64>> = (0..n)
                .map(|i| Point {
                    x: i as f64,
                    y: (i * i) as f64,
                })
                .collect();
            let path = track_ribbon(&points);
            assert_eq!(line_count(&path), 2 * n);
            assert_eq!(path.elements().last(), Some(&PathElement::Close));
        }
    }

    #[test]
    fn ribbon_traverses_forward_then_reverse() {
        let points = [
            Point { x: 0.0, y: 0.0 },
            Point { x: 1.0, y: 0.0 },
            Point { x: 2.0, y: 1.0 },
        ];
        let path = track_ribbon(&points);

        let vertices: Vec<Point<f64>> = path
            .elements()
            .iter()
            .filter_map(|e| match e {
                PathElement::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        let mut expected: Vec<Point<f64>> = points.to_vec();
        expected.extend(points.iter().rev());
        assert_eq!(vertices, expected);
    }

    #[test]
    fn circle_starts_at_angle_zero() {
        let center = Point { x: 10.0, y: 20.0 };
        let path = circle(center, 5.0);
        let polylines = path.flatten();

        assert_eq!(polylines.len(), 1);
        let polyline = &polylines[0];
        assert!(polyline.closed);

        // First sampled vertex is at angle 0, i.e. (center.x + radius, center.y).
        let first = polyline.points[0];
        assert!((first.x - 15.0).abs() < 1e-9);
        assert!((first.y - 20.0).abs() < 1e-9);

        // All vertices are on the circle.
        for p in &polyline.points {
            let d = super::super::pixel_distance(*p, center);
            assert!((d - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn callout_has_four_arcs_and_a_tab() {
        let path = callout(
            Point { x: 0.0, y: 0.0 },
            Size {
                width: 100.0,
                height: 60.0,
            },
            10.0,
            5.0,
        );

        let arcs = path
            .elements()
            .iter()
            .filter(|e| matches!(e, PathElement::Arc { .. }))
            .count();
        assert_eq!(arcs, 4);

        // The tab tip is at the bottom center.
        let tip = Point { x: 50.0, y: 60.0 };
        assert!(path
            .elements()
            .iter()
            .any(|e| matches!(e, PathElement::LineTo(p) if *p == tip)));
        assert_eq!(path.elements().last(), Some(&PathElement::Close));
    }

    #[test]
    fn rounded_rect_flattens_within_bounds() {
        let path = rounded_rect(
            Point { x: 10.0, y: 10.0 },
            Size {
                width: 40.0,
                height: 20.0,
            },
            4.0,
        );
        for polyline in path.flatten() {
            for p in polyline.points {
                assert!(p.x >= 10.0 - 1e-9 && p.x <= 50.0 + 1e-9);
                assert!(p.y >= 10.0 - 1e-9 && p.y <= 30.0 + 1e-9);
            }
        }
    }

    #[test]
    fn flatten_splits_sub_paths_on_move_to() {
        let mut path = Path::new();
        path.move_to(Point { x: 0.0, y: 0.0 });
        path.line_to(Point { x: 1.0, y: 0.0 });
        path.move_to(Point { x: 5.0, y: 5.0 });
        path.line_to(Point { x: 6.0, y: 5.0 });

        let polylines = path.flatten();
        assert_eq!(polylines.len(), 2);
        assert!(!polylines[0].closed);
        assert!(!polylines[1].closed);
    }
}
