//! Module providing a software drawing surface: a CPU rasterizer over an
//! RGBA image, plus the dirty flag used as the surface handle.

use super::{Blend, Color, DrawTarget, Surface};
use crate::geometry::path::{Path, Polyline};
use crate::geometry::{Point, Rect};
use anyhow::Context;
use image::{Rgba, RgbaImage};
use std::cell::Cell;

/// Surface handle recording invalidation requests.
#[derive(Debug, Default)]
pub struct DirtyFlag {
    dirty: Cell<bool>,
}

impl DirtyFlag {
    /// Creates a new, clean flag.
    pub fn new() -> Self {
        DirtyFlag {
            dirty: Cell::new(false),
        }
    }

    /// Returns whether a redraw was requested, and resets the flag.
    pub fn take(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl Surface for DirtyFlag {
    fn set_needs_display(&self) {
        self.dirty.set(true);
    }
}

/// A software raster target over an RGBA image.
pub struct Pixmap {
    width: u32,
    height: u32,
    image: RgbaImage,
    blend: Blend,
}

impl Pixmap {
    /// Creates a transparent pixmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Pixmap {
            width,
            height,
            image: RgbaImage::new(width, height),
            blend: Blend::Normal,
        }
    }

    /// Returns the rendered image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Resets the pixmap to fully transparent.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.blend = Blend::Normal;
    }

    /// Returns the fraction of pixels that are fully transparent.
    pub fn transparent_ratio(&self) -> f64 {
        let transparent = self.image.pixels().filter(|p| p.0[3] == 0).count();
        transparent as f64 / (self.width as f64 * self.height as f64)
    }

    /// Saves the image as a PNG file.
    pub fn save_png(&self, path: &str) -> anyhow::Result<()> {
        self.image
            .save(path)
            .with_context(|| format!("Failed to write PNG image to {path}"))
    }

    /// Writes one pixel under the current blend mode.
    fn write_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);

        match self.blend {
            Blend::Clear => {
                self.image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
            Blend::Normal => {
                let Color([sr, sg, sb, sa]) = color;
                let dst = self.image.get_pixel(x, y).0;
                let da = dst[3] as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    self.image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                    return;
                }
                let blend_channel = |s: f32, d: u8| {
                    let d = d as f32 / 255.0;
                    let c = (s * sa + d * da * (1.0 - sa)) / out_a;
                    (c * 255.0).round().clamp(0.0, 255.0) as u8
                };
                self.image.put_pixel(
                    x,
                    y,
                    Rgba([
                        blend_channel(sr, dst[0]),
                        blend_channel(sg, dst[1]),
                        blend_channel(sb, dst[2]),
                        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
                    ]),
                );
            }
        }
    }

    /// Fills every pixel within `radius` of the segment `[a, b]`. The
    /// capsule shape gives stroked segments round caps and joins.
    fn fill_capsule(&mut self, a: Point<f64>, b: Point<f64>, radius: f64, color: Color) {
        let min_x = (a.x.min(b.x) - radius).floor() as i64;
        let max_x = (a.x.max(b.x) + radius).ceil() as i64;
        let min_y = (a.y.min(b.y) - radius).floor() as i64;
        let max_y = (a.y.max(b.y) + radius).ceil() as i64;

        let ab = Point {
            x: b.x - a.x,
            y: b.y - a.y,
        };
        let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point {
                    x: x as f64 + 0.5,
                    y: y as f64 + 0.5,
                };
                let ap = Point {
                    x: p.x - a.x,
                    y: p.y - a.y,
                };
                // Project onto the segment, clamped to its endpoints.
                let t = if ab_len_sq > 0.0 {
                    ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let closest = Point {
                    x: a.x + ab.x * t,
                    y: a.y + ab.y * t,
                };
                let dx = p.x - closest.x;
                let dy = p.y - closest.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.write_pixel(x, y, color);
                }
            }
        }
    }

    /// Iterates over a polyline's segments, including the closing segment
    /// for closed sub-paths.
    fn segments(polyline: &Polyline) -> Vec<(Point<f64>, Point<f64>)> {
        let mut segments: Vec<(Point<f64>, Point<f64>)> = polyline
            .points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        if polyline.closed && polyline.points.len() > 2 {
            segments.push((
                *polyline.points.last().unwrap(),
                *polyline.points.first().unwrap(),
            ));
        }
        segments
    }
}

impl DrawTarget for Pixmap {
    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let min_x = rect.origin.x.floor() as i64;
        let max_x = (rect.origin.x + rect.size.width).ceil() as i64;
        let min_y = rect.origin.y.floor() as i64;
        let max_y = (rect.origin.y + rect.size.height).ceil() as i64;
        for y in min_y..max_y {
            for x in min_x..max_x {
                self.write_pixel(x, y, color);
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f64, color: Color) {
        let radius = (width / 2.0).max(0.5);
        for polyline in path.flatten() {
            if polyline.points.len() == 1 {
                // Degenerate sub-path: a round cap dot.
                self.fill_capsule(polyline.points[0], polyline.points[0], radius, color);
                continue;
            }
            for (a, b) in Self::segments(&polyline) {
                self.fill_capsule(a, b, radius, color);
            }
        }
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let polylines = path.flatten();
        if polylines.is_empty() {
            return;
        }

        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for polyline in &polylines {
            for p in &polyline.points {
                min_y = min_y.min(p.y);
                max_y = max_y.max(p.y);
            }
        }
        if !min_y.is_finite() {
            return;
        }

        // Even-odd scanline fill across all sub-paths.
        for y in (min_y.floor() as i64)..(max_y.ceil() as i64) {
            let scan_y = y as f64 + 0.5;
            let mut crossings = Vec::new();

            for polyline in &polylines {
                for (a, b) in Self::segments(polyline) {
                    if (a.y <= scan_y) != (b.y <= scan_y) {
                        let t = (scan_y - a.y) / (b.y - a.y);
                        crossings.push(a.x + t * (b.x - a.x));
                    }
                }
            }

            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            for pair in crossings.chunks_exact(2) {
                let from = pair[0].round() as i64;
                let to = pair[1].round() as i64;
                for x in from..to {
                    self.write_pixel(x, y, color);
                }
            }
        }
    }
}
