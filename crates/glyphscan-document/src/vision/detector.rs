// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral candidate detection backed by `imageproc`.
//
// For each colour plane the scan is binarised several ways (Canny edges plus
// a ladder of intensity thresholds), contours are traced and simplified, and
// every convex, roughly right-angled four-vertex polygon is reported.

use glyphscan_core::error::{GlyphscanError, Result};
use glyphscan_core::{Point, Square};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::map::map_colors;
use imageproc::morphology::dilate;
use tracing::{debug, instrument};

use super::QuadDetector;

/// Contour-based square finder.
#[derive(Debug, Clone, Copy)]
pub struct ImageprocDetector {
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Number of binarisation passes per plane; pass 0 is Canny.
    pub threshold_levels: u8,
    /// Polygon simplification tolerance as a fraction of the perimeter.
    pub epsilon_ratio: f64,
    /// Minimum polygon area in square pixels.
    pub min_area: f64,
    /// Maximum |cos| of any corner.
    pub max_cosine: f64,
}

impl Default for ImageprocDetector {
    fn default() -> Self {
        Self {
            canny_low: 5.0,
            canny_high: 50.0,
            threshold_levels: 5,
            epsilon_ratio: 0.02,
            min_area: 1000.0,
            max_cosine: 0.3,
        }
    }
}

impl ImageprocDetector {
    /// Binary image for one pass over a plane.
    fn binarise(&self, plane: &GrayImage, level: u8) -> GrayImage {
        if level == 0 {
            // Dilation closes small gaps between edge segments.
            dilate(&canny(plane, self.canny_low, self.canny_high), Norm::LInf, 1)
        } else {
            let cutoff = ((level as u32 + 1) * 255 / self.threshold_levels as u32) as u8;
            map_colors(plane, |p| Luma([if p[0] >= cutoff { 255u8 } else { 0u8 }]))
        }
    }

    /// Four-vertex, convex, near-rectangular contours of a binary image.
    fn squares_in(&self, binary: &GrayImage, out: &mut Vec<Square>) {
        for contour in find_contours::<i32>(binary) {
            if contour.points.len() < 4 {
                continue;
            }
            let perimeter = arc_length(&contour.points, true);
            let approx = approximate_polygon_dp(&contour.points, perimeter * self.epsilon_ratio, true);
            let points: Vec<Point> = approx.iter().map(|p| Point::new(p.x, p.y)).collect();

            let Some(square) = Square::from_polygon(&points) else {
                continue;
            };
            if square.area() > self.min_area
                && square.is_convex()
                && square.max_corner_cosine() < self.max_cosine
            {
                out.push(square);
            }
        }
    }
}

impl QuadDetector for ImageprocDetector {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Square>> {
        if self.threshold_levels == 0 {
            return Err(GlyphscanError::Detection(
                "at least one binarisation level is required".into(),
            ));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(GlyphscanError::Detection(format!(
                "scan is {}x{} pixels",
                image.width(),
                image.height()
            )));
        }
        let rgb = image.to_rgb8();
        let mut squares = Vec::new();

        for channel in 0..3 {
            let plane = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                Luma([rgb.get_pixel(x, y)[channel]])
            });
            for level in 0..self.threshold_levels {
                let binary = self.binarise(&plane, level);
                self.squares_in(&binary, &mut squares);
            }
        }

        debug!(candidates = squares.len(), "Quadrilateral candidates detected");
        Ok(squares)
    }
}
