// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image-analysis seams.
//
// Candidate detection and template scoring are delegated to a vision backend.
// The traits keep the layout and classification stages independent of the
// backend; the default implementations compose `imageproc` routines.

pub mod detector;
pub mod matcher;
pub mod overlay;

use glyphscan_core::error::Result;
use glyphscan_core::Square;
use image::{DynamicImage, GrayImage};

pub use detector::ImageprocDetector;
pub use matcher::ImageprocMatcher;
pub use overlay::draw_overlay;

/// Produces raw four-vertex candidates from a scan.
pub trait QuadDetector {
    /// Return every quadrilateral found, in any order, duplicates included.
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Square>>;
}

/// Scores how well an image region matches a reference template.
pub trait TemplateMatcher {
    /// Higher is a better match. Scores are only compared with each other.
    fn score(&self, region: &GrayImage, template: &GrayImage) -> Result<f32>;
}

impl<T: QuadDetector + ?Sized> QuadDetector for &T {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Square>> {
        (**self).detect(image)
    }
}

impl<T: TemplateMatcher + ?Sized> TemplateMatcher for &T {
    fn score(&self, region: &GrayImage, template: &GrayImage) -> Result<f32> {
        (**self).score(region, template)
    }
}
