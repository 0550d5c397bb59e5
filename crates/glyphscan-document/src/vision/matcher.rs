// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template scoring backed by `imageproc::template_matching`.

use glyphscan_core::error::{GlyphscanError, Result};
use image::imageops::{self, FilterType};
use image::GrayImage;
use imageproc::template_matching::{match_template, MatchTemplateMethod};

use super::TemplateMatcher;

/// Normalised cross-correlation between a region and a template.
///
/// The region is resized to the template's dimensions first, so the
/// correlation map is a single value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocMatcher;

impl TemplateMatcher for ImageprocMatcher {
    fn score(&self, region: &GrayImage, template: &GrayImage) -> Result<f32> {
        let (tw, th) = template.dimensions();
        if tw == 0 || th == 0 {
            return Err(GlyphscanError::Matching("template image is empty".into()));
        }
        if region.width() == 0 || region.height() == 0 {
            return Err(GlyphscanError::Matching("sample region is empty".into()));
        }

        let resized = if region.dimensions() == (tw, th) {
            region.clone()
        } else {
            imageops::resize(region, tw, th, FilterType::Triangle)
        };

        let map = match_template(&resized, template, MatchTemplateMethod::CrossCorrelationNormalized);
        Ok(map.get_pixel(0, 0)[0])
    }
}
