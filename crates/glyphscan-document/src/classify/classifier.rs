// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Row classifier — picks one symbol label and one size label per grid row by
// matching a sample window below the row against the template library.
//
// A whole row shares one classification: the form prints one pictogram per
// row, so cells are not matched individually.

use std::sync::Arc;

use glyphscan_core::config::SampleWindow;
use glyphscan_core::error::{GlyphscanError, Result};
use glyphscan_core::{Classification, CropRect, Grid, Row};
use image::GrayImage;
use tracing::{debug, instrument};

use super::templates::{Template, TemplateLibrary};
use crate::vision::TemplateMatcher;

/// A row with the labels chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub row: Row,
    pub classification: Classification,
}

/// Matches row samples against a shared, read-only template library.
pub struct Classifier<M> {
    library: Arc<TemplateLibrary>,
    matcher: M,
    window: SampleWindow,
}

impl<M: TemplateMatcher> Classifier<M> {
    pub fn new(library: Arc<TemplateLibrary>, matcher: M, window: SampleWindow) -> Self {
        Self {
            library,
            matcher,
            window,
        }
    }

    /// Window below the row's first anchor, clamped to the image.
    ///
    /// Returns `None` for an empty row or when the window falls outside the
    /// image.
    pub fn sample_rect(&self, image: &GrayImage, row: &Row) -> Option<CropRect> {
        let anchor = row.squares().first()?.anchor();
        let x = anchor.x.saturating_add(self.window.offset_x).max(0) as u32;
        let y = anchor.y.saturating_add(self.window.offset_y).max(0) as u32;
        if x >= image.width() || y >= image.height() {
            return None;
        }
        let rect = CropRect {
            x,
            y,
            width: self.window.width,
            height: self.window.height,
        }
        .clamped(image.width(), image.height());
        (!rect.is_empty()).then_some(rect)
    }

    /// Best symbol and best size for one region.
    pub fn classify_region(&self, region: &GrayImage) -> Result<Classification> {
        let symbol = best_label(self.library.symbols(), "symbol", |template| {
            self.matcher.score(region, template)
        })?;
        let size = best_label(self.library.sizes(), "size", |template| {
            self.matcher.score(region, template)
        })?;
        Ok(Classification { symbol, size })
    }

    /// Classify a row from its sample window.
    pub fn classify_row(&self, image: &GrayImage, row: &Row) -> Result<Classification> {
        let rect = self.sample_rect(image, row).ok_or_else(|| {
            GlyphscanError::SampleOutsideImage(format!(
                "row at y={:?} in a {}x{} image",
                row.representative_y(),
                image.width(),
                image.height()
            ))
        })?;
        let region = image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height)
            .to_image();
        let classification = self.classify_region(&region)?;
        debug!(
            y = ?row.representative_y(),
            symbol = %classification.symbol,
            size = %classification.size,
            "Row classified"
        );
        Ok(classification)
    }

    /// Classify every row of a grid, top to bottom.
    #[instrument(skip_all, fields(rows = grid.rows().len()))]
    pub fn classify_grid(&self, image: &GrayImage, grid: Grid) -> Result<Vec<ClassifiedRow>> {
        grid.into_rows()
            .into_iter()
            .map(|row| {
                let classification = self.classify_row(image, &row)?;
                Ok(ClassifiedRow {
                    row,
                    classification,
                })
            })
            .collect()
    }
}

/// Arg-max over `templates`. Only a strictly greater score replaces the
/// current best, so the first template wins exact ties.
fn best_label<L: Copy>(
    templates: &[Template<L>],
    set: &'static str,
    mut score: impl FnMut(&GrayImage) -> Result<f32>,
) -> Result<L> {
    let mut best: Option<(L, f32)> = None;
    for template in templates {
        let s = score(template.image())?;
        match best {
            Some((_, best_score)) if s <= best_score || s.is_nan() => {}
            _ => best = Some((template.label(), s)),
        }
    }
    best.map(|(label, _)| label)
        .ok_or(GlyphscanError::EmptyTemplateSet(set))
}
