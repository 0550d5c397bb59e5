// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output recorder — writes one cropped PNG and one metadata text file per
// classified grid cell.

use std::fs;
use std::path::PathBuf;

use glyphscan_core::error::Result;
use glyphscan_core::{CellRecord, Classification, FormId};
use image::RgbImage;
use tracing::{info, instrument, warn};

use crate::classify::ClassifiedRow;
use crate::image::ImageProcessor;

/// Writes cell artifacts into a single output directory.
#[derive(Debug, Clone)]
pub struct OutputRecorder {
    output_dir: PathBuf,
}

impl OutputRecorder {
    /// Create the recorder, creating `output_dir` if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// `{symbol}_{scripter}_{page}_{row}_{column}`, indices 1-based.
    pub fn cell_name(
        classification: &Classification,
        form: &FormId,
        row: usize,
        column: usize,
    ) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            classification.symbol, form.scripter, form.page, row, column
        )
    }

    /// Metadata file body for one cell.
    pub fn metadata(
        name: &str,
        classification: &Classification,
        form: &FormId,
        row: usize,
        column: usize,
    ) -> String {
        format!(
            "# glyphscan cell {name}\n\
             label {symbol}\n\
             form {form_code}\n\
             scripter {scripter}\n\
             page {page}\n\
             row {row}\n\
             column {column}\n\
             size {size}\n",
            symbol = classification.symbol,
            form_code = form.form_code(),
            scripter = form.scripter,
            page = form.page,
            size = classification.size,
        )
    }

    /// Crop and describe every cell of `rows`.
    ///
    /// Cells whose crop rectangle is empty after clamping are skipped with a
    /// warning; their indices are not reused.
    #[instrument(skip_all, fields(form = %form, rows = rows.len()))]
    pub fn record(
        &self,
        scan: &ImageProcessor,
        form: &FormId,
        rows: &[ClassifiedRow],
    ) -> Result<Vec<CellRecord>> {
        let mut records = Vec::new();

        for (r, classified) in rows.iter().enumerate() {
            let row = r + 1;
            for (c, square) in classified.row.squares().iter().enumerate() {
                let column = c + 1;
                let rect = square.crop_rect().clamped(scan.width(), scan.height());
                if rect.is_empty() {
                    warn!(row, column, anchor = %square.anchor(), "Empty cell crop, skipping");
                    continue;
                }

                let name = Self::cell_name(&classified.classification, form, row, column);
                let image_path = self.output_dir.join(format!("{name}.png"));
                let metadata_path = self.output_dir.join(format!("{name}.txt"));

                scan.crop(rect).save(&image_path)?;
                fs::write(
                    &metadata_path,
                    Self::metadata(&name, &classified.classification, form, row, column),
                )?;

                records.push(CellRecord {
                    row,
                    column,
                    scripter: form.scripter.clone(),
                    page: form.page.clone(),
                    symbol: classified.classification.symbol,
                    size: classified.classification.size,
                    image_path,
                    metadata_path,
                });
            }
        }

        info!(cells = records.len(), "Cells recorded");
        Ok(records)
    }

    /// Write a debug overlay as `{scripter}{page}_overlay.png`.
    pub fn write_overlay(&self, overlay: RgbImage, form: &FormId) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}_overlay.png", form.form_code()));
        ImageProcessor::from_dynamic(overlay.into()).save(&path)?;
        info!(path = %path.display(), "Overlay written");
        Ok(path)
    }
}
