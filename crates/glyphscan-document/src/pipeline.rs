// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form pipeline — runs detection, layout, classification and recording over
// one scan at a time, and over a batch of scans.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glyphscan_core::config::{FilterConfig, SizeMetric};
use glyphscan_core::error::{GlyphscanError, Result};
use glyphscan_core::{CellRecord, Disposition, FormId, Grid, PipelineConfig, Square};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::classify::{Classifier, TemplateLibrary};
use crate::grid::build_grid;
use crate::image::ImageProcessor;
use crate::record::OutputRecorder;
use crate::vision::{draw_overlay, QuadDetector, TemplateMatcher};

/// An image the batch gave up on, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Images processed to completion.
    pub processed: usize,
    pub skipped: Vec<SkippedImage>,
    pub cells: Vec<CellRecord>,
}

/// One configured detector, classifier and recorder.
pub struct FormPipeline<D, M> {
    config: PipelineConfig,
    detector: D,
    classifier: Classifier<M>,
    recorder: OutputRecorder,
    overlay: bool,
}

impl<D: QuadDetector, M: TemplateMatcher> FormPipeline<D, M> {
    pub fn new(
        config: PipelineConfig,
        detector: D,
        matcher: M,
        library: Arc<TemplateLibrary>,
        recorder: OutputRecorder,
    ) -> Self {
        if config.filter.metric == SizeMetric::Euclidean
            && config.filter.band == FilterConfig::default().band
        {
            warn!(
                band = ?config.filter.band,
                "Euclidean size metric with the band tuned for literal-xor; most cells will be filtered out"
            );
        }
        Self {
            config,
            detector,
            classifier: Classifier::new(library, matcher, config.sample),
            recorder,
            overlay: false,
        }
    }

    /// Also write `{scripter}{page}_overlay.png` for every processed scan.
    pub fn with_overlay(mut self, enabled: bool) -> Self {
        self.overlay = enabled;
        self
    }

    /// Filter, canonicalize, deduplicate and group raw candidates.
    pub fn layout(&self, candidates: Vec<Square>) -> Grid {
        build_grid(candidates, &self.config)
    }

    /// Process one scan end to end.
    #[instrument(skip_all, fields(form = %form))]
    pub fn process(&self, path: &Path, form: &FormId) -> Result<Vec<CellRecord>> {
        let scan = ImageProcessor::open(path)?;
        let candidates = self.detector.detect(scan.as_dynamic())?;
        let grid = self.layout(candidates);
        if grid.is_empty() {
            return Err(GlyphscanError::NoCellsDetected(form.to_string()));
        }

        let overlay = self
            .overlay
            .then(|| draw_overlay(scan.as_dynamic(), &grid));

        let rows = self.classifier.classify_grid(&scan.to_luma(), grid)?;
        let records = self.recorder.record(&scan, form, &rows)?;

        if let Some(overlay) = overlay {
            self.recorder.write_overlay(overlay, form)?;
        }
        Ok(records)
    }

    /// Process every scan in order.
    ///
    /// All paths are parsed before the first image is opened, so a malformed
    /// path aborts the run without writing anything. Per-image errors whose
    /// disposition is [`Disposition::SkipImage`] are collected in the report;
    /// any other error aborts the run.
    #[instrument(skip_all, fields(images = paths.len()))]
    pub fn run_batch(&self, paths: &[PathBuf]) -> Result<BatchReport> {
        let forms = paths
            .iter()
            .map(|path| FormId::from_path(path))
            .collect::<Result<Vec<_>>>()?;

        let mut report = BatchReport::default();
        for (path, form) in paths.iter().zip(&forms) {
            match self.process(path, form) {
                Ok(cells) => {
                    report.processed += 1;
                    report.cells.extend(cells);
                }
                Err(err) if err.disposition() == Disposition::SkipImage => {
                    warn!(path = %path.display(), error = %err, "Skipping image");
                    report.skipped.push(SkippedImage {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            processed = report.processed,
            skipped = report.skipped.len(),
            cells = report.cells.len(),
            "Batch complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Template;
    use glyphscan_core::{Point, SizeLabel, SymbolLabel};
    use image::{GrayImage, Luma};

    /// Returns the same candidates for every scan.
    struct FixedDetector(Vec<Square>);

    impl QuadDetector for FixedDetector {
        fn detect(&self, _image: &image::DynamicImage) -> Result<Vec<Square>> {
            Ok(self.0.clone())
        }
    }

    /// Brighter templates score higher.
    struct BrightestMatcher;

    impl TemplateMatcher for BrightestMatcher {
        fn score(&self, _region: &GrayImage, template: &GrayImage) -> Result<f32> {
            Ok(template.get_pixel(0, 0)[0] as f32)
        }
    }

    fn library() -> Arc<TemplateLibrary> {
        let symbols = SymbolLabel::ALL
            .iter()
            .map(|label| {
                let value = if *label == SymbolLabel::Police { 200 } else { 10 };
                Template::new(*label, GrayImage::from_pixel(4, 4, Luma([value])))
            })
            .collect();
        let sizes = SizeLabel::ALL
            .iter()
            .map(|label| {
                let value = if *label == SizeLabel::Large { 200 } else { 10 };
                Template::new(*label, GrayImage::from_pixel(4, 4, Luma([value])))
            })
            .collect();
        Arc::new(TemplateLibrary::from_templates(symbols, sizes))
    }

    /// 256 px cell; the first edge is horizontal so it passes the size band.
    fn cell(x: i32, y: i32) -> Square {
        Square::new([
            Point::new(x, y),
            Point::new(x + 256, y),
            Point::new(x + 256, y + 256),
            Point::new(x, y + 256),
        ])
    }

    fn two_by_two() -> Vec<Square> {
        vec![cell(400, 400), cell(50, 50), cell(400, 50), cell(50, 400)]
    }

    fn write_scan(root: &Path, scripter: &str, page: &str) -> PathBuf {
        let dir = root.join(format!("w{scripter}-scans"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{page}.png"));
        GrayImage::from_pixel(700, 700, Luma([230u8]))
            .save(&path)
            .unwrap();
        path
    }

    fn pipeline(
        out: &Path,
        candidates: Vec<Square>,
    ) -> FormPipeline<FixedDetector, BrightestMatcher> {
        FormPipeline::new(
            PipelineConfig::default(),
            FixedDetector(candidates),
            BrightestMatcher,
            library(),
            OutputRecorder::new(out).unwrap(),
        )
    }

    #[test]
    fn process_records_every_cell() {
        let dir = tempfile::tempdir().unwrap();
        let scan = write_scan(dir.path(), "042", "00217");
        let form = FormId::from_path(&scan).unwrap();
        let out = dir.path().join("out");

        let cells = pipeline(&out, two_by_two()).process(&scan, &form).unwrap();
        assert_eq!(cells.len(), 4);
        let positions: Vec<(usize, usize)> = cells.iter().map(|c| (c.row, c.column)).collect();
        assert_eq!(positions, [(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert!(cells.iter().all(|c| c.symbol == SymbolLabel::Police));
        assert!(cells.iter().all(|c| c.size == SizeLabel::Large));
        assert!(out.join("police_042_00217_2_1.png").exists());
        assert!(out.join("police_042_00217_2_1.txt").exists());
    }

    #[test]
    fn overlay_is_written_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let scan = write_scan(dir.path(), "042", "00217");
        let form = FormId::from_path(&scan).unwrap();
        let out = dir.path().join("out");

        pipeline(&out, two_by_two())
            .with_overlay(true)
            .process(&scan, &form)
            .unwrap();
        assert!(out.join("04200217_overlay.png").exists());
    }

    #[test]
    fn empty_grid_is_no_cells_detected() {
        let dir = tempfile::tempdir().unwrap();
        let scan = write_scan(dir.path(), "042", "00217");
        let form = FormId::from_path(&scan).unwrap();

        let err = pipeline(&dir.path().join("out"), Vec::new())
            .process(&scan, &form)
            .unwrap_err();
        assert!(matches!(err, GlyphscanError::NoCellsDetected(_)));
        assert_eq!(err.disposition(), Disposition::SkipImage);
    }

    #[test]
    fn batch_skips_scans_whose_rows_lie_off_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let scan = write_scan(dir.path(), "042", "00217");

        let report = pipeline(&dir.path().join("out"), vec![cell(800, 50)])
            .run_batch(&[scan.clone()])
            .unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, scan);
        assert!(report.skipped[0].reason.contains("outside the scan"));
    }

    #[test]
    fn batch_skips_unreadable_images() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_scan(dir.path(), "042", "00217");
        let missing = dir.path().join("w042-scans").join("00218.png");

        let report = pipeline(&dir.path().join("out"), two_by_two())
            .run_batch(&[missing.clone(), good])
            .unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.cells.len(), 4);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, missing);
    }

    #[test]
    fn malformed_path_aborts_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_scan(dir.path(), "042", "00217");
        let bad = dir.path().join("scans").join("00001.png");
        let out = dir.path().join("out");

        let err = pipeline(&out, two_by_two())
            .run_batch(&[good, bad])
            .unwrap_err();
        assert!(matches!(err, GlyphscanError::InvalidSourcePath { .. }));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
