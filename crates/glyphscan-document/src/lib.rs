// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// glyphscan-document — Scan processing for Glyphscan.
//
// Detects the cell grid on a scanned form (quadrilateral detection, size
// filtering, canonical vertex order, dedup, row grouping), classifies each
// row against a template library, and writes one cropped image plus a
// metadata file per cell.

pub mod classify;
pub mod grid;
pub mod image;
pub mod pipeline;
pub mod record;
pub mod vision;

// Re-export the primary structs so callers can use `glyphscan_document::FormPipeline` etc.
pub use classify::{ClassifiedRow, Classifier, TemplateLibrary};
pub use grid::build_grid;
pub use crate::image::processor::ImageProcessor;
pub use pipeline::{BatchReport, FormPipeline, SkippedImage};
pub use record::OutputRecorder;
pub use vision::{ImageprocDetector, ImageprocMatcher, QuadDetector, TemplateMatcher};
