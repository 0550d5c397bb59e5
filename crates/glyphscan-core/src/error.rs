// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Glyphscan.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Glyphscan operations.
#[derive(Debug, Error)]
pub enum GlyphscanError {
    // -- Input errors --
    #[error("scan path {path} does not match `w<NNN>-scans/<page>.<ext>`")]
    InvalidSourcePath { path: PathBuf },

    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    #[error("failed to write image {path}: {reason}")]
    ImageWrite { path: PathBuf, reason: String },

    // -- Template library --
    #[error("failed to load template `{label}` from {path}: {reason}")]
    TemplateLoad {
        label: String,
        path: PathBuf,
        reason: String,
    },

    #[error("template set `{0}` is empty")]
    EmptyTemplateSet(&'static str),

    // -- Layout / classification --
    #[error("no grid cells detected in {0}")]
    NoCellsDetected(String),

    #[error("candidate detection failed: {0}")]
    Detection(String),

    #[error("sample window lies outside the scan: {0}")]
    SampleOutsideImage(String),

    #[error("template matching failed: {0}")]
    Matching(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How a batch run reacts to an error raised while processing one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Drop the current image and continue with the next one.
    SkipImage,
    /// Stop the whole run.
    AbortRun,
}

impl GlyphscanError {
    /// Decide whether this error only affects the current image.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::ImageLoad { .. }
            | Self::NoCellsDetected(_)
            | Self::Detection(_)
            | Self::SampleOutsideImage(_) => Disposition::SkipImage,

            Self::InvalidSourcePath { .. }
            | Self::ImageWrite { .. }
            | Self::TemplateLoad { .. }
            | Self::EmptyTemplateSet(_)
            | Self::Matching(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_) => Disposition::AbortRun,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GlyphscanError>;
