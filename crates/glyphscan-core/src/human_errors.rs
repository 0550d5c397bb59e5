// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing error messages.
//
// Every error is mapped to a short plain-English summary with a concrete next
// step, printed by the CLI next to the technical message.

use crate::error::{Disposition, GlyphscanError};

/// A readable error with a suggested fix.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Whether the batch carries on after this error.
    pub disposition: Disposition,
}

/// Convert a `GlyphscanError` into a `HumanError`.
pub fn humanize_error(err: &GlyphscanError) -> HumanError {
    let (message, suggestion) = match err {
        GlyphscanError::InvalidSourcePath { path } => (
            format!("{} is not inside a scripter scan folder.", path.display()),
            "Scans must live in a folder named like `w042-scans`; the file name is the page number.".to_string(),
        ),
        GlyphscanError::ImageLoad { path, .. } => (
            format!("{} could not be opened as an image.", path.display()),
            "Check that the file exists and is a PNG, JPEG or TIFF scan. It has been skipped.".to_string(),
        ),
        GlyphscanError::ImageWrite { path, .. } => (
            format!("Could not write {}.", path.display()),
            "Check that the output folder exists and is writable.".to_string(),
        ),
        GlyphscanError::TemplateLoad { label, path, .. } => (
            format!("The `{label}` template is missing or unreadable."),
            format!("Place a readable `{label}.png` at {}.", path.display()),
        ),
        GlyphscanError::EmptyTemplateSet(set) => (
            format!("No {set} templates are available."),
            "Point --templates at the directory containing all reference images.".to_string(),
        ),
        GlyphscanError::NoCellsDetected(form) => (
            format!("No grid cells were found on {form}."),
            "The scan may be rotated, blurred or cropped; it has been skipped.".to_string(),
        ),
        GlyphscanError::Detection(_) => (
            "Cell detection failed on this scan.".to_string(),
            "Try rescanning the page at a higher resolution. It has been skipped.".to_string(),
        ),
        GlyphscanError::SampleOutsideImage(_) => (
            "A row's sample area falls outside the scan.".to_string(),
            "The scan may be cropped or the sample window offset too large. It has been skipped.".to_string(),
        ),
        GlyphscanError::Matching(_) => (
            "Template matching failed.".to_string(),
            "Check that the template images are valid grayscale or colour images.".to_string(),
        ),
        GlyphscanError::Config(detail) => (
            format!("The configuration is invalid: {detail}."),
            "Fix the config file or run with --print-config to see the defaults.".to_string(),
        ),
        GlyphscanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => (
                "A file or folder was not found.".to_string(),
                "Check the paths passed on the command line.".to_string(),
            ),
            std::io::ErrorKind::PermissionDenied => (
                "Permission denied.".to_string(),
                "Check that you can read the scans and write to the output folder.".to_string(),
            ),
            _ => (
                "A file operation failed.".to_string(),
                "Check free disk space and try again.".to_string(),
            ),
        },
        GlyphscanError::Serialization(_) => (
            "The configuration file is not valid JSON.".to_string(),
            "Run with --print-config to get a valid starting point.".to_string(),
        ),
    };

    HumanError {
        message,
        suggestion,
        disposition: err.disposition(),
    }
}
