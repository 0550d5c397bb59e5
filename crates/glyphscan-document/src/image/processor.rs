// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — scan loading, cell cropping and PNG output. Operates on
// in-memory images using the `image` crate.

use std::path::Path;

use glyphscan_core::error::{GlyphscanError, Result};
use glyphscan_core::CropRect;
use image::{DynamicImage, GrayImage};
use tracing::{debug, info, instrument};

/// A single decoded scan or crop.
///
/// ```ignore
/// let scan = ImageProcessor::open("w042-scans/00217.png")?;
/// scan.crop(rect).save("out/fire_042_00217_1_1.png")?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| GlyphscanError::ImageLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// 8-bit grayscale copy, as used for template matching.
    pub fn to_luma(&self) -> GrayImage {
        self.image.to_luma8()
    }

    // -- Cropping -------------------------------------------------------------

    /// Copy out a rectangular region. The rectangle is clamped to the image.
    pub fn crop(&self, rect: CropRect) -> Self {
        let safe = rect.clamped(self.image.width(), self.image.height());
        debug!(
            x = safe.x,
            y = safe.y,
            width = safe.width,
            height = safe.height,
            "Cropping image"
        );
        Self {
            image: self.image.crop_imm(safe.x, safe.y, safe.width, safe.height),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .map_err(|err| GlyphscanError::ImageWrite {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
    }
}
