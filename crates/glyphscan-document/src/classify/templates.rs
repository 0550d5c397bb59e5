// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template library — the fixed reference images the classifier matches rows
// against. Loaded once, never mutated.

use std::path::{Path, PathBuf};

use glyphscan_core::error::{GlyphscanError, Result};
use glyphscan_core::{SizeLabel, SymbolLabel};
use image::GrayImage;
use tracing::{debug, info, instrument};

/// A labelled reference image.
#[derive(Debug, Clone)]
pub struct Template<L> {
    label: L,
    image: GrayImage,
}

impl<L: Copy> Template<L> {
    pub fn new(label: L, image: GrayImage) -> Self {
        Self { label, image }
    }

    pub fn label(&self) -> L {
        self.label
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }
}

/// Symbol and size reference images.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    symbols: Vec<Template<SymbolLabel>>,
    sizes: Vec<Template<SizeLabel>>,
}

impl TemplateLibrary {
    /// Load `{label}.png` for every symbol and size label from `dir`.
    ///
    /// Any missing or unreadable file fails the whole load.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let symbols = SymbolLabel::ALL
            .iter()
            .map(|label| load_template(dir, *label, label.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let sizes = SizeLabel::ALL
            .iter()
            .map(|label| load_template(dir, *label, label.as_str()))
            .collect::<Result<Vec<_>>>()?;

        info!(
            symbols = symbols.len(),
            sizes = sizes.len(),
            "Template library loaded"
        );
        Ok(Self { symbols, sizes })
    }

    /// Build a library from already-decoded templates.
    pub fn from_templates(
        symbols: Vec<Template<SymbolLabel>>,
        sizes: Vec<Template<SizeLabel>>,
    ) -> Self {
        Self { symbols, sizes }
    }

    pub fn symbols(&self) -> &[Template<SymbolLabel>] {
        &self.symbols
    }

    pub fn sizes(&self) -> &[Template<SizeLabel>] {
        &self.sizes
    }

    /// Path at which [`TemplateLibrary::load`] expects a label's image.
    pub fn template_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.png"))
    }
}

fn load_template<L: Copy>(dir: &Path, label: L, name: &str) -> Result<Template<L>> {
    let path = TemplateLibrary::template_path(dir, name);
    let image = image::open(&path).map_err(|err| GlyphscanError::TemplateLoad {
        label: name.to_string(),
        path: path.clone(),
        reason: err.to_string(),
    })?;
    debug!(
        template = name,
        width = image.width(),
        height = image.height(),
        "Template loaded"
    );
    Ok(Template::new(label, image.to_luma8()))
}
