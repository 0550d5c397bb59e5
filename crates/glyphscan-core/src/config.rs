// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration: tolerance windows and acceptance bands for every
// layout stage, plus the named presets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GlyphscanError, Result};

/// How the candidate size metric combines the per-axis vertex deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeMetric {
    /// `sqrt(|(dx ^ 2) - (dy ^ 2)|)` where `^` is integer exclusive-or. The
    /// default band was calibrated against this formula.
    LiteralXor,
    /// `sqrt(dx * dx + dy * dy)`, the side length. Needs its own band.
    Euclidean,
}

/// Open interval `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBand {
    pub low: f64,
    pub high: f64,
}

impl SizeBand {
    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value < self.high
    }
}

/// CandidateFilter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub metric: SizeMetric,
    pub band: SizeBand,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            metric: SizeMetric::LiteralXor,
            band: SizeBand {
                low: 15.5,
                high: 17.0,
            },
        }
    }
}

/// Canonicalizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalConfig {
    /// Maximum |dy| (exclusive) for a vertex to compete for the anchor slot.
    pub anchor_tolerance: i32,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            anchor_tolerance: 20,
        }
    }
}

/// Deduplicator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Reading-order comparator tolerance, shared with the row grouper.
    pub sort_tolerance: i32,
    /// Anchors closer than this horizontally (and vertically, below) overlap.
    pub overlap_dx: i32,
    pub overlap_dy: i32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            sort_tolerance: 50,
            overlap_dx: 160,
            overlap_dy: 320,
        }
    }
}

/// RowGrouper settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowConfig {
    /// Consecutive anchors further apart than this vertically start a new row.
    pub row_tolerance: i32,
}

impl Default for RowConfig {
    fn default() -> Self {
        Self { row_tolerance: 150 }
    }
}

/// Region below a row's anchor handed to the template matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleWindow {
    /// Offset from the first square's anchor.
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            width: 200,
            height: 200,
        }
    }
}

/// Threshold sets shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Most tolerant thresholds (default).
    Current,
    /// Tighter anchor tolerance and wider row band of the first release.
    Legacy,
}

/// Settings for a full layout + classification run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub canonical: CanonicalConfig,
    pub dedup: DedupConfig,
    pub rows: RowConfig,
    pub sample: SampleWindow,
}

impl PipelineConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Current => Self::default(),
            Preset::Legacy => Self {
                canonical: CanonicalConfig {
                    anchor_tolerance: 5,
                },
                rows: RowConfig { row_tolerance: 160 },
                ..Self::default()
            },
        }
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings that would make a stage drop or merge everything.
    pub fn validate(&self) -> Result<()> {
        let band = self.filter.band;
        if !(band.low.is_finite() && band.high.is_finite()) || band.low >= band.high {
            return Err(GlyphscanError::Config(format!(
                "size band ({}, {}) is empty",
                band.low, band.high
            )));
        }
        if self.canonical.anchor_tolerance < 0
            || self.dedup.sort_tolerance < 0
            || self.rows.row_tolerance < 0
        {
            return Err(GlyphscanError::Config(
                "tolerances must be non-negative".into(),
            ));
        }
        if self.dedup.overlap_dx <= 0 || self.dedup.overlap_dy <= 0 {
            return Err(GlyphscanError::Config(
                "overlap windows must be positive".into(),
            ));
        }
        if self.sample.width == 0 || self.sample.height == 0 {
            return Err(GlyphscanError::Config(
                "sample window must have a non-zero size".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_current_preset() {
        let config = PipelineConfig::default();
        assert_eq!(config, PipelineConfig::preset(Preset::Current));
        assert_eq!(config.filter.metric, SizeMetric::LiteralXor);
        assert_eq!(config.rows.row_tolerance, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn legacy_preset_differs_in_anchor_and_row_tolerance() {
        let legacy = PipelineConfig::preset(Preset::Legacy);
        assert_eq!(legacy.canonical.anchor_tolerance, 5);
        assert_eq!(legacy.rows.row_tolerance, 160);
        assert_eq!(legacy.dedup, DedupConfig::default());
    }

    #[test]
    fn band_is_open_interval() {
        let band = FilterConfig::default().band;
        assert!(band.contains(16.0));
        assert!(!band.contains(15.5));
        assert!(!band.contains(17.0));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "rows": { "row_tolerance": 120 } }"#).unwrap();
        assert_eq!(config.rows.row_tolerance, 120);
        assert_eq!(config.dedup, DedupConfig::default());
    }

    #[test]
    fn metric_uses_kebab_case() {
        let json = serde_json::to_string(&SizeMetric::LiteralXor).unwrap();
        assert_eq!(json, r#""literal-xor""#);
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut config = PipelineConfig::default();
        config.filter.band = SizeBand {
            low: 17.0,
            high: 15.5,
        };
        assert!(matches!(config.validate(), Err(GlyphscanError::Config(_))));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphscan.json");
        let config = PipelineConfig::preset(Preset::Legacy);
        config.save(&path).unwrap();
        assert_eq!(PipelineConfig::load(&path).unwrap(), config);
    }
}
