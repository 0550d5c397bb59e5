// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid layout — turns raw quadrilateral candidates into ordered rows of cells:
// size filter, canonical vertex order, reading-order dedup, row grouping.

pub mod canonical;
pub mod dedup;
pub mod filter;
pub mod order;
pub mod rows;

use glyphscan_core::{Grid, PipelineConfig, Square};
use tracing::{info, instrument};

pub use canonical::{canonicalize, canonicalize_all};
pub use dedup::deduplicate;
pub use filter::filter_candidates;
pub use rows::group_rows;

/// Run every layout stage on one image's candidates.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub fn build_grid(candidates: Vec<Square>, config: &PipelineConfig) -> Grid {
    let accepted = filter_candidates(candidates, &config.filter);
    let canonical = canonicalize_all(accepted, &config.canonical);
    let unique = deduplicate(canonical, &config.dedup);
    let grid = group_rows(unique, config.dedup.sort_tolerance, &config.rows);
    info!(
        rows = grid.rows().len(),
        cells = grid.cell_count(),
        "Grid layout complete"
    );
    grid
}
