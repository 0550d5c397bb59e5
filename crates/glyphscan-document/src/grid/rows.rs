// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Row grouper — splits the reading-ordered squares into horizontal bands.

use glyphscan_core::config::RowConfig;
use glyphscan_core::{Grid, Row, Square};
use tracing::{debug, instrument};

use super::order::sort_reading_order;

/// Partition squares into rows.
///
/// The input is re-sorted into reading order (a no-op for deduplicator
/// output), then walked once: a new row starts whenever consecutive anchors
/// are more than `row_tolerance` apart vertically. Each row is finally ordered
/// by anchor x. An empty input gives an empty grid.
#[instrument(skip_all, fields(squares = squares.len(), row_tolerance = config.row_tolerance))]
pub fn group_rows(mut squares: Vec<Square>, sort_tolerance: i32, config: &RowConfig) -> Grid {
    sort_reading_order(&mut squares, sort_tolerance);

    let mut rows: Vec<Row> = Vec::new();
    let mut current = Row::default();
    let mut previous_y: Option<i32> = None;

    for square in squares {
        let y = square.anchor().y;
        if let Some(prev) = previous_y {
            if (y - prev).abs() > config.row_tolerance {
                rows.push(std::mem::take(&mut current));
            }
        }
        current.push(square);
        previous_y = Some(y);
    }
    if !current.is_empty() {
        rows.push(current);
    }

    for row in &mut rows {
        row.sort_by_column();
    }

    debug!(
        rows = rows.len(),
        cells = rows.iter().map(Row::len).sum::<usize>(),
        "Rows grouped"
    );
    Grid::new(rows)
}
