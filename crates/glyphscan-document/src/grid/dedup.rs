// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deduplicator — collapses repeated detections of the same physical cell.

use glyphscan_core::config::DedupConfig;
use glyphscan_core::Square;
use tracing::{debug, instrument, trace};

use super::order::sort_reading_order;

/// True when the anchors of `a` and `b` fall inside the overlap window.
pub fn overlaps(a: &Square, b: &Square, config: &DedupConfig) -> bool {
    let pa = a.anchor();
    let pb = b.anchor();
    (pb.x - pa.x).abs() < config.overlap_dx && (pb.y - pa.y).abs() < config.overlap_dy
}

/// Sort into reading order, then keep each square only if it does not overlap
/// the most recently kept one.
///
/// Only the last kept square is compared: two overlapping squares separated in
/// sort order by a non-overlapping one both survive.
#[instrument(skip_all, fields(squares = squares.len()))]
pub fn deduplicate(mut squares: Vec<Square>, config: &DedupConfig) -> Vec<Square> {
    sort_reading_order(&mut squares, config.sort_tolerance);

    let total = squares.len();
    let mut kept: Vec<Square> = Vec::with_capacity(total);
    for square in squares {
        match kept.last() {
            Some(last) if overlaps(last, &square, config) => {
                trace!(anchor = %square.anchor(), kept = %last.anchor(), "Dropping duplicate");
            }
            _ => kept.push(square),
        }
    }

    debug!(total, kept = kept.len(), "Duplicates collapsed");
    kept
}
