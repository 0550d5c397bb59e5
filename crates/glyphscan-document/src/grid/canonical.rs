// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonicalizer — rotates each square's vertex ring so its anchor vertex comes
// first, making "first vertex" comparisons independent of where the detector
// started tracing.

use glyphscan_core::config::CanonicalConfig;
use glyphscan_core::Square;
use tracing::{debug, instrument};

/// Index of the anchor vertex.
///
/// Vertices are scanned in order. A vertex replaces the current best when it
/// lies further left and its y is within `tolerance` (exclusive) of the
/// best's y. The first index reaching the minimum wins.
pub fn anchor_index(square: &Square, tolerance: i32) -> usize {
    let mut index = 0;
    let mut best = square.vertex(0);
    for (i, vertex) in square.vertices().iter().enumerate().skip(1) {
        if vertex.x < best.x && (vertex.y - best.y).abs() < tolerance {
            best = *vertex;
            index = i;
        }
    }
    index
}

/// Rotate `square` so that its anchor is vertex 0.
pub fn canonicalize(square: &Square, config: &CanonicalConfig) -> Square {
    square.rotated_left(anchor_index(square, config.anchor_tolerance))
}

#[instrument(skip_all, fields(squares = squares.len()))]
pub fn canonicalize_all(squares: Vec<Square>, config: &CanonicalConfig) -> Vec<Square> {
    let mut rotated = 0usize;
    let out: Vec<Square> = squares
        .into_iter()
        .map(|sq| {
            let canonical = canonicalize(&sq, config);
            if canonical != sq {
                rotated += 1;
            }
            canonical
        })
        .collect();
    debug!(rotated, "Squares canonicalized");
    out
}
