// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate filter — drops quadrilaterals whose size metric lies outside the
// acceptance band.

use glyphscan_core::config::{FilterConfig, SizeMetric};
use glyphscan_core::Square;
use tracing::{debug, instrument};

/// Size metric of a candidate, computed from the first two vertices.
pub fn size_metric(square: &Square, metric: SizeMetric) -> f64 {
    let p1 = square.vertex(0);
    let p2 = square.vertex(1);
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    match metric {
        SizeMetric::LiteralXor => {
            // Exclusive-or with 2, not squaring. The shipped band is tuned to it.
            let ex = (dx ^ 2) as i64;
            let ey = (dy ^ 2) as i64;
            ((ex - ey).abs() as f64).sqrt()
        }
        SizeMetric::Euclidean => (dx as f64).hypot(dy as f64),
    }
}

/// Keep the candidates whose metric lies strictly inside the configured band.
#[instrument(skip_all, fields(candidates = candidates.len(), metric = ?config.metric))]
pub fn filter_candidates(candidates: Vec<Square>, config: &FilterConfig) -> Vec<Square> {
    let total = candidates.len();
    let accepted: Vec<Square> = candidates
        .into_iter()
        .filter(|sq| config.band.contains(size_metric(sq, config.metric)))
        .collect();
    debug!(total, accepted = accepted.len(), "Candidates filtered by size");
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphscan_core::config::SizeBand;
    use glyphscan_core::Point;

    /// Square whose first edge runs from the origin to `(dx, dy)`.
    fn edge(dx: i32, dy: i32) -> Square {
        Square::new([
            Point::new(0, 0),
            Point::new(dx, dy),
            Point::new(dx - dy, dy + dx),
            Point::new(-dy, dx),
        ])
    }

    #[test]
    fn literal_metric_uses_exclusive_or() {
        // 256 ^ 2 = 258 and 0 ^ 2 = 2.
        assert_eq!(size_metric(&edge(256, 0), SizeMetric::LiteralXor), 16.0);
        // 255 ^ 2 = 253 and 3 ^ 2 = 1, so sqrt(252) rather than sqrt(255² - 9).
        let m = size_metric(&edge(255, 3), SizeMetric::LiteralXor);
        assert!((m - 252f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn literal_metric_is_direction_independent_for_axis_edges() {
        let right = size_metric(&edge(256, 0), SizeMetric::LiteralXor);
        assert_eq!(size_metric(&edge(-256, 0), SizeMetric::LiteralXor), right);
        assert_eq!(size_metric(&edge(0, 256), SizeMetric::LiteralXor), right);
    }

    #[test]
    fn euclidean_metric_is_edge_length() {
        assert!((size_metric(&edge(30, 40), SizeMetric::Euclidean) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn default_band_keeps_form_sized_cells() {
        let config = FilterConfig::default();
        let kept = filter_candidates(
            vec![edge(256, 0), edge(100, 0), edge(300, 0), edge(255, 3)],
            &config,
        );
        assert_eq!(kept, vec![edge(256, 0), edge(255, 3)]);
    }

    #[test]
    fn euclidean_metric_needs_its_own_band() {
        let mut config = FilterConfig {
            metric: SizeMetric::Euclidean,
            ..FilterConfig::default()
        };
        assert!(filter_candidates(vec![edge(256, 0)], &config).is_empty());

        config.band = SizeBand {
            low: 200.0,
            high: 300.0,
        };
        assert_eq!(filter_candidates(vec![edge(256, 0)], &config).len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_candidates(Vec::new(), &FilterConfig::default()).is_empty());
    }
}
