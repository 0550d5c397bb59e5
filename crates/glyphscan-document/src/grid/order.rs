// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading-order comparison of squares by anchor, with a tolerance window on
// both axes.

use glyphscan_core::Square;

/// True when `a` reads before `b`: clearly higher on the page, or on the same
/// line (|dy| <= tolerance) and clearly further left.
pub fn reads_before(a: &Square, b: &Square, tolerance: i32) -> bool {
    let pa = a.anchor();
    let pb = b.anchor();
    if pa.y < pb.y - tolerance {
        return true;
    }
    if pa.y > pb.y + tolerance {
        return false;
    }
    pa.x < pb.x - tolerance
}

/// Stable sort into reading order.
///
/// `reads_before` is not transitive, which `slice::sort_by` requires (and may
/// panic without), so this is an insertion sort driven only by the predicate.
/// After it returns no adjacent pair is out of order, so sorting again is a
/// no-op.
pub fn sort_reading_order(squares: &mut [Square], tolerance: i32) {
    for i in 1..squares.len() {
        let mut j = i;
        while j > 0 && reads_before(&squares[j], &squares[j - 1], tolerance) {
            squares.swap(j, j - 1);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphscan_core::Point;

    fn at(x: i32, y: i32) -> Square {
        Square::new([
            Point::new(x, y),
            Point::new(x + 250, y),
            Point::new(x + 250, y + 250),
            Point::new(x, y + 250),
        ])
    }

    fn anchors(squares: &[Square]) -> Vec<(i32, i32)> {
        squares.iter().map(|sq| (sq.anchor().x, sq.anchor().y)).collect()
    }

    #[test]
    fn rows_before_columns() {
        let mut squares = vec![at(400, 410), at(100, 95), at(700, 102), at(90, 400), at(400, 100)];
        sort_reading_order(&mut squares, 50);
        assert_eq!(
            anchors(&squares),
            vec![(100, 95), (400, 100), (700, 102), (90, 400), (400, 410)]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let mut squares = vec![at(110, 102), at(100, 100), at(130, 90)];
        sort_reading_order(&mut squares, 50);
        assert_eq!(anchors(&squares), vec![(110, 102), (100, 100), (130, 90)]);
    }

    #[test]
    fn sorting_twice_changes_nothing() {
        let mut squares = vec![
            at(700, 140),
            at(100, 60),
            at(400, 100),
            at(100, 420),
            at(380, 380),
            at(690, 440),
        ];
        sort_reading_order(&mut squares, 50);
        let once = squares.clone();
        sort_reading_order(&mut squares, 50);
        assert_eq!(squares, once);
    }

    #[test]
    fn predicate_is_asymmetric() {
        let a = at(100, 100);
        let b = at(400, 120);
        assert!(reads_before(&a, &b, 50));
        assert!(!reads_before(&b, &a, 50));
        assert!(!reads_before(&a, &a, 50));
    }
}
