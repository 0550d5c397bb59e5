// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debug overlay: the detected grid drawn over the scan.

use glyphscan_core::Grid;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

const OUTLINE: Rgb<u8> = Rgb([0, 200, 0]);
/// Squares anchored this close to the origin are the page border.
const BORDER_MARGIN: i32 = 3;

/// Copy of `image` with every cell of `grid` outlined.
pub fn draw_overlay(image: &DynamicImage, grid: &Grid) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for square in grid.squares() {
        let anchor = square.anchor();
        if anchor.x <= BORDER_MARGIN || anchor.y <= BORDER_MARGIN {
            continue;
        }
        for i in 0..4 {
            let a = square.vertex(i);
            let b = square.vertex(i + 1);
            // Three parallel strokes for a visible outline on large scans.
            for offset in -1..=1 {
                let o = offset as f32;
                draw_line_segment_mut(
                    &mut canvas,
                    (a.x as f32 + o, a.y as f32 + o),
                    (b.x as f32 + o, b.y as f32 + o),
                    OUTLINE,
                );
            }
        }
    }
    canvas
}
