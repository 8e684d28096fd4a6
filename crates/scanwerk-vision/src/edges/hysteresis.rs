// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hysteresis thresholding: strong edges seed an 8-connected flood that
// promotes weak edges touching them.

use image::GrayImage;

use crate::raster::ScalarField;

/// Edge mask value for promoted pixels.
pub const EDGE: u8 = 255;

/// Threshold a suppressed gradient field into a binary edge mask.
///
/// Thresholds are relative to the strongest suppressed value `M`: pixels
/// `>= high_ratio * M` are strong, and pixels `>= low_ratio * M` become edges
/// when 8-connected to a strong pixel. The flood uses an explicit stack and a
/// visited bitmap indexed by pixel offset.
pub fn link(suppressed: &ScalarField, high_ratio: f32, low_ratio: f32) -> GrayImage {
    let (width, height) = suppressed.dimensions();
    let mut mask = GrayImage::new(width, height);

    let max = suppressed.max_value();
    if max <= 0.0 {
        return mask;
    }
    let high = high_ratio * max;
    let low = low_ratio * max;

    let w = width as usize;
    let h = height as usize;
    let values = suppressed.as_slice();
    let out: &mut [u8] = &mut mask;
    let mut visited = vec![false; values.len()];
    let mut stack: Vec<usize> = Vec::new();

    for seed in 0..values.len() {
        if visited[seed] || values[seed] < high {
            continue;
        }
        visited[seed] = true;
        out[seed] = EDGE;
        stack.push(seed);

        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % w, idx / w);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let n = ny * w + nx;
                    if visited[n] {
                        continue;
                    }
                    let v = values[n];
                    if v > 0.0 && v >= low {
                        visited[n] = true;
                        out[n] = EDGE;
                        stack.push(n);
                    }
                }
            }
        }
    }

    mask
}
