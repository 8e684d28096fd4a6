// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 5x5 Gaussian noise smoothing ahead of gradient computation.

use image::GrayImage;

/// Kernel radius; the outermost `RADIUS` rows and columns are never rewritten.
pub const RADIUS: u32 = 2;

const SIZE: usize = 2 * RADIUS as usize + 1;

/// Normalised weights `exp(-(dx² + dy²) / 2)` for offsets in `-2..=2`.
fn gaussian_kernel() -> [[f32; SIZE]; SIZE] {
    let mut kernel = [[0.0f32; SIZE]; SIZE];
    let mut sum = 0.0f32;
    for (ky, row) in kernel.iter_mut().enumerate() {
        for (kx, w) in row.iter_mut().enumerate() {
            let dx = kx as f32 - RADIUS as f32;
            let dy = ky as f32 - RADIUS as f32;
            *w = (-(dx * dx + dy * dy) / 2.0).exp();
            sum += *w;
        }
    }
    for w in kernel.iter_mut().flatten() {
        *w /= sum;
    }
    kernel
}

/// Blur interior pixels with a 5x5 Gaussian. Border pixels keep their input
/// value; rasters too small to have an interior come back unchanged.
pub fn smooth(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = gray.clone();
    if width < SIZE as u32 || height < SIZE as u32 {
        return out;
    }

    let kernel = gaussian_kernel();
    let w = width as usize;
    let src = gray.as_raw();
    let r = RADIUS as usize;

    for y in r..height as usize - r {
        for x in r..w - r {
            let mut acc = 0.0f32;
            for (ky, row) in kernel.iter().enumerate() {
                let base = (y + ky - r) * w + x - r;
                for (kx, weight) in row.iter().enumerate() {
                    acc += weight * f32::from(src[base + kx]);
                }
            }
            out[(x as u32, y as u32)].0[0] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
