// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sobel gradient: per-pixel edge strength and direction.

use image::GrayImage;

use super::smooth::RADIUS;
use crate::raster::ScalarField;

/// Gradient magnitude and angle (radians, `atan2(gy, gx)`), zero on the
/// border band that smoothing leaves untouched.
#[derive(Debug, Clone)]
pub struct Gradient {
    pub magnitude: ScalarField,
    pub angle: ScalarField,
}

impl Gradient {
    pub fn dimensions(&self) -> (u32, u32) {
        self.magnitude.dimensions()
    }
}

/// Convolve the 3x3 Sobel kernels over every pixel at least `RADIUS` pixels
/// in from the edge. The unsmoothed border band stays zero.
pub fn sobel(gray: &GrayImage) -> Gradient {
    let (width, height) = gray.dimensions();
    let mut magnitude = ScalarField::new(width, height);
    let mut angle = ScalarField::new(width, height);
    let border = RADIUS as usize;

    if width as usize > 2 * border && height as usize > 2 * border {
        let w = width as usize;
        let src = gray.as_raw();
        let at = |x: usize, y: usize| f32::from(src[y * w + x]);

        for y in border..height as usize - border {
            for x in border..w - border {
                let (tl, tc, tr) = (at(x - 1, y - 1), at(x, y - 1), at(x + 1, y - 1));
                let (ml, mr) = (at(x - 1, y), at(x + 1, y));
                let (bl, bc, br) = (at(x - 1, y + 1), at(x, y + 1), at(x + 1, y + 1));

                let gx = (tr + 2.0 * mr + br) - (tl + 2.0 * ml + bl);
                let gy = (bl + 2.0 * bc + br) - (tl + 2.0 * tc + tr);

                magnitude.set(x as u32, y as u32, gx.hypot(gy));
                angle.set(x as u32, y as u32, gy.atan2(gx));
            }
        }
    }

    Gradient { magnitude, angle }
}
