// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Non-maximum suppression: thin gradient ridges to single-pixel width.

use super::gradient::Gradient;
use crate::raster::ScalarField;

/// Gradient direction quantised to one of four neighbour axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Gradient along x: compare left/right neighbours.
    Horizontal,
    /// Gradient along (1, 1) in image coordinates.
    Diagonal,
    /// Gradient along y: compare up/down neighbours.
    Vertical,
    /// Gradient along (-1, 1) in image coordinates.
    AntiDiagonal,
}

impl Direction {
    /// Quantise an angle in radians, taken modulo 180 degrees.
    pub fn from_angle(radians: f32) -> Self {
        let deg = radians.to_degrees().rem_euclid(180.0);
        if !(22.5..157.5).contains(&deg) {
            Self::Horizontal
        } else if deg < 67.5 {
            Self::Diagonal
        } else if deg < 112.5 {
            Self::Vertical
        } else {
            Self::AntiDiagonal
        }
    }

    /// Offset of the "forward" neighbour; the backward one is its negation.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Horizontal => (1, 0),
            Self::Diagonal => (1, 1),
            Self::Vertical => (0, 1),
            Self::AntiDiagonal => (-1, 1),
        }
    }
}

/// Keep a pixel's magnitude only where it is a local maximum along its
/// gradient direction.
///
/// A kept pixel is `>=` its forward neighbour and strictly `>` its backward
/// neighbour, so a ridge that straddles two pixels with equal magnitude keeps
/// exactly one of them.
pub fn suppress(gradient: &Gradient) -> ScalarField {
    let (width, height) = gradient.dimensions();
    let mut out = ScalarField::new(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    let mag = &gradient.magnitude;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let m = mag.get(x, y);
            if m <= 0.0 {
                continue;
            }
            let (dx, dy) = Direction::from_angle(gradient.angle.get(x, y)).offset();
            let forward = mag.get(x.wrapping_add_signed(dx), y.wrapping_add_signed(dy));
            let backward = mag.get(x.wrapping_add_signed(-dx), y.wrapping_add_signed(-dy));
            if m >= forward && m > backward {
                out.set(x, y, m);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::gradient::sobel;
    use crate::edges::smooth::smooth;
    use image::{GrayImage, Luma};
    use std::f32::consts::PI;

    #[test]
    fn angle_bins() {
        assert_eq!(Direction::from_angle(0.0), Direction::Horizontal);
        assert_eq!(Direction::from_angle(PI), Direction::Horizontal);
        assert_eq!(Direction::from_angle(-PI), Direction::Horizontal);
        assert_eq!(Direction::from_angle(PI / 4.0), Direction::Diagonal);
        assert_eq!(Direction::from_angle(PI / 2.0), Direction::Vertical);
        assert_eq!(Direction::from_angle(-PI / 2.0), Direction::Vertical);
        assert_eq!(Direction::from_angle(3.0 * PI / 4.0), Direction::AntiDiagonal);
        assert_eq!(Direction::from_angle(-PI / 4.0), Direction::AntiDiagonal);
        assert_eq!(Direction::from_angle(170f32.to_radians()), Direction::Horizontal);
    }

    #[test]
    fn clean_vertical_edge_is_one_pixel_wide() {
        let gray = GrayImage::from_fn(24, 16, |x, _| Luma([if x < 12 { 0 } else { 255 }]));
        let thin = suppress(&sobel(&smooth(&gray)));

        // Rows whose 3x3 neighbourhood lies entirely in the smoothed interior.
        for y in 3..16 - 3 {
            let kept: Vec<u32> = (0..24).filter(|&x| thin.get(x, y) > 0.0).collect();
            assert_eq!(kept.len(), 1, "row {y} kept {kept:?}");
            assert!(kept[0] == 11 || kept[0] == 12);
        }
    }

    #[test]
    fn clean_horizontal_edge_is_one_pixel_wide() {
        let gray = GrayImage::from_fn(16, 24, |_, y| Luma([if y < 12 { 255 } else { 0 }]));
        let thin = suppress(&sobel(&smooth(&gray)));
        for x in 3..16 - 3 {
            let kept = (0..24).filter(|&y| thin.get(x, y) > 0.0).count();
            assert_eq!(kept, 1, "column {x}");
        }
    }

    #[test]
    fn flat_raster_suppresses_everything() {
        let gray = GrayImage::from_pixel(10, 10, Luma([40]));
        let thin = suppress(&sobel(&gray));
        assert_eq!(thin.max_value(), 0.0);
    }
}
