// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Luminance reduction of a color raster.

use image::{GrayImage, RgbaImage};

/// Rec. 601 luma, rounded to the nearest integer. Alpha is ignored.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGBA raster to a single-channel intensity raster of the same
/// size.
pub fn to_intensity(color: &RgbaImage) -> GrayImage {
    let (width, height) = color.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (dst, src) in gray.pixels_mut().zip(color.pixels()) {
        let [r, g, b, _] = src.0;
        dst.0[0] = luminance(r, g, b);
    }
    gray
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn output_has_one_sample_per_pixel() {
        let color = RgbaImage::new(17, 9);
        let gray = to_intensity(&color);
        assert_eq!(gray.dimensions(), (17, 9));
        assert_eq!(gray.as_raw().len(), 17 * 9);
    }

    #[test]
    fn primaries_use_luma_weights() {
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 29);
        assert_eq!(luminance(255, 255, 255), 255);
    }

    #[test]
    fn alpha_is_ignored() {
        let color = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 0]));
        assert!(to_intensity(&color).pixels().all(|p| p.0[0] == 100));
    }
}
