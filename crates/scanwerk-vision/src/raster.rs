// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster types. Color and intensity rasters are the `image` crate's flat
// buffers; gradient stages work on a flat `f32` field with the same layout.

use image::{GrayImage, RgbaImage};
use scanwerk_core::PackedFrame;
use scanwerk_core::error::{Result, ScanError};

/// Floating-point per-pixel field (gradient magnitude, angle, suppressed
/// magnitude). Sample `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl ScalarField {
    /// A zero-filled field.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Largest sample, or 0 for an empty field.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}

/// Build a color raster from a packed camera frame. RGB frames get an opaque
/// alpha channel; anything but 3 or 4 channels, an empty frame, or a buffer
/// whose length does not match the dimensions is `InvalidRaster`.
pub fn from_packed(frame: PackedFrame) -> Result<RgbaImage> {
    let PackedFrame {
        width,
        height,
        channels,
        bytes,
    } = frame;
    if width == 0 || height == 0 {
        return Err(ScanError::InvalidRaster(format!(
            "empty raster {}x{}",
            width, height
        )));
    }
    let pixels = width as usize * height as usize;
    let expected = pixels * channels as usize;
    match channels {
        3 | 4 if bytes.len() == expected => {}
        3 | 4 => {
            return Err(ScanError::InvalidRaster(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                bytes.len()
            )));
        }
        other => {
            return Err(ScanError::InvalidRaster(format!(
                "unsupported channel count {}",
                other
            )));
        }
    }

    let rgba = if channels == 4 {
        bytes
    } else {
        let mut out = Vec::with_capacity(pixels * 4);
        for px in bytes.chunks_exact(3) {
            out.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        out
    };

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| ScanError::InvalidRaster("buffer does not match dimensions".into()))
}

/// Number of non-zero samples in an edge mask.
pub fn count_edge_pixels(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_buffer_gets_opaque_alpha() {
        let img = from_packed(PackedFrame::new(2, 1, 3, vec![10, 20, 30, 40, 50, 60])).unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [40, 50, 60, 255]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = from_packed(PackedFrame::new(2, 2, 4, vec![0; 15])).unwrap_err();
        assert!(matches!(err, ScanError::InvalidRaster(_)));
    }

    #[test]
    fn two_channel_buffer_is_rejected() {
        assert!(from_packed(PackedFrame::new(1, 1, 2, vec![0, 0])).is_err());
    }

    #[test]
    fn zero_sized_raster_is_rejected() {
        assert!(from_packed(PackedFrame::new(0, 4, 4, Vec::new())).is_err());
    }

    #[test]
    fn scalar_field_indexing_is_row_major() {
        let mut field = ScalarField::new(3, 2);
        field.set(2, 1, 7.5);
        assert_eq!(field.as_slice()[5], 7.5);
        assert_eq!(field.max_value(), 7.5);
    }

    #[test]
    fn rgba_buffer_is_taken_as_is() {
        let bytes: Vec<u8> = (0..24).collect();
        let img = from_packed(PackedFrame::new(3, 2, 4, bytes.clone())).unwrap();
        assert_eq!(img.as_raw(), &bytes);
        assert_eq!(img.get_pixel(2, 1).0, [20, 21, 22, 23]);
    }
}
