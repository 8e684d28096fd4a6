// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoding of captured pages for hand-off to upload/display.

use image::buffer::ConvertBuffer;
use image::{ImageFormat, RgbImage, RgbaImage};
use scanwerk_core::error::{Result, ScanError};
use tracing::debug;

/// Encode as JPEG with the given quality (1-100). Alpha is dropped.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ScanError::Encoding(format!(
            "JPEG quality must be in 1..=100, got {}",
            quality
        )));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(ScanError::Encoding("cannot encode an empty image".into()));
    }
    let mut buffer = Vec::new();
    let rgb: RgbImage = image.convert();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| ScanError::Encoding(format!("JPEG encoding failed: {}", err)))?;
    debug!(bytes = buffer.len(), quality, "JPEG encoded");
    Ok(buffer)
}

/// Encode as PNG, keeping alpha.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| ScanError::Encoding(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn jpeg_has_soi_marker() {
        let img = RgbaImage::from_pixel(16, 8, Rgba([200, 10, 10, 255]));
        let bytes = encode_jpeg(&img, 85).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn jpeg_decodes_to_same_size() {
        let img = RgbaImage::from_pixel(33, 21, Rgba([90, 90, 90, 255]));
        let bytes = encode_jpeg(&img, 90).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (33, 21));
    }

    #[test]
    fn bad_quality_is_an_encoding_error() {
        let img = RgbaImage::new(4, 4);
        assert!(matches!(encode_jpeg(&img, 0), Err(ScanError::Encoding(_))));
        assert!(matches!(encode_jpeg(&img, 101), Err(ScanError::Encoding(_))));
    }

    #[test]
    fn empty_image_is_an_encoding_error() {
        assert!(matches!(
            encode_jpeg(&RgbaImage::new(0, 0), 90),
            Err(ScanError::Encoding(_))
        ));
    }

    #[test]
    fn png_has_signature() {
        let bytes = encode_png(&RgbaImage::new(3, 3)).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
