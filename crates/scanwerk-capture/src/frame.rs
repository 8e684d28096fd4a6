// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The result of a capture, ready for upload or display.

use chrono::{DateTime, Utc};
use image::RgbaImage;
use scanwerk_core::CaptureId;
use scanwerk_core::error::Result;

/// A captured page.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub id: CaptureId,
    pub captured_at: DateTime<Utc>,
    pub image: RgbaImage,
    /// `false` when the raw frame was kept (no quad held, or rectification
    /// failed).
    pub rectified: bool,
}

impl CapturedFrame {
    pub fn new(image: RgbaImage, rectified: bool) -> Self {
        Self {
            id: CaptureId::new(),
            captured_at: Utc::now(),
            image,
            rectified,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        scanwerk_vision::encode_jpeg(&self.image, quality)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        scanwerk_vision::encode_png(&self.image)
    }

    /// Default file name, e.g. `scan-20260101-120000-<id>.jpg`.
    pub fn file_stem(&self) -> String {
        format!("scan-{}-{}", self.captured_at.format("%Y%m%d-%H%M%S"), self.id)
    }
}
