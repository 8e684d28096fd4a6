// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Still-image camera. Serves one fixed frame, for desktop runs, the CLI, and
// tests.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use scanwerk_core::PackedFrame;
use scanwerk_core::error::{Result, ScanError};
use tracing::{debug, info};

use crate::traits::{CameraProvider, FrameSource};

/// A camera that always shows the same picture.
#[derive(Debug, Clone)]
pub struct StillImageCamera {
    name: String,
    frame: RgbaImage,
}

impl StillImageCamera {
    pub fn new(frame: RgbaImage) -> Self {
        Self {
            name: "still image".into(),
            frame,
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8())
    }

    /// Load the frame from an image file (any format the `image` crate reads).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|err| {
            ScanError::ImageError(format!("failed to open {}: {}", path.display(), err))
        })?;
        info!(path = %path.display(), width = image.width(), height = image.height(), "still image loaded");
        Ok(Self {
            name: path.display().to_string(),
            frame: image.to_rgba8(),
        })
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }
}

impl CameraProvider for StillImageCamera {
    type Stream = StillStream;

    fn name(&self) -> &str {
        &self.name
    }

    async fn acquire(&self) -> Result<StillStream> {
        if self.frame.width() == 0 || self.frame.height() == 0 {
            return Err(ScanError::CameraUnavailable(format!(
                "{} has no pixels",
                self.name
            )));
        }
        debug!(camera = %self.name, "still stream opened");
        let (width, height) = self.frame.dimensions();
        Ok(StillStream {
            frame: PackedFrame::new(width, height, 4, self.frame.as_raw().clone()),
            live: true,
        })
    }
}

/// Stream over a still frame, served as packed RGBA.
#[derive(Debug)]
pub struct StillStream {
    frame: PackedFrame,
    live: bool,
}

impl FrameSource for StillStream {
    fn sample(&mut self) -> Result<PackedFrame> {
        if !self.live {
            return Err(ScanError::FrameSample("stream stopped".into()));
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[tokio::test]
    async fn stream_serves_the_frame_until_stopped() {
        let camera = StillImageCamera::new(RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255])));
        let mut stream = camera.acquire().await.unwrap();
        assert!(stream.is_live());
        let frame = stream.sample().unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(frame.channels, 4);
        assert_eq!(frame.bytes.len(), 4 * 3 * 4);
        assert_eq!(frame.bytes[frame.bytes.len() - 4..], [1, 2, 3, 255]);

        stream.stop();
        assert!(!stream.is_live());
        assert!(matches!(stream.sample(), Err(ScanError::FrameSample(_))));
    }

    #[tokio::test]
    async fn empty_frame_cannot_be_acquired() {
        let camera = StillImageCamera::new(RgbaImage::new(0, 0));
        assert!(matches!(
            camera.acquire().await,
            Err(ScanError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn from_path_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        RgbaImage::from_pixel(7, 5, Rgba([9, 9, 9, 255]))
            .save(&path)
            .unwrap();

        let camera = StillImageCamera::from_path(&path).unwrap();
        assert_eq!(camera.frame().dimensions(), (7, 5));
        assert!(camera.name().ends_with("page.png"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = StillImageCamera::from_path("/nonexistent/page.png").unwrap_err();
        assert!(matches!(err, ScanError::ImageError(_)));
    }
}
