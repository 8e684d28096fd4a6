// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub camera for builds where no native camera API is available.
//
// Acquisition always returns `PlatformUnavailable`, so a session built on it
// stays Idle.

use scanwerk_core::PackedFrame;
use scanwerk_core::error::{Result, ScanError};

use crate::traits::{CameraProvider, FrameSource};

/// No-op camera returned on platforms without a native bridge.
pub struct StubCamera;

/// The stub never yields a stream.
pub enum NoStream {}

impl CameraProvider for StubCamera {
    type Stream = NoStream;

    fn name(&self) -> &str {
        "stub camera"
    }

    async fn acquire(&self) -> Result<NoStream> {
        tracing::warn!("CameraProvider::acquire called on stub camera");
        Err(ScanError::PlatformUnavailable)
    }
}

impl FrameSource for NoStream {
    fn sample(&mut self) -> Result<PackedFrame> {
        match *self {}
    }

    fn stop(&mut self) {
        match *self {}
    }

    fn is_live(&self) -> bool {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_acquisition_is_unavailable() {
        let err = StubCamera.acquire().await.err();
        assert!(matches!(err, Some(ScanError::PlatformUnavailable)));
    }

    #[test]
    fn platform_camera_falls_back_to_stub() {
        assert_eq!(crate::platform_camera().name(), "stub camera");
    }
}
