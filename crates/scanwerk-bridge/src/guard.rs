// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped camera ownership: the stream is stopped when the guard is released
// or dropped, whichever comes first.

use scanwerk_core::PackedFrame;
use scanwerk_core::error::{Result, ScanError};
use tracing::debug;

use crate::traits::FrameSource;

/// Owns an acquired stream and stops it exactly once.
pub struct CameraGuard<S: FrameSource> {
    source: S,
    released: bool,
}

impl<S: FrameSource> CameraGuard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            released: false,
        }
    }

    /// Sample a frame. Fails with `CameraUnavailable` once released.
    pub fn sample(&mut self) -> Result<PackedFrame> {
        if self.released {
            return Err(ScanError::CameraUnavailable("camera already released".into()));
        }
        self.source.sample()
    }

    /// Stop the stream. Later calls are no-ops.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.source.stop();
            debug!("camera stream stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        !self.released && self.source.is_live()
    }
}

impl<S: FrameSource> Drop for CameraGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}
