// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
///
/// A missed detection is not an error: the detector reports "not found" as
/// `None`. Only conditions the caller has to act on live here.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Camera acquisition --
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("camera permission denied")]
    PermissionDenied,

    #[error("frame sampling failed: {0}")]
    FrameSample(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Pipeline --
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    #[error("rectification failed: {0}")]
    Rectification(String),

    #[error("image encoding failed: {0}")]
    Encoding(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Session --
    #[error("operation `{operation}` not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Whether the error ends the scan session.
    ///
    /// Acquisition and encoding failures are terminal. A rectification failure
    /// is recovered by falling back to the raw frame, and a bad sample only
    /// costs one tick.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::CameraUnavailable(_)
            | Self::PermissionDenied
            | Self::PlatformUnavailable
            | Self::Encoding(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_) => true,
            Self::FrameSample(_)
            | Self::InvalidRaster(_)
            | Self::Rectification(_)
            | Self::ImageError(_)
            | Self::InvalidState { .. } => false,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
