// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic camera traits.
//
// A `CameraProvider` is acquired once per scan session and yields a
// `FrameSource` that the frame loop samples until it is stopped.

use std::future::Future;

use scanwerk_core::PackedFrame;
use scanwerk_core::error::Result;

/// Something that can open a camera stream.
pub trait CameraProvider {
    /// The live stream handed out by a successful acquisition.
    type Stream: FrameSource;

    /// Human-readable camera name for logs (e.g. "rear camera", "still image").
    fn name(&self) -> &str;

    /// Open the stream. This is the only suspending operation in a session;
    /// it fails with `CameraUnavailable` or `PermissionDenied`.
    fn acquire(&self) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// A live stream of frames.
pub trait FrameSource {
    /// Copy the current frame out of the stream as a packed RGB or RGBA
    /// buffer.
    fn sample(&mut self) -> Result<PackedFrame>;

    /// Stop the underlying hardware stream. Must be safe to call repeatedly.
    fn stop(&mut self);

    /// Whether the stream is still delivering frames.
    fn is_live(&self) -> bool;
}
