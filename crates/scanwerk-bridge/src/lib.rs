// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-bridge — Camera abstractions for the Scanwerk frame loop.
//
// Defines the camera traits the session drives, the scoped guard that stops
// the hardware stream on every exit path, and the cameras available without
// native SDKs: a still-image camera for desktop/CI runs and a stub platform
// camera.

pub mod guard;
pub mod still;
pub mod stub;
pub mod traits;

pub use guard::CameraGuard;
pub use still::{StillImageCamera, StillStream};
pub use stub::StubCamera;
pub use traits::{CameraProvider, FrameSource};

/// Returns the camera implementation for the target platform.
///
/// Native camera bridges are not built into this crate, so every target gets
/// the stub, which refuses acquisition with `PlatformUnavailable`.
pub fn platform_camera() -> StubCamera {
    StubCamera
}
