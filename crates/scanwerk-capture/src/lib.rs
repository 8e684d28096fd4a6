// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-capture — The scan session frame loop.
//
// A `ScanSession` acquires a camera once, runs throttled detection passes
// (at most one in flight), publishes the detected quad to observers, and on
// capture rectifies the page and releases the camera.

pub mod driver;
pub mod frame;
pub mod scheduler;
pub mod session;

pub use driver::run_frame_loop;
pub use frame::CapturedFrame;
pub use scheduler::{FrameScheduler, TickDecision};
pub use session::{PassStart, PendingPass, ScanSession, SessionState, SkipReason, TickOutcome};
