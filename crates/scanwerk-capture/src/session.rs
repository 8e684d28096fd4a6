// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session: owns the camera for one scan, runs throttled detection passes
// on request, and captures the rectified page.
//
// Lifecycle: Idle -> Active -> Looping <-> Paused -> Closed. Every state can be
// closed; closing releases the camera and is idempotent.

use std::fmt;
use std::time::{Duration, Instant};

use image::RgbaImage;
use scanwerk_bridge::{CameraGuard, CameraProvider};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{DetectorParams, Quad, ScanConfig};
use scanwerk_vision::{detect_document, from_packed, rectify};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::frame::CapturedFrame;
use crate::scheduler::{FrameScheduler, TickDecision};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created; the camera has not been acquired.
    Idle,
    /// Camera acquired, detection not running.
    Active,
    /// Camera acquired, detection passes run on each tick.
    Looping,
    /// Detection disabled after having been enabled; camera still held.
    Paused,
    /// Camera released. Terminal.
    Closed,
}

impl SessionState {
    /// Whether the session currently holds the camera.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::Looping | Self::Paused)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Looping => "looping",
            Self::Paused => "paused",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why a tick did not run a detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The session holds no camera (Idle or Closed).
    Inactive,
    /// Detection is not enabled.
    Cancelled,
    /// The tick interval has not elapsed.
    TooSoon,
    /// A pass is still running.
    Busy,
}

/// Result of one [`ScanSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A pass ran and published this quad (`None`: no document in view).
    Processed(Option<Quad>),
    Skipped(SkipReason),
}

/// Start of a detection pass, from [`ScanSession::begin_pass`].
#[derive(Debug)]
pub enum PassStart {
    Ready(PendingPass),
    Skipped(SkipReason),
}

/// A sampled frame waiting for detection. Owns its inputs, so it can run on
/// another thread while the session keeps ticking.
#[derive(Debug)]
pub struct PendingPass {
    frame: RgbaImage,
    params: DetectorParams,
}

impl PendingPass {
    pub fn run(self) -> Option<Quad> {
        detect_document(&self.frame, &self.params)
    }
}

/// One scan: camera acquisition, the detection loop, and capture.
pub struct ScanSession<P: CameraProvider> {
    provider: P,
    config: ScanConfig,
    state: SessionState,
    camera: Option<CameraGuard<P::Stream>>,
    scheduler: FrameScheduler,
    quad_tx: watch::Sender<Option<Quad>>,
}

impl<P: CameraProvider> ScanSession<P> {
    /// Create an Idle session. Fails if `config` does not validate.
    pub fn new(provider: P, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let mut scheduler = FrameScheduler::new(config.tick_interval());
        scheduler.cancel();
        let (quad_tx, _) = watch::channel(None);
        Ok(Self {
            provider,
            config,
            state: SessionState::Idle,
            camera: None,
            scheduler,
            quad_tx,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn tick_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    /// The quad published by the most recent completed pass.
    pub fn current_quad(&self) -> Option<Quad> {
        *self.quad_tx.borrow()
    }

    /// Observe published quads, e.g. to draw the overlay.
    pub fn subscribe(&self) -> watch::Receiver<Option<Quad>> {
        self.quad_tx.subscribe()
    }

    pub fn camera_active(&self) -> bool {
        self.camera.as_ref().is_some_and(CameraGuard::is_active)
    }

    /// Acquire the camera. On failure the session stays Idle and the error
    /// is returned as-is; nothing is retried.
    #[instrument(skip(self), fields(camera = self.provider.name()))]
    pub async fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("start"));
        }
        let stream = match self.provider.acquire().await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "camera acquisition failed");
                return Err(err);
            }
        };
        self.camera = Some(CameraGuard::new(stream));
        self.state = SessionState::Active;
        info!("camera acquired");

        if self.config.detect_on_start {
            self.enable_detection()?;
        }
        Ok(())
    }

    /// Run detection passes on subsequent ticks. The camera is untouched.
    pub fn enable_detection(&mut self) -> Result<()> {
        match self.state {
            SessionState::Looping => Ok(()),
            SessionState::Active | SessionState::Paused => {
                self.scheduler.resume();
                self.transition(SessionState::Looping);
                Ok(())
            }
            _ => Err(self.invalid("enable_detection")),
        }
    }

    /// Cancel upcoming passes. A pass already running still completes and
    /// publishes. The camera is untouched.
    pub fn disable_detection(&mut self) -> Result<()> {
        match self.state {
            SessionState::Paused => Ok(()),
            SessionState::Active | SessionState::Looping => {
                self.scheduler.cancel();
                self.transition(SessionState::Paused);
                Ok(())
            }
            _ => Err(self.invalid("disable_detection")),
        }
    }

    /// One scheduler callback: run a full detection pass if one is due.
    ///
    /// A frame that cannot be sampled is an error for this tick only; the next
    /// tick tries again.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome> {
        match self.begin_pass(now)? {
            PassStart::Skipped(reason) => Ok(TickOutcome::Skipped(reason)),
            PassStart::Ready(pass) => {
                let quad = pass.run();
                Ok(TickOutcome::Processed(self.complete_pass(quad)))
            }
        }
    }

    /// First half of a pass: admit the tick, sample the frame, and unpack it
    /// into a raster. An admitted pass must be finished with
    /// [`Self::complete_pass`] or [`Self::abandon_pass`]; until then every
    /// tick is `Busy`. A frame that cannot be sampled or unpacked releases
    /// the pass and fails this tick.
    pub fn begin_pass(&mut self, now: Instant) -> Result<PassStart> {
        if !self.state.is_open() {
            return Ok(PassStart::Skipped(SkipReason::Inactive));
        }
        match self.scheduler.poll(now) {
            TickDecision::Run => {}
            TickDecision::Cancelled => return Ok(PassStart::Skipped(SkipReason::Cancelled)),
            TickDecision::Busy => return Ok(PassStart::Skipped(SkipReason::Busy)),
            TickDecision::TooSoon { .. } => return Ok(PassStart::Skipped(SkipReason::TooSoon)),
        }

        match self.sample_frame() {
            Ok(frame) => Ok(PassStart::Ready(PendingPass {
                frame,
                params: self.config.detector.clone(),
            })),
            Err(err) => {
                self.scheduler.finish();
                Err(err)
            }
        }
    }

    /// Second half of a pass: publish its result. A result arriving after the
    /// session closed is discarded.
    pub fn complete_pass(&mut self, quad: Option<Quad>) -> Option<Quad> {
        self.scheduler.finish();
        if self.state == SessionState::Closed {
            debug!("pass finished after close, result dropped");
            return None;
        }
        self.quad_tx.send_replace(quad);
        debug!(found = quad.is_some(), "quad published");
        quad
    }

    /// Release an admitted pass without publishing anything.
    pub fn abandon_pass(&mut self) {
        self.scheduler.finish();
    }

    /// Sample the current frame, rectify it with the held quad, and close the
    /// session. Rectification failure or no held quad keeps the raw frame.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn capture(&mut self) -> Result<CapturedFrame> {
        if !self.state.is_open() {
            return Err(self.invalid("capture"));
        }
        let sampled = self.sample_frame();
        let quad = self.current_quad();
        self.close();
        let frame = sampled?;

        let captured = match quad {
            Some(quad) => match rectify(&frame, quad.as_slice(), self.config.rectify_mode) {
                Ok(page) => CapturedFrame::new(page, true),
                Err(err) => {
                    warn!(error = %err, "rectification failed, keeping raw frame");
                    CapturedFrame::new(frame, false)
                }
            },
            None => {
                debug!("no document outline held, keeping raw frame");
                CapturedFrame::new(frame, false)
            }
        };

        let (width, height) = captured.dimensions();
        info!(id = %captured.id, width, height, rectified = captured.rectified, "page captured");
        Ok(captured)
    }

    /// Cancel pending ticks and release the camera. Valid in every state.
    pub fn close(&mut self) {
        self.scheduler.cancel();
        if let Some(mut camera) = self.camera.take() {
            camera.release();
        }
        self.quad_tx.send_replace(None);
        self.transition(SessionState::Closed);
    }

    /// Alias of [`Self::close`].
    pub fn stop(&mut self) {
        self.close();
    }

    fn sample_frame(&mut self) -> Result<RgbaImage> {
        let packed = match self.camera.as_mut() {
            Some(camera) => camera.sample()?,
            None => return Err(ScanError::CameraUnavailable("no camera stream".into())),
        };
        from_packed(packed)
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            info!(from = %self.state, to = %to, "session state changed");
            self.state = to;
        }
    }

    fn invalid(&self, operation: &'static str) -> ScanError {
        ScanError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}
