// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async frame-loop driver: ticks a session on a tokio interval, runs detection
// passes on the blocking pool, and stops when told to.

use std::time::Instant;

use scanwerk_bridge::CameraProvider;
use scanwerk_core::Quad;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::session::{PassStart, ScanSession};

/// Drive `session` until `shutdown` flips to `true` (or its sender is dropped)
/// or the session closes. A shutdown that is already `true` on entry returns
/// before the first tick.
///
/// Passes run off the loop thread, so ticks keep arriving while one is in
/// flight and are reported `Busy` by the session. A pass still running at
/// shutdown is awaited and published before returning. The session is left
/// open for the caller to capture or close.
pub async fn run_frame_loop<P: CameraProvider>(
    session: &mut ScanSession<P>,
    mut shutdown: watch::Receiver<bool>,
) {
    if *shutdown.borrow_and_update() {
        info!("shutdown already requested, frame loop not started");
        return;
    }

    let mut ticker = tokio::time::interval(session.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pending: Option<JoinHandle<Option<Quad>>> = None;
    info!(interval_ms = session.tick_interval().as_millis() as u64, "frame loop started");

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if !session.state().is_open() {
                    break;
                }
                match session.begin_pass(Instant::now()) {
                    Ok(PassStart::Ready(pass)) => {
                        pending = Some(tokio::task::spawn_blocking(move || pass.run()));
                    }
                    Ok(PassStart::Skipped(reason)) => debug!(?reason, "tick skipped"),
                    Err(err) => warn!(error = %err, "frame sample failed, waiting for next tick"),
                }
            }
            joined = join_pending(&mut pending), if pending.is_some() => {
                pending = None;
                finish_pass(session, joined);
            }
        }
    }

    if let Some(handle) = pending.take() {
        finish_pass(session, handle.await);
    }
    info!(state = %session.state(), "frame loop stopped");
}

async fn join_pending(
    pending: &mut Option<JoinHandle<Option<Quad>>>,
) -> Result<Option<Quad>, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn finish_pass<P: CameraProvider>(
    session: &mut ScanSession<P>,
    joined: Result<Option<Quad>, JoinError>,
) {
    match joined {
        Ok(quad) => {
            session.complete_pass(quad);
        }
        Err(err) => {
            warn!(error = %err, "detection pass panicked or was cancelled");
            session.abandon_pass();
        }
    }
}
