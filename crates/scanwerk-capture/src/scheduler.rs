// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-independent tick throttling: interval check against a monotonic clock,
// an at-most-one-pass guard, and cancellation.

use std::time::{Duration, Instant};

/// What the scheduler says about a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Run a pass now. The caller must call [`FrameScheduler::finish`] after.
    Run,
    /// The interval has not elapsed since the last pass started.
    TooSoon { remaining: Duration },
    /// A pass is still running; this tick is dropped, not queued.
    Busy,
    /// Ticks are cancelled until [`FrameScheduler::resume`].
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    last_run: Option<Instant>,
    in_flight: bool,
    cancelled: bool,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            in_flight: false,
            cancelled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a tick arriving at `now` runs. A `Run` marks the pass as
    /// in flight and restarts the interval.
    pub fn poll(&mut self, now: Instant) -> TickDecision {
        if self.cancelled {
            return TickDecision::Cancelled;
        }
        if self.in_flight {
            return TickDecision::Busy;
        }
        if let Some(last) = self.last_run {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.interval {
                return TickDecision::TooSoon {
                    remaining: self.interval - elapsed,
                };
            }
        }
        self.in_flight = true;
        self.last_run = Some(now);
        TickDecision::Run
    }

    /// Mark the running pass complete.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Cancel upcoming ticks. A pass already in flight still completes.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn resume(&mut self) {
        self.cancelled = false;
    }
}
