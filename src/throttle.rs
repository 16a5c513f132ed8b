//! One rate limiter for every high-frequency input (scroll, resize, pointer).
//!
//! The host owns the clock and the timers; a [`Throttle`] only decides. Each
//! incoming event calls [`Throttle::request`], which says whether to run the
//! work now or which wake-up to schedule. When that wake-up arrives the host
//! calls [`Throttle::fire`]. Intermediate events are dropped, never queued:
//! every handler reads the latest state (scroll offset, viewport size) when it
//! finally runs, so skipping is always safe.

use std::time::Duration;

/// How a gate spaces out runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    /// At most one run per rendered frame (`requestAnimationFrame`).
    Frame,
    /// At most one run per interval, with a trailing run at the end of the
    /// window so the last event is never lost.
    Interval(Duration),
}

/// Answer to [`Throttle::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Do the work immediately.
    Run,
    /// Schedule an animation frame, then call [`Throttle::fire`].
    NextFrame,
    /// Schedule a timer for this long, then call [`Throttle::fire`].
    After(Duration),
    /// A wake-up is already pending; nothing to do.
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct Throttle {
    limit: RateLimit,
    last_run: Option<Duration>,
    pending: bool,
}

impl Throttle {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            last_run: None,
            pending: false,
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Whether a frame or timer wake-up is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn request(&mut self, now: Duration) -> Admission {
        if self.pending {
            return Admission::Coalesced;
        }
        match self.limit {
            RateLimit::Frame => {
                self.pending = true;
                Admission::NextFrame
            }
            RateLimit::Interval(interval) => match self.last_run {
                Some(last) if now.saturating_sub(last) < interval => {
                    self.pending = true;
                    Admission::After(interval - now.saturating_sub(last))
                }
                _ => {
                    self.last_run = Some(now);
                    Admission::Run
                }
            },
        }
    }

    /// The scheduled wake-up arrived. Returns `true` if the work should run.
    ///
    /// Stray wake-ups (nothing pending) return `false`, so a host that fires
    /// twice cannot double-run.
    pub fn fire(&mut self, now: Duration) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.last_run = Some(now);
        true
    }
}
