//! Leading + trailing edge throttling.
//!
//! The throttle does not own a timer. [`Throttle::poll`] says whether the
//! caller should run now, defer a single trailing run, or drop the call
//! because a trailing run is already pending. The caller reports the
//! trailing run back through [`Throttle::fire_trailing`].

use std::time::Duration;

/// What to do with a throttled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Run the callback now.
    Run,
    /// Schedule one trailing run after the given delay.
    Defer(Duration),
    /// A trailing run is already scheduled; drop this call.
    Skip,
}

/// Rate limiter allowing at most one run per interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    /// Minimum time between two runs.
    interval: Duration,
    /// When the callback last ran.
    last_run: Option<Duration>,
    /// Whether a trailing run is scheduled.
    trailing_pending: bool,
}

impl Throttle {
    /// Creates a throttle with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing_pending: false,
        }
    }

    /// The throttle interval.
    #[must_use]
    pub const fn interval(&self) -> Duration { self.interval }

    /// Decides what to do with a call arriving at `now`.
    pub fn poll(&mut self, now: Duration) -> Gate {
        match self.last_run {
            Some(last) if now < last + self.interval => {
                if self.trailing_pending {
                    Gate::Skip
                } else {
                    self.trailing_pending = true;
                    Gate::Defer(last + self.interval - now)
                }
            }
            _ => {
                self.last_run = Some(now);
                Gate::Run
            }
        }
    }

    /// Records that the scheduled trailing run happened at `now`.
    pub fn fire_trailing(&mut self, now: Duration) {
        self.trailing_pending = false;
        self.last_run = Some(now);
    }
}
