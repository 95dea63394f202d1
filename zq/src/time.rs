//! Wrapping millisecond timestamps and the clock collaborator.
//!
//! Every "after duration X" decision in this crate is polled: a timestamp is
//! stored when something starts, and later compared against `now`. The counter
//! wraps, so elapsed time is always computed with wrapping subtraction and
//! absolute timestamps are never compared directly.

use embassy_time::{Duration, Instant};

/// A point in time on the wrapping millisecond counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(pub u32);

impl Timestamp {
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, correct across counter wrap-around.
    pub fn duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.wrapping_sub(earlier.0) as u64)
    }

    /// Whether at least `term` has passed between `earlier` and `self`.
    pub fn has_elapsed(self, earlier: Timestamp, term: Duration) -> bool {
        self.duration_since(earlier) >= term
    }
}

/// Monotonic wrapping clock
pub trait Clock {
    fn now(&self) -> Timestamp;

    fn elapsed(&self, since: Timestamp) -> Duration {
        self.now().duration_since(since)
    }
}

/// [`Clock`] backed by the embassy time driver, truncated to a 32-bit millisecond counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Timestamp {
        Timestamp(Instant::now().as_millis() as u32)
    }
}
