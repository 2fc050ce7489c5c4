//! Time sources
//!
//! The control loop needs two clocks: a monotonic millisecond counter for
//! debouncing and poll gating, and the wall clock for hour-bucketing shows
//! and entries. The wall clock may not be known yet; it then reads 0.

use std::time::Instant;

use chrono::Utc;

/// 2020-01-01T00:00:00Z. Earlier readings mean the clock was never set.
pub const EARLIEST_VALID_EPOCH: i64 = 1_577_836_800;

/// Unix time in seconds, or 0 while unknown
pub trait WallClock {
    fn epoch_seconds(&self) -> u64;
}

/// Milliseconds since an arbitrary fixed origin
pub trait MonotonicClock {
    fn now_ms(&self) -> u64;
}

/// System clock, treated as unset until it has been synchronised
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn epoch_seconds(&self) -> u64 {
        validate_epoch(Utc::now().timestamp())
    }
}

fn validate_epoch(seconds: i64) -> u64 {
    if seconds < EARLIEST_VALID_EPOCH {
        0
    } else {
        seconds as u64
    }
}

/// Milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for InstantClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
