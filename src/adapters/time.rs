//! Host time adapter.
//!
//! Provides the millisecond [`Clock`] for the simulator.  On the board the
//! clock comes from the MCU tick counter; on the host it is derived from
//! `std::time::Instant` so the cooperative delay spins against real time.

use std::time::Instant;

use crate::app::ports::Clock;

/// Monotonic clock counting milliseconds since construction.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since construction.
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl Clock for MonotonicClock {
    /// Truncated to `u32`, so it wraps like the MCU counter does.
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
