use std::time::Instant;

use super::Clock;

// == Monotonic Clock ==
/// Clock backed by the platform's 64-bit monotonic counter.
///
/// The reading is truncated to `u32` only at the very end, so it cannot wrap
/// for about 136 years of process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u32 {
        self.start.elapsed().as_secs() as u32
    }
}
