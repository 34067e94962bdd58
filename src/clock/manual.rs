//! Hand-driven time sources for deterministic tests.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use super::{Clock, TickSource};

// == Manual Clock ==
/// A [`Clock`] that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: AtomicU32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock at an arbitrary reading, e.g. just below `u32::MAX`
    /// to exercise wraparound.
    pub fn starting_at(seconds: u32) -> Self {
        Self {
            seconds: AtomicU32::new(seconds),
        }
    }

    /// Moves the clock forward, wrapping at `u32::MAX`.
    pub fn advance(&self, seconds: u32) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn set(&self, seconds: u32) {
        self.seconds.store(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.seconds.load(Ordering::SeqCst)
    }
}

// == Manual Ticks ==
/// A [`TickSource`] whose coarse counter is the low half of its precise one.
///
/// Counts precise reads so tests can assert how often a clock reconciles.
#[derive(Debug, Default)]
pub struct ManualTicks {
    ms: AtomicU64,
    precise_reads: AtomicUsize,
}

impl ManualTicks {
    pub fn new(start_ms: u64) -> Self {
        Self {
            ms: AtomicU64::new(start_ms),
            precise_reads: AtomicUsize::new(0),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Number of times `precise_ms` has been called.
    pub fn precise_reads(&self) -> usize {
        self.precise_reads.load(Ordering::SeqCst)
    }
}

impl TickSource for ManualTicks {
    fn coarse_ms(&self) -> u32 {
        self.ms.load(Ordering::SeqCst) as u32
    }

    fn precise_ms(&self) -> u64 {
        self.precise_reads.fetch_add(1, Ordering::SeqCst);
        self.ms.load(Ordering::SeqCst)
    }
}
