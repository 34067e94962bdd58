//! Wraparound-tolerant clock for platforms whose cheap tick counter is 32 bits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::trace;

use super::Clock;

/// Maximum coarse-counter drift, in milliseconds, before the precise source
/// is consulted again.
pub const RECONCILE_INTERVAL_MS: u32 = 30_000;

// == Tick Source ==
/// A pair of millisecond counters over the same timeline.
///
/// `coarse_ms` must track the low 32 bits of `precise_ms`. It is expected to
/// be cheap and is allowed to wrap every ~49.7 days; `precise_ms` may be
/// expensive but must never wrap.
pub trait TickSource: Send + Sync {
    fn coarse_ms(&self) -> u32;
    fn precise_ms(&self) -> u64;
}

impl<T: TickSource + ?Sized> TickSource for Arc<T> {
    fn coarse_ms(&self) -> u32 {
        (**self).coarse_ms()
    }

    fn precise_ms(&self) -> u64 {
        (**self).precise_ms()
    }
}

// == System Ticks ==
/// Process-wide tick source derived from [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTicks;

fn process_base() -> Instant {
    static BASE: OnceLock<Instant> = OnceLock::new();
    *BASE.get_or_init(Instant::now)
}

impl TickSource for SystemTicks {
    fn coarse_ms(&self) -> u32 {
        self.precise_ms() as u32
    }

    fn precise_ms(&self) -> u64 {
        process_base().elapsed().as_millis() as u64
    }
}

// == Wrapping Clock ==
/// Clock that reads the coarse counter on every call and the precise one at
/// most once per [`RECONCILE_INTERVAL_MS`] of coarse time.
///
/// The last precise reading is kept in a single atomic word. Its low 32 bits
/// double as the coarse sample taken at reconciliation, so the pair
/// (high bits, low sample) is always published together.
///
/// # Wraparound
/// Between reconciliations the elapsed time is `coarse - low_sample` in
/// wrapping arithmetic, which is exact across a 32-bit overflow. If the clock
/// goes unread for a full coarse period (~49.7 days) the coarse counter can
/// come back around to within the reconcile window, and readings are short by
/// one period until the next reconciliation, at most 30 seconds later. The
/// reading never moves backwards because of this; it only stalls and then
/// catches up.
#[derive(Debug)]
pub struct WrappingClock<T: TickSource = SystemTicks> {
    source: T,
    start_ms: u64,
    anchor: AtomicU64,
}

impl<T: TickSource> WrappingClock<T> {
    pub fn new(source: T) -> Self {
        let start_ms = source.precise_ms();
        Self {
            source,
            start_ms,
            anchor: AtomicU64::new(start_ms),
        }
    }

    // == Current Milliseconds ==
    /// Reconstructed 64-bit millisecond reading.
    fn current_ms(&self) -> u64 {
        let coarse = self.source.coarse_ms();
        let anchor = self.anchor.load(Ordering::Acquire);
        let drift = coarse.wrapping_sub(anchor as u32);

        if drift < RECONCILE_INTERVAL_MS {
            return anchor + u64::from(drift);
        }

        // Concurrent reconciliations may race; every stored value is a valid
        // precise reading, so the newest one winning is enough.
        let precise = self.source.precise_ms();
        self.anchor.fetch_max(precise, Ordering::AcqRel);
        trace!(precise_ms = precise, coarse_ms = coarse, "Reconciled wrapping clock");
        precise
    }
}

impl Default for WrappingClock<SystemTicks> {
    fn default() -> Self {
        Self::new(SystemTicks)
    }
}

impl<T: TickSource> Clock for WrappingClock<T> {
    fn now(&self) -> u32 {
        (self.current_ms().saturating_sub(self.start_ms) / 1000) as u32
    }
}
