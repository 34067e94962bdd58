//! Clock Module
//!
//! Second-resolution time sources measured from the moment the clock is
//! created. The cache only ever compares readings with wrapping subtraction,
//! so a reading may wrap past `u32::MAX` without breaking expiration as long
//! as the deltas involved stay below 2^31 seconds.

mod manual;
mod monotonic;
mod wrapping;

use std::sync::Arc;

pub use manual::{ManualClock, ManualTicks};
pub use monotonic::MonotonicClock;
pub use wrapping::{SystemTicks, TickSource, WrappingClock, RECONCILE_INTERVAL_MS};

// == Clock Trait ==
/// A non-decreasing count of whole seconds since the clock was constructed.
pub trait Clock: Send + Sync {
    /// Returns the elapsed seconds.
    fn now(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u32 {
        (**self).now()
    }
}

// == Time Arithmetic ==
/// Seconds elapsed between two clock readings.
///
/// Computed modulo 2^32, which stays correct when `now` has wrapped past
/// `earlier` provided the true gap is below 2^31 seconds (~68 years).
#[inline]
pub fn elapsed_between(earlier: u32, now: u32) -> u32 {
    now.wrapping_sub(earlier)
}
