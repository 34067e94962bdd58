//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the expiration test.

use crate::clock::elapsed_between;
use crate::config::CacheConfig;

// == Cache Entry ==
/// A stored value with its clock readings.
///
/// `created_at` never changes. `last_access` starts equal to it and only moves
/// on a successful read, so `created_at <= last_access` in clock order.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Clock reading when the entry was set
    pub created_at: u32,
    /// Clock reading of the last successful read (or creation)
    pub last_access: u32,
    /// Strictly increasing stamp of the last access, orders same-second ties
    pub access_seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    pub fn new(value: V, now: u32, seq: u64) -> Self {
        Self {
            value,
            created_at: now,
            last_access: now,
            access_seq: seq,
        }
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: u32, seq: u64) {
        self.last_access = now;
        self.access_seq = seq;
    }

    // == Idle Time ==
    /// Seconds since the last access.
    pub fn idle(&self, now: u32) -> u32 {
        elapsed_between(self.last_access, now)
    }

    // == Is Expired ==
    /// Checks the entry against the absolute and floating limits.
    ///
    /// The absolute limit is inclusive (an entry is dead once its age reaches
    /// the limit), the floating limit exclusive (it survives an idle time
    /// equal to the limit). A limit of zero is disabled.
    pub fn is_expired(&self, now: u32, config: &CacheConfig) -> bool {
        (config.absolute_limit != 0
            && elapsed_between(self.created_at, now) >= config.absolute_limit)
            || (config.floating_limit != 0 && self.idle(now) > config.floating_limit)
    }
}
