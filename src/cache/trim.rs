//! Size Trimmer
//!
//! Keeps the table near its soft item limit. Trimming waits until the table
//! is more than an eighth over the limit, then evicts down to an eighth
//! under it, so a cache hovering at the limit is not trimmed on every insert.

use std::cmp::Reverse;
use std::hash::{BuildHasher, Hash};

use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::cache::store::Inner;

/// Eviction order: longest idle first, then oldest access stamp.
fn eviction_rank<V>(entry: &CacheEntry<V>, now: u32) -> (Reverse<u32>, u64) {
    (Reverse(entry.idle(now)), entry.access_seq)
}

impl<K, V, S> Inner<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    // == Trim ==
    /// Evicts least-recently-accessed entries once the table has overrun
    /// `max_items` by more than `max_items / 8`.
    ///
    /// `force` skips the overrun margin but still only trims a table that is
    /// over the limit. Returns the number of entries evicted.
    pub(crate) fn trim(&mut self, now: u32, force: bool) -> usize {
        let max_items = self.config.max_items;
        let count = self.entries.len();
        if max_items == 0 || count <= max_items {
            return 0;
        }

        let threshold = max_items / 8;
        let overrun = count - max_items;
        if !force && overrun <= threshold {
            return 0;
        }

        let to_remove = (overrun + threshold).min(count);
        if to_remove == count {
            self.clear();
        } else {
            // Ranks are unique (access stamps never repeat), so selecting the
            // cutoff rank picks exactly `to_remove` victims without sorting.
            let mut ranks: Vec<_> = self
                .entries
                .values()
                .map(|entry| eviction_rank(entry, now))
                .collect();
            let (_, &mut cutoff, _) = ranks.select_nth_unstable(to_remove - 1);
            self.entries
                .retain(|_, entry| eviction_rank(entry, now) > cutoff);
        }

        self.stats.record_evictions(to_remove);
        debug!(
            "Size trim: evicted {} entries, {} remain (max_items={})",
            to_remove,
            self.entries.len(),
            max_items
        );
        to_remove
    }
}
