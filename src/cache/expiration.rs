//! Expiration Sweep
//!
//! Full-table scan that drops entries past their absolute or floating limit.
//! Callers invoke it on ordinary operations; the check interval keeps the
//! O(n) scan from running more than once per interval.

use std::hash::{BuildHasher, Hash};

use tracing::debug;

use crate::cache::store::Inner;
use crate::clock::elapsed_between;

impl<K, V, S> Inner<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    // == Remove Expired ==
    /// Sweeps expired entries if forced or if the check interval has passed.
    ///
    /// Does nothing while no time limit is active. Returns the number of
    /// entries removed.
    pub(crate) fn remove_expired(&mut self, now: u32, force: bool) -> usize {
        if self.config.floating_limit == 0 && self.config.absolute_limit == 0 {
            return 0;
        }
        if !force
            && elapsed_between(self.last_expiration_check, now) < self.config.check_interval
        {
            return 0;
        }
        self.last_expiration_check = now;

        let before = self.entries.len();
        let config = self.config;
        let live = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired(now, &config))
            .count();

        if live == 0 {
            self.clear();
        } else if live < before {
            self.entries.retain(|_, entry| !entry.is_expired(now, &config));
        }

        let removed = before - live;
        if removed > 0 {
            self.stats.record_expirations(removed);
            debug!(
                "Expiration sweep: removed {} entries, {} remain",
                removed, live
            );
        }
        removed
    }
}
