//! Cache Store Module
//!
//! Main cache engine combining the entry table with throttled expiration and
//! hysteresis-based size trimming.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::cache::lock::{Guarded, LockPolicy, Synchronized, Unsynchronized};
use crate::cache::CacheStats;
use crate::clock::{Clock, MonotonicClock};
use crate::config::{whole_seconds, CacheConfig};
use crate::error::Result;

// == Inner State ==
/// Everything the lock protects.
pub(crate) struct Inner<K, V, S> {
    pub(crate) entries: HashMap<K, CacheEntry<V>, S>,
    pub(crate) config: CacheConfig,
    /// Clock reading of the last full expiration sweep
    pub(crate) last_expiration_check: u32,
    pub(crate) stats: CacheStats,
    next_seq: u64,
}

impl<K, V, S> Inner<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    fn new(config: CacheConfig, hasher: S, now: u32) -> Self {
        Self {
            entries: HashMap::with_hasher(hasher),
            config,
            last_expiration_check: now,
            stats: CacheStats::new(),
            next_seq: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Drops the table and starts a fresh one, releasing its capacity.
    pub(crate) fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries = HashMap::with_hasher(self.entries.hasher().clone());
        }
    }
}

// == Cache ==
/// A key/value cache with absolute, floating and soft size limits.
///
/// Every operation takes the lock selected by `P`, reads the clock while
/// holding it, and does its work synchronously. Readings taken under the lock
/// are ordered, so no entry is ever stamped later than the time a subsequent
/// operation sees. Expiration sweeps and trims are amortized over
/// ordinary calls; the cache never spawns threads or timers.
///
/// # Type Parameters
/// * `P` - [`Synchronized`] (default) or [`Unsynchronized`]
/// * `S` - hasher used for keys
pub struct Cache<K, V, P: LockPolicy = Synchronized, S = RandomState> {
    clock: Arc<dyn Clock>,
    inner: P::Lock<Inner<K, V, S>>,
}

/// A cache for single-threaded use, without any locking.
pub type UnsyncCache<K, V, S = RandomState> = Cache<K, V, Unsynchronized, S>;

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
{
    // == Constructor ==
    /// Creates a thread-safe cache with the default configuration
    /// (5 minute floating limit, no absolute or size limit).
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a thread-safe cache with the given configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }
}

impl<K, V, P> Cache<K, V, P>
where
    K: Hash + Eq,
    P: LockPolicy,
{
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_hasher(config, clock, RandomState::new())
    }
}

impl<K, V, P, S> Default for Cache<K, V, P, S>
where
    K: Hash + Eq,
    P: LockPolicy,
    S: BuildHasher + Clone + Default,
{
    fn default() -> Self {
        Self::with_hasher(
            CacheConfig::default(),
            Arc::new(MonotonicClock::new()),
            S::default(),
        )
    }
}

impl<K, V, P, S> Cache<K, V, P, S>
where
    K: Hash + Eq,
    P: LockPolicy,
    S: BuildHasher + Clone,
{
    /// Creates a cache with a custom clock and key hasher.
    pub fn with_hasher(config: CacheConfig, clock: Arc<dyn Clock>, hasher: S) -> Self {
        let now = clock.now();
        Self {
            clock,
            inner: Guarded::new(Inner::new(config, hasher, now)),
        }
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// An existing entry under the same key is replaced and its expiration
    /// clock starts over. May run a throttled expiration sweep beforehand and
    /// a size trim afterwards.
    pub fn set(&self, key: K, value: V) {
        self.inner.with(|inner| {
            let now = self.clock.now();
            inner.remove_expired(now, false);
            let seq = inner.next_seq();
            inner.entries.insert(key, CacheEntry::new(value, now, seq));
            inner.trim(now, false);
        });
    }

    // == Try Get ==
    /// Returns a copy of the value if present and unexpired.
    ///
    /// A hit refreshes the entry's floating window. An expired entry is
    /// removed on the spot; a plain miss gives the throttled sweep a chance to
    /// run.
    pub fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.with(|inner| {
            let now = self.clock.now();
            let seq = inner.next_seq();
            let expired = match inner.entries.get_mut(key) {
                Some(entry) if !entry.is_expired(now, &inner.config) => {
                    entry.touch(now, seq);
                    inner.stats.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            };

            if expired {
                inner.entries.remove(key);
                inner.stats.record_expirations(1);
            } else {
                inner.remove_expired(now, false);
            }
            inner.stats.record_miss();
            None
        })
    }

    // == Contains Key ==
    /// Checks for a live entry without refreshing it.
    ///
    /// An entry found expired is removed. Unlike [`try_get`](Self::try_get),
    /// a miss does not trigger the throttled sweep, so a pure membership check
    /// stays O(1).
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.with(|inner| {
            let now = self.clock.now();
            let expired = match inner.entries.get(key) {
                Some(entry) => entry.is_expired(now, &inner.config),
                None => return false,
            };
            if expired {
                inner.entries.remove(key);
                inner.stats.record_expirations(1);
            }
            !expired
        })
    }

    // == Remove ==
    /// Removes an entry whether or not it has expired.
    ///
    /// Returns `true` if the key was present.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.with(|inner| inner.entries.remove(key).is_some())
    }

    // == Clear ==
    /// Removes every entry by dropping the table and allocating an empty one
    /// with the same hasher. Does nothing on an empty cache.
    pub fn clear(&self) {
        self.inner.with(|inner| inner.clear());
    }

    // == Get All Entries ==
    /// Snapshot of every live entry.
    ///
    /// Built in a single pass that also drops whatever it finds expired.
    /// Access times are left alone.
    pub fn get_all_entries(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.inner.with(|inner| {
            let now = self.clock.now();
            let config = inner.config;
            let before = inner.entries.len();
            let mut snapshot = HashMap::with_capacity(before);

            inner.entries.retain(|key, entry| {
                if entry.is_expired(now, &config) {
                    return false;
                }
                snapshot.insert(key.clone(), entry.value.clone());
                true
            });

            inner
                .stats
                .record_expirations(before - inner.entries.len());
            snapshot
        })
    }

    // == Remove Expired Items ==
    /// Runs a full expiration sweep now, ignoring the check interval.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired_items(&self) -> usize {
        self.inner.with(|inner| inner.remove_expired(self.clock.now(), true))
    }

    // == Length ==
    /// Number of stored entries, including any not yet swept.
    ///
    /// May exceed [`max_items`](Self::max_items), which is a soft limit.
    pub fn len(&self) -> usize {
        self.inner.with(|inner| inner.entries.len())
    }

    /// Returns true if no entries are stored, expired or not.
    pub fn is_empty(&self) -> bool {
        self.inner.with(|inner| inner.entries.is_empty())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.with(|inner| {
            let mut stats = inner.stats.clone();
            stats.total_entries = inner.entries.len();
            stats
        })
    }

    // == Configuration ==
    /// Snapshot of the current expiration policy.
    pub fn config(&self) -> CacheConfig {
        self.inner.with(|inner| inner.config)
    }

    /// Minimum time between two throttled sweeps.
    pub fn check_interval(&self) -> Duration {
        self.config().check_interval()
    }

    /// Idle time after which entries expire; zero when disabled.
    pub fn floating_limit(&self) -> Duration {
        self.config().floating_limit()
    }

    /// Age after which entries expire; zero when disabled.
    pub fn absolute_limit(&self) -> Duration {
        self.config().absolute_limit()
    }

    /// Soft item limit; zero when disabled.
    pub fn max_items(&self) -> usize {
        self.config().max_items
    }

    /// Sets the minimum time between throttled sweeps.
    ///
    /// Lowering it gives the throttled sweep an immediate chance to run under
    /// the new interval.
    pub fn set_check_interval(&self, interval: Duration) -> Result<()> {
        let seconds = whole_seconds("check_interval", interval)?;
        self.inner.with(|inner| {
            let now = self.clock.now();
            let lowered = seconds < inner.config.check_interval;
            inner.config.check_interval = seconds;
            if lowered {
                inner.remove_expired(now, false);
            }
        });
        Ok(())
    }

    /// Sets the idle time after which entries expire. `Duration::ZERO`
    /// disables the limit.
    ///
    /// Tightening the limit sweeps immediately.
    ///
    /// # Errors
    /// Rejects a non-zero duration under one second, or one beyond
    /// `u32::MAX` seconds, leaving the previous limit in place.
    pub fn set_floating_limit(&self, limit: Duration) -> Result<()> {
        let seconds = whole_seconds("floating_limit", limit)?;
        self.inner.with(|inner| {
            let now = self.clock.now();
            let tightened = is_tightened(inner.config.floating_limit, seconds);
            inner.config.floating_limit = seconds;
            if tightened {
                let removed = inner.remove_expired(now, true);
                debug!("Floating limit lowered to {}s, swept {} entries", seconds, removed);
            }
        });
        Ok(())
    }

    /// Sets the age after which entries expire regardless of use.
    /// `Duration::ZERO` disables the limit.
    ///
    /// Same validation and tightening behavior as
    /// [`set_floating_limit`](Self::set_floating_limit).
    pub fn set_absolute_limit(&self, limit: Duration) -> Result<()> {
        let seconds = whole_seconds("absolute_limit", limit)?;
        self.inner.with(|inner| {
            let now = self.clock.now();
            let tightened = is_tightened(inner.config.absolute_limit, seconds);
            inner.config.absolute_limit = seconds;
            if tightened {
                let removed = inner.remove_expired(now, true);
                debug!("Absolute limit lowered to {}s, swept {} entries", seconds, removed);
            }
        });
        Ok(())
    }

    /// Sets the soft item limit; `0` disables it.
    ///
    /// The table may grow past the limit by an eighth before it is trimmed,
    /// and is then trimmed an eighth below it. Lowering the limit trims at
    /// once without waiting for that margin.
    pub fn set_max_items(&self, max_items: usize) {
        self.inner.with(|inner| {
            let now = self.clock.now();
            let tightened = is_tightened(inner.config.max_items, max_items);
            inner.config.max_items = max_items;
            if tightened {
                let evicted = inner.trim(now, true);
                debug!("Max items lowered to {}, evicted {} entries", max_items, evicted);
            }
        });
    }
}

/// A limit is tightened when it becomes active or decreases.
fn is_tightened<T: PartialOrd + Default>(old: T, new: T) -> bool {
    let disabled = T::default();
    new != disabled && (old == disabled || new < old)
}

impl<K, V, P, S> fmt::Debug for Cache<K, V, P, S>
where
    K: Hash + Eq,
    P: LockPolicy,
    S: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("config", &self.config())
            .field("len", &self.len())
            .finish()
    }
}
