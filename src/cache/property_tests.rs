//! Property-Based Tests for Cache Module
//!
//! Uses proptest with a hand-driven clock so time-dependent properties run
//! without sleeping.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::Cache;
use crate::clock::ManualClock;
use crate::config::CacheConfig;

// == Helpers ==
fn cache_with(config: CacheConfig, start: u32) -> (Cache<u16, u32>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_at(start));
    (Cache::with_clock(config, clock.clone()), clock)
}

fn no_expiry() -> CacheConfig {
    CacheConfig {
        floating_limit: 0,
        ..CacheConfig::default()
    }
}

// == Strategies ==
/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: u16, value: u32 },
    Get { key: u16 },
    Remove { key: u16 },
    Contains { key: u16 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    let key = 0u16..32;
    prop_oneof![
        (key.clone(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key.clone().prop_map(|key| CacheOp::Get { key }),
        key.clone().prop_map(|key| CacheOp::Remove { key }),
        key.prop_map(|key| CacheOp::Contains { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without limits the cache behaves like a plain map, and the hit/miss
    // counters match what callers observed.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let (cache, _) = cache_with(no_expiry(), 0);
        let mut model: HashMap<u16, u32> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key, value);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = cache.try_get(&key);
                    prop_assert_eq!(got, model.get(&key).copied());
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(cache.remove(&key), model.remove(&key).is_some());
                }
                CacheOp::Contains { key } => {
                    prop_assert_eq!(cache.contains_key(&key), model.contains_key(&key));
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, model.len());
        prop_assert_eq!(cache.get_all_entries(), model);
    }

    // An entry read within the floating limit survives; one left idle past
    // it does not. Holds wherever the clock starts, including just below
    // the 32-bit wrap.
    #[test]
    fn prop_floating_expiration(
        limit in 1u32..10_000,
        within in 0u32..10_000,
        start in prop_oneof![Just(0u32), Just(u32::MAX - 5_000), any::<u32>()],
    ) {
        let within = within % (limit + 1);
        let (cache, clock) = cache_with(CacheConfig {
            floating_limit: limit,
            ..CacheConfig::default()
        }, start);

        cache.set(1, 7);
        clock.advance(within);
        prop_assert_eq!(cache.try_get(&1), Some(7));

        clock.advance(limit + 1);
        prop_assert_eq!(cache.try_get(&1), None);
        prop_assert_eq!(cache.len(), 0);
    }

    // Reading inside the floating window keeps an entry alive only until
    // its absolute limit.
    #[test]
    fn prop_absolute_dominates(
        floating in 2u32..100,
        absolute in 1u32..1_000,
        start in any::<u32>(),
    ) {
        let (cache, clock) = cache_with(CacheConfig {
            floating_limit: floating,
            absolute_limit: absolute,
            ..CacheConfig::default()
        }, start);
        let step = floating - 1;

        cache.set(1, 7);
        let mut age = 0u32;
        while age + step < absolute {
            clock.advance(step);
            age += step;
            prop_assert_eq!(cache.try_get(&1), Some(7), "died early at age {}", age);
        }

        clock.advance(absolute - age);
        prop_assert_eq!(cache.try_get(&1), None);
    }

    // remove returns true once per insertion.
    #[test]
    fn prop_idempotent_removal(key in any::<u16>(), extra in 1usize..5) {
        let (cache, _) = cache_with(no_expiry(), 0);

        cache.set(key, 1);
        prop_assert!(cache.remove(&key));
        for _ in 0..extra {
            prop_assert!(!cache.remove(&key));
        }
    }

    // Filling to max + max/8 + 1 trims to max - max/8 and evicts exactly the
    // oldest 2 * (max/8) + 1 entries.
    #[test]
    fn prop_trim_hysteresis(max_items in 1usize..300, same_second in any::<bool>()) {
        let (cache, clock) = cache_with(CacheConfig {
            max_items,
            ..no_expiry()
        }, 0);
        let threshold = max_items / 8;
        let total = max_items + threshold + 1;

        for i in 0..total {
            cache.set(i as u16, i as u32);
            if !same_second {
                clock.advance(1);
            }
        }

        let evicted = 2 * threshold + 1;
        prop_assert_eq!(cache.len(), max_items - threshold);
        prop_assert_eq!(cache.stats().evictions, evicted as u64);
        for i in 0..total {
            prop_assert_eq!(cache.contains_key(&(i as u16)), i >= evicted, "key {}", i);
        }
    }

    // The item count never exceeds the limit by more than the margin.
    #[test]
    fn prop_soft_capacity(
        max_items in 1usize..64,
        keys in prop::collection::vec(any::<u16>(), 1..300),
    ) {
        let (cache, _) = cache_with(CacheConfig {
            max_items,
            ..no_expiry()
        }, 0);

        for key in keys {
            cache.set(key, 0);
            prop_assert!(cache.len() <= max_items + max_items / 8);
        }
    }
}
