//! Integration Tests for the Cache
//!
//! Exercises the public API end to end: real clocks, shared use across
//! threads, and configuration loading.

use std::sync::Arc;
use std::thread::{self, sleep};
use std::time::Duration;

use timed_cache::clock::{ManualTicks, WrappingClock};
use timed_cache::{Cache, CacheConfig, CacheError, CacheStats, UnsyncCache};
use tracing_subscriber::EnvFilter;

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "timed_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

// == Real Clock Scenarios ==

#[test]
fn test_floating_limit_with_real_clock() {
    init_tracing();
    let cache: Cache<&str, i32> = Cache::new();
    cache.set_floating_limit(Duration::from_secs(2)).unwrap();

    cache.set("a", 1);
    assert_eq!(cache.try_get("a"), Some(1));

    sleep(Duration::from_secs(3));

    assert_eq!(cache.try_get("a"), None);
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_max_items_scenario() {
    init_tracing();
    let cache: Cache<String, usize> = Cache::new();
    cache.set_max_items(8);

    for i in 0..10 {
        cache.set(i.to_string(), i);
    }

    assert!(cache.len() <= 7);
    assert!(!cache.contains_key("0"));
    assert!(!cache.contains_key("1"));
    assert!(cache.contains_key("8"));
    assert!(cache.contains_key("9"));
}

// == Concurrency ==

#[test]
fn test_shared_across_threads() {
    init_tracing();
    let cache: Arc<Cache<u64, u64>> = Arc::new(Cache::new());

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500u64 {
                    let key = t * 1_000 + i;
                    cache.set(key, key * 2);
                    assert_eq!(cache.try_get(&key), Some(key * 2));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 4_000);
    let stats = cache.stats();
    assert_eq!(stats.hits, 4_000);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_soft_limit_holds_under_contention() {
    let config = CacheConfig {
        max_items: 256,
        ..CacheConfig::default()
    };
    let cache: Arc<Cache<u64, u64>> = Arc::new(Cache::with_config(config));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2_000u64 {
                    cache.set(t * 10_000 + i, i);
                    assert!(cache.len() <= 256 + 32);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 256 + 32);
    assert!(cache.stats().evictions > 0);
}

// == Wraparound-Tolerant Clock ==

#[test]
fn test_cache_over_wrapping_clock() {
    // Coarse counter sits 10 seconds before its 32-bit overflow.
    let ticks = Arc::new(ManualTicks::new((1u64 << 32) - 10_000));
    let clock = Arc::new(WrappingClock::new(ticks.clone()));
    let config = CacheConfig {
        floating_limit: 20,
        ..CacheConfig::default()
    };
    let cache: UnsyncCache<&str, i32> = Cache::with_clock(config, clock);

    cache.set("a", 1);
    for _ in 0..15 {
        ticks.advance_ms(1_000);
    }
    assert_eq!(cache.try_get("a"), Some(1), "15s idle is inside the limit");

    ticks.advance_ms(21_000);
    assert_eq!(cache.try_get("a"), None, "21s idle is past the limit");
}

// == Configuration ==

#[test]
fn test_config_from_json() {
    let config: CacheConfig =
        serde_json::from_str(r#"{"floating_limit": 0, "absolute_limit": 60}"#).unwrap();

    assert_eq!(config.check_interval, 300);
    assert_eq!(config.floating_limit, 0);
    assert_eq!(config.absolute_limit, 60);
    assert_eq!(config.max_items, 0);

    let cache: Cache<String, String> = Cache::with_config(config);
    assert_eq!(cache.absolute_limit(), Duration::from_secs(60));
    assert_eq!(cache.floating_limit(), Duration::ZERO);
}

#[test]
fn test_config_rejects_negative_json() {
    let result: Result<CacheConfig, _> = serde_json::from_str(r#"{"max_items": -1}"#);
    assert!(result.is_err());
}

#[test]
fn test_invalid_setter_leaves_cache_unchanged() {
    let cache: Cache<u8, u8> = Cache::new();

    let err = cache
        .set_check_interval(Duration::from_millis(10))
        .unwrap_err();

    assert!(matches!(err, CacheError::InvalidConfig { .. }));
    assert_eq!(cache.check_interval(), Duration::from_secs(300));
}

#[test]
fn test_stats_serialize() {
    let cache: Cache<u8, u8> = Cache::new();
    cache.set(1, 1);
    cache.try_get(&1);
    cache.try_get(&2);

    let stats: CacheStats = cache.stats();
    let json: serde_json::Value = serde_json::to_value(&stats).unwrap();

    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(stats.hit_rate(), 0.5);
}
