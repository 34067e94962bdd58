//! Timed Cache - An embeddable in-memory cache
//!
//! Entries expire by age (absolute limit), by inactivity (floating limit),
//! and by a soft maximum item count. All housekeeping runs inside ordinary
//! calls; the cache has no background threads.
//!
//! ```
//! use std::time::Duration;
//! use timed_cache::Cache;
//!
//! let cache: Cache<String, u32> = Cache::new();
//! cache.set_absolute_limit(Duration::from_secs(3600)).unwrap();
//!
//! cache.set("answer".to_string(), 42);
//! assert_eq!(cache.try_get("answer"), Some(42));
//! assert!(cache.remove("answer"));
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, Synchronized, UnsyncCache, Unsynchronized};
pub use clock::Clock;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
