//! Cache Module
//!
//! Provides an in-memory cache with absolute and floating expiration and a
//! soft item limit.

mod entry;
mod expiration;
mod lock;
mod stats;
mod store;
mod trim;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use lock::{Guarded, LockPolicy, Synchronized, Unsynchronized};
pub use stats::CacheStats;
pub use store::{Cache, UnsyncCache};
