//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only configuration can fail. Lookups report a miss as `None`/`false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A limit that cannot be represented in whole seconds
    #[error("Invalid {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// An environment variable that is not a non-negative integer
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
