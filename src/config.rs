//! Configuration Module
//!
//! Handles loading and validating cache expiration policy.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default interval between throttled expiration sweeps, in seconds
pub const DEFAULT_CHECK_INTERVAL: u32 = 300;

/// Default floating (idle) limit, in seconds
pub const DEFAULT_FLOATING_LIMIT: u32 = 300;

/// Cache expiration policy.
///
/// Time values are whole seconds; `0` disables the corresponding limit.
/// The item limit is soft, see [`crate::Cache::set_max_items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Minimum seconds between two throttled expiration sweeps
    pub check_interval: u32,
    /// Seconds of inactivity after which an entry expires (0 = disabled)
    pub floating_limit: u32,
    /// Seconds after creation at which an entry expires (0 = disabled)
    pub absolute_limit: u32,
    /// Soft maximum number of entries (0 = disabled)
    pub max_items: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CHECK_INTERVAL` - Sweep throttle in seconds (default: 300)
    /// - `CACHE_FLOATING_LIMIT` - Idle expiration in seconds (default: 300)
    /// - `CACHE_ABSOLUTE_LIMIT` - Age expiration in seconds (default: 0)
    /// - `CACHE_MAX_ITEMS` - Soft item limit (default: 0)
    ///
    /// Unset variables fall back to their default. A variable that is set but
    /// is not a non-negative integer is rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            check_interval: parse_var(
                &lookup,
                "CACHE_CHECK_INTERVAL",
                defaults.check_interval,
            )?,
            floating_limit: parse_var(
                &lookup,
                "CACHE_FLOATING_LIMIT",
                defaults.floating_limit,
            )?,
            absolute_limit: parse_var(
                &lookup,
                "CACHE_ABSOLUTE_LIMIT",
                defaults.absolute_limit,
            )?,
            max_items: parse_var(&lookup, "CACHE_MAX_ITEMS", defaults.max_items)?,
        })
    }

    // == Duration Views ==
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.into())
    }

    pub fn floating_limit(&self) -> Duration {
        Duration::from_secs(self.floating_limit.into())
    }

    pub fn absolute_limit(&self) -> Duration {
        Duration::from_secs(self.absolute_limit.into())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            floating_limit: DEFAULT_FLOATING_LIMIT,
            absolute_limit: 0,
            max_items: 0,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidEnv { var, value: raw }),
    }
}

// == Duration Conversion ==
/// Converts a configured duration into whole clock seconds.
///
/// `Duration::ZERO` maps to `0` (disabled). Sub-second fractions are dropped,
/// but a non-zero duration under one second is rejected rather than silently
/// turning the limit off.
pub(crate) fn whole_seconds(field: &'static str, value: Duration) -> Result<u32> {
    if value.is_zero() {
        return Ok(0);
    }
    if value < Duration::from_secs(1) {
        return Err(CacheError::InvalidConfig {
            field,
            reason: format!("{:?} is shorter than the one second clock resolution", value),
        });
    }
    u32::try_from(value.as_secs()).map_err(|_| CacheError::InvalidConfig {
        field,
        reason: format!("{} seconds exceeds {}", value.as_secs(), u32::MAX),
    })
}
