//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every field carries a
//! default so partial files are accepted.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default number of employees fetched per directory page during a run.
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Default time-to-live for cached reads, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 600;

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live applied to every populated cache entry.
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    /// Returns the TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Overtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertimeConfig {
    /// Multiplier applied to the hourly rate for overtime hours.
    pub multiplier: Decimal,
    /// Ordinary hours in a workday; the hourly rate is the daily salary divided by this.
    pub hours_per_workday: Decimal,
    /// Upper bound on overtime hours a single submission may claim for one day.
    pub max_hours_per_day: Decimal,
}

impl Default for OvertimeConfig {
    fn default() -> Self {
        Self {
            multiplier: dec!(2),
            hours_per_workday: dec!(8),
            max_hours_per_day: dec!(3),
        }
    }
}

/// The complete payroll engine configuration.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfig;
///
/// let config = PayrollConfig::default();
/// assert_eq!(config.chunk_size, 20);
/// assert_eq!(config.cache.ttl_seconds, 600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Page size used when walking the employee directory.
    pub chunk_size: usize,
    /// Cache settings.
    pub cache: CacheConfig,
    /// Overtime settings.
    pub overtime: OvertimeConfig,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache: CacheConfig::default(),
            overtime: OvertimeConfig::default(),
        }
    }
}

impl PayrollConfig {
    /// Returns a copy with a different chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Checks the values that cannot be expressed in the type system.
    ///
    /// Returns a description of the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".to_string());
        }
        if self.overtime.multiplier <= Decimal::ZERO {
            return Err("overtime.multiplier must be greater than zero".to_string());
        }
        if self.overtime.hours_per_workday <= Decimal::ZERO {
            return Err("overtime.hours_per_workday must be greater than zero".to_string());
        }
        if self.overtime.max_hours_per_day <= Decimal::ZERO {
            return Err("overtime.max_hours_per_day must be greater than zero".to_string());
        }
        Ok(())
    }
}
