//! Best-effort read-through cache for period and activity reads.
//!
//! The cache is never authoritative. Every failure is logged and treated as
//! a miss, so an unavailable backend only costs read latency.
//!
//! Keys are structured: an entity kind followed by discriminating parts,
//! rendered `kind:part:part`. Keys built by [`CacheInvalidator`] also embed
//! the kind's current version token (`kind:v<token>:page:limit`). The token
//! itself lives in the cache backend under `kind:version`, so every engine
//! sharing the backend sees the same token. Replacing it retires every
//! entry of that kind at once without scanning the key space.

mod invalidator;
mod memory;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use invalidator::CacheInvalidator;
pub use memory::InMemoryCache;

/// Errors raised by a [`Cache`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The backend cannot be reached.
    #[error("cache backend unavailable")]
    Unavailable,
    /// The backend reported a failure.
    #[error("cache backend failure: {message}")]
    Backend {
        /// A description of the failure.
        message: String,
    },
}

/// A key/value cache with per-entry time-to-live.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the stored value, or `None` on a miss or expired entry.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes a single key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every key starting with `prefix` and returns how many were removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}

/// A structured cache key.
///
/// # Example
///
/// ```
/// use payroll_engine::cache::CacheKey;
///
/// assert_eq!(CacheKey::new("payroll").part(7).to_string(), "payroll:7");
/// assert_eq!(
///     CacheKey::new("overtime").version(2).part(1).part(10).to_string(),
///     "overtime:v2:1:10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: String,
    version: Option<String>,
    parts: Vec<String>,
}

impl CacheKey {
    /// Starts a key for an entity kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            version: None,
            parts: Vec::new(),
        }
    }

    /// Embeds a version token right after the kind.
    pub fn version(mut self, version: impl fmt::Display) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Appends a discriminating part.
    pub fn part(mut self, part: impl fmt::Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Appends an optional part, rendered as `null` when absent.
    pub fn optional_part<T: fmt::Display>(self, part: Option<T>) -> Self {
        match part {
            Some(value) => self.part(value),
            None => self.part("null"),
        }
    }

    /// The entity kind this key belongs to.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(version) = &self.version {
            write!(f, ":v{}", version)?;
        }
        for part in &self.parts {
            write!(f, ":{}", part)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_without_parts_is_kind() {
        assert_eq!(CacheKey::new("payroll").to_string(), "payroll");
    }

    #[test]
    fn test_key_renders_parts_in_order() {
        let key = CacheKey::new("reimbursement").part(4).part(2).part(10);
        assert_eq!(key.to_string(), "reimbursement:4:2:10");
        assert_eq!(key.kind(), "reimbursement");
    }

    #[test]
    fn test_optional_part_renders_null() {
        let key = CacheKey::new("payroll").optional_part(None::<u64>).optional_part(Some(3));
        assert_eq!(key.to_string(), "payroll:null:3");
    }

    #[test]
    fn test_versioned_keys_differ_per_version() {
        let v1 = CacheKey::new("overtime").version(1).part(1).part(10);
        let v2 = CacheKey::new("overtime").version(2).part(1).part(10);
        assert_ne!(v1.to_string(), v2.to_string());
    }

    #[test]
    fn test_cache_error_display() {
        assert_eq!(CacheError::Unavailable.to_string(), "cache backend unavailable");
        let error = CacheError::Backend {
            message: "READONLY".to_string(),
        };
        assert_eq!(error.to_string(), "cache backend failure: READONLY");
    }
}
