//! Read-through access and version-based invalidation.
//!
//! Every key handed out here embeds the current version token of its entity
//! kind. The token is stored in the cache backend itself (`kind:version`),
//! so all engines sharing a backend agree on it, and a restarted engine
//! picks up where the previous one left off. A write replaces the token
//! with a fresh random one; entries written under an older token become
//! unreachable and expire with their TTL. A reader that loaded stale data
//! before a concurrent write therefore populates a key nobody reads again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::PayrollResult;

use super::{Cache, CacheKey};

fn version_key(kind: &str) -> String {
    format!("{kind}:version")
}

fn fresh_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Read-through access and invalidation on top of a [`Cache`].
///
/// Reads try the cache first and fall back to the authoritative loader on a
/// miss, an undecodable entry or any cache error, then populate the cache
/// with the configured TTL. Writes delete one key and replace the version
/// token of the entity kind.
///
/// Cache failures are logged and swallowed; no method here lets a cache error
/// reach the caller. When the token cannot be read a fresh one is used, so an
/// old token is never reused by mistake.
#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CacheInvalidator {
    /// Wraps a cache backend; populated entries live for `ttl`.
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// The TTL applied to populated entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Key of a single entity under the current version, e.g. `payroll:v<token>:7`.
    pub async fn item_key(&self, kind: &str, id: u64) -> CacheKey {
        self.listing_key(kind).await.part(id)
    }

    /// Starts a key carrying the current version of `kind`.
    ///
    /// Callers append their own discriminating parts (user, page, limit).
    pub async fn listing_key(&self, kind: &str) -> CacheKey {
        CacheKey::new(kind).version(self.version(kind).await)
    }

    /// The current version token of `kind`.
    ///
    /// A missing token is created and stored. If the backend fails, a fresh
    /// token is returned without being stored, which makes the read a miss.
    pub async fn version(&self, kind: &str) -> String {
        let key = version_key(kind);
        match self.cache.get(&key).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                let token = fresh_token();
                if let Err(err) = self.cache.set(&key, token.clone(), self.ttl).await {
                    warn!(kind = %kind, error = %err, "Failed to store cache version");
                }
                token
            }
            Err(err) => {
                warn!(kind = %kind, error = %err, "Cache version read failed");
                fresh_token()
            }
        }
    }

    /// Returns the cached value for `key`, or loads, caches and returns it.
    ///
    /// Only errors from `load` are returned.
    pub async fn read_through<T, F, Fut>(&self, key: &CacheKey, load: F) -> PayrollResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = PayrollResult<T>>,
    {
        let rendered = key.to_string();

        match self.cache.get(&rendered).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!(key = %rendered, "cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    warn!(key = %rendered, error = %err, "Discarding undecodable cache entry");
                }
            },
            Ok(None) => debug!(key = %rendered, "cache miss"),
            Err(err) => {
                warn!(key = %rendered, error = %err, "Cache read failed, falling back to store");
            }
        }

        let value = load().await?;
        self.populate(&rendered, &value).await;
        Ok(value)
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to encode value for cache");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, raw, self.ttl).await {
            warn!(key = %key, error = %err, "Cache write failed");
        }
    }

    /// Deletes one key.
    pub async fn invalidate(&self, key: &CacheKey) {
        let rendered = key.to_string();
        match self.cache.delete(&rendered).await {
            Ok(()) => debug!(key = %rendered, "cache key invalidated"),
            Err(err) => warn!(key = %rendered, error = %err, "Cache invalidation failed"),
        }
    }

    /// Retires every entry of `kind` by replacing its version token.
    ///
    /// Returns the new token.
    pub async fn invalidate_kind(&self, kind: &str) -> String {
        let token = fresh_token();
        match self.cache.set(&version_key(kind), token.clone(), self.ttl).await {
            Ok(()) => debug!(kind = %kind, version = %token, "cache kind invalidated"),
            Err(err) => warn!(kind = %kind, error = %err, "Cache version bump failed"),
        }
        token
    }
}
