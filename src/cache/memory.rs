//! In-process cache backend with lazy TTL expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Cache, CacheError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// A thread-safe in-memory cache with lazy expiry.
///
/// Availability can be switched off to simulate an unreachable backend; every
/// call then fails with [`CacheError::Unavailable`].
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl InMemoryCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the simulated backend on or off.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of unexpired entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    /// Returns true when no unexpired entry is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Unavailable)
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(600);

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = InMemoryCache::new();
        cache.set("payroll:1", "{}".to_string(), TTL).await.unwrap();

        assert_eq!(cache.get("payroll:1").await.unwrap().as_deref(), Some("{}"));
        assert!(cache.get("payroll:2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_misses() {
        let cache = InMemoryCache::new();
        cache
            .set("payroll:1", "{}".to_string(), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("payroll:1").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_by_prefix_only_removes_matching_keys() {
        let cache = InMemoryCache::new();
        for key in ["overtime:v0:1:10", "overtime:v0:2:10", "overtime:5", "payroll:1"] {
            cache.set(key, "x".to_string(), TTL).await.unwrap();
        }

        let removed = cache.delete_by_prefix("overtime:").await.unwrap();
        assert_eq!(removed, 3);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("payroll:1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_every_call() {
        let cache = InMemoryCache::new();
        cache.set_available(false);

        assert_eq!(cache.get("k").await, Err(CacheError::Unavailable));
        assert_eq!(
            cache.set("k", "v".to_string(), TTL).await,
            Err(CacheError::Unavailable)
        );
        assert_eq!(cache.delete("k").await, Err(CacheError::Unavailable));
        assert_eq!(cache.delete_by_prefix("k").await, Err(CacheError::Unavailable));

        cache.set_available(true);
        assert_eq!(cache.get("k").await, Ok(None));
    }
}
