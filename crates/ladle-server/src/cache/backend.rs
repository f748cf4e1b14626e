//! Cache backend with local (DashMap) and Redis modes.

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Error raised when the cache backend itself fails.
///
/// Key absence is not an error (`get` returns `Ok(None)`); this covers
/// connectivity and command failures only. Callers degrade to the source
/// of truth rather than surfacing it to clients.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache unavailable: {message}")]
    Unavailable { message: String },
}

impl CacheError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// A locally cached entry, optionally expiring.
///
/// The data is wrapped in `Arc` to allow cheap cloning on cache hits.
/// `expires_at = None` means the entry persists until explicitly
/// invalidated - the mode the recipe snapshot uses.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub expires_at: Option<Instant>,
}

impl CachedEntry {
    /// Create a new cached entry. `ttl = None` never expires.
    pub fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data: Arc::new(data),
            expires_at: ttl.map(|t| Instant::now() + t),
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }
}

/// Cache backend: local DashMap or shared Redis.
///
/// ## Cache Modes
///
/// - **Local**: single-instance mode using only DashMap
/// - **Redis**: multi-instance mode; one logical cache shared by every
///   replica, so an invalidation on one instance is visible to all
#[derive(Clone)]
pub enum CacheBackend {
    /// Single-instance: local DashMap only
    Local(Arc<DashMap<String, CachedEntry>>),

    /// Multi-instance: shared Redis
    Redis { pool: Pool },
}

impl CacheBackend {
    /// Create a new local-only cache backend.
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    /// Create a new Redis-backed cache backend.
    pub fn new_redis(pool: Pool) -> Self {
        CacheBackend::Redis { pool }
    }

    /// Get a value from the cache.
    ///
    /// `Ok(None)` means the key is absent; `Err` means the backend itself
    /// failed. The two are distinct so callers can tell a miss from an
    /// outage.
    ///
    /// Returns `Arc<Vec<u8>>` for zero-copy access to cached data.
    pub async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError> {
        match self {
            CacheBackend::Local(map) => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        return Ok(Some(Arc::clone(&entry.data)));
                    }
                    drop(entry);
                    map.remove(key);
                }
                Ok(None)
            }
            CacheBackend::Redis { pool } => {
                let mut conn = pool
                    .get()
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                let data: Option<Vec<u8>> = conn
                    .get(key)
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                Ok(data.map(Arc::new))
            }
        }
    }

    /// Set a value in the cache.
    ///
    /// `ttl = None` stores the value with no expiration, so it persists
    /// until explicitly invalidated. Redis writes are fire-and-forget: a
    /// failed population is logged, never surfaced, because the caller
    /// already holds the authoritative data.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) {
        match self {
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
            }
            CacheBackend::Redis { pool } => {
                let pool = pool.clone();
                let key = key.to_string();
                tokio::spawn(async move {
                    let mut conn = match pool.get().await {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(key = %key, error = %e, "Failed to get Redis connection");
                            return;
                        }
                    };
                    let result = match ttl {
                        Some(ttl) => conn.set_ex::<_, _, ()>(&key, &value, ttl.as_secs()).await,
                        None => conn.set::<_, _, ()>(&key, &value).await,
                    };
                    match result {
                        Ok(()) => tracing::debug!(key = %key, "cache set"),
                        Err(e) => tracing::warn!(key = %key, error = %e, "Redis SET error"),
                    }
                });
            }
        }
    }

    /// Invalidate a cache entry.
    ///
    /// Awaited to completion in both modes: mutation handlers must not
    /// report success until the stale snapshot is gone. Invalidating an
    /// absent key is a no-op. A Redis failure here is logged, not
    /// returned - cache errors never block the authoritative write path.
    pub async fn invalidate(&self, key: &str) {
        match self {
            CacheBackend::Local(map) => {
                map.remove(key);
                tracing::debug!(key = %key, "cache invalidated (local)");
            }
            CacheBackend::Redis { pool } => {
                let mut conn = match pool.get().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Failed to get Redis connection for invalidation");
                        return;
                    }
                };
                match conn.del::<_, ()>(key).await {
                    Ok(()) => tracing::debug!(key = %key, "cache invalidated (redis)"),
                    Err(e) => tracing::warn!(key = %key, error = %e, "Redis DEL error"),
                }
            }
        }
    }

    /// Get cache statistics (entry count is local-mode only).
    pub fn stats(&self) -> CacheStats {
        match self {
            CacheBackend::Local(map) => CacheStats {
                entries: map.len(),
                mode: "local".to_string(),
            },
            CacheBackend::Redis { .. } => CacheStats {
                entries: 0,
                mode: "redis".to_string(),
            },
        }
    }

    /// Check if Redis is available (for health checks).
    pub async fn is_redis_available(&self) -> bool {
        match self {
            CacheBackend::Local(_) => false,
            CacheBackend::Redis { pool } => pool.get().await.is_ok(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub mode: String,
}
