//! Cache-aside index over the full recipe listing.
//!
//! ## Cache Key
//!
//! One fixed key, `recipes`, holding a JSON-serialized snapshot of the
//! complete collection, stored with no expiration.
//!
//! ## Protocol
//!
//! Reads consult the cache first and lazily populate it from the store on
//! a miss. Every mutation deletes the key - after the store mutation is
//! confirmed and before the mutation's result is reported - so the next
//! read repopulates from authoritative data. The cache is never patched
//! incrementally; a reader racing a writer sees either the pre- or
//! post-mutation snapshot, never a mix.

use ladle_core::Recipe;
use ladle_storage::{RecipeStore, StorageError};

use super::backend::CacheBackend;
use crate::metrics;

/// The fixed cache key for the recipe list snapshot.
pub const RECIPE_LIST_KEY: &str = "recipes";

/// Cached materialization of the full recipe list.
pub struct RecipeListCache {
    backend: CacheBackend,
}

impl RecipeListCache {
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    /// Return the full recipe list, from cache when possible.
    ///
    /// A miss is either an absent key or a snapshot that deserializes to
    /// an empty collection: under the single-sentinel scheme an empty
    /// snapshot is indistinguishable from "never populated", so it is
    /// always revalidated against the store. A known limitation, kept
    /// deliberately - changing it would alter observable behavior for
    /// empty collections.
    ///
    /// On a cache backend failure the list is served straight from the
    /// store: the cache degrades read latency, never availability. A
    /// population failure after a successful store read is likewise
    /// logged and swallowed.
    pub async fn get_all(&self, store: &dyn RecipeStore) -> Result<Vec<Recipe>, StorageError> {
        match self.backend.get(RECIPE_LIST_KEY).await {
            Ok(Some(data)) => match serde_json::from_slice::<Vec<Recipe>>(&data) {
                Ok(recipes) if !recipes.is_empty() => {
                    tracing::debug!(count = recipes.len(), "recipe list served from cache");
                    metrics::record_cache_hit();
                    return Ok(recipes);
                }
                Ok(_) => {
                    // Empty snapshot: fall through to the store.
                }
                Err(e) => {
                    tracing::warn!(error = %e, "dropping undecodable recipe snapshot");
                    self.backend.invalidate(RECIPE_LIST_KEY).await;
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "cache unavailable, serving recipe list from store");
                metrics::record_cache_degraded();
                return store.find_all().await;
            }
        }

        metrics::record_cache_miss();
        tracing::debug!("recipe list cache miss, querying store");
        let recipes = store.find_all().await?;

        match serde_json::to_vec(&recipes) {
            Ok(data) => self.backend.set(RECIPE_LIST_KEY, data, None).await,
            Err(e) => tracing::warn!(error = %e, "failed to serialize recipe list for cache"),
        }

        Ok(recipes)
    }

    /// Drop the cached snapshot.
    ///
    /// Called exactly once per store mutation, after the mutation is
    /// confirmed and before its result is reported. Idempotent:
    /// invalidating an absent key is a no-op.
    pub async fn invalidate(&self) {
        self.backend.invalidate(RECIPE_LIST_KEY).await;
    }

    /// Backend statistics, for readiness reporting.
    pub fn stats(&self) -> super::backend::CacheStats {
        self.backend.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_db_memory::MemoryStore;
    use ladle_storage::RecipeDraft;
    use std::sync::Arc;
    use std::time::Duration;

    fn local_cache() -> RecipeListCache {
        RecipeListCache::new(CacheBackend::new_local())
    }

    /// A backend pointed at a port nothing listens on; every operation
    /// fails with `CacheError`.
    fn unreachable_redis_cache() -> RecipeListCache {
        let mut cfg = deadpool_redis::Config::from_url("redis://127.0.0.1:1");
        cfg.pool = Some(deadpool_redis::PoolConfig {
            max_size: 1,
            timeouts: deadpool_redis::Timeouts {
                wait: Some(Duration::from_millis(200)),
                create: Some(Duration::from_millis(200)),
                recycle: Some(Duration::from_millis(200)),
            },
            ..Default::default()
        });
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .expect("pool creation is offline");
        RecipeListCache::new(CacheBackend::new_redis(pool))
    }

    async fn seeded_store(titles: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for title in titles {
            store.insert(RecipeDraft::new(*title)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn miss_then_populate_then_hit() {
        let cache = local_cache();
        let store = seeded_store(&["Pizza", "Ramen"]).await;

        // First read misses and populates.
        let first = cache.get_all(&store).await.unwrap();
        assert_eq!(first.len(), 2);

        // Mutate the store WITHOUT invalidating: the second read must be
        // served from the populated snapshot, not the store.
        store.insert(RecipeDraft::new("Tacos")).await.unwrap();
        let second = cache.get_all(&store).await.unwrap();
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn empty_snapshot_is_always_a_miss() {
        let cache = local_cache();
        let store = MemoryStore::new();

        // Empty store: read succeeds and populates an empty snapshot.
        assert!(cache.get_all(&store).await.unwrap().is_empty());

        // A record added behind the cache's back is picked up anyway,
        // because the empty snapshot re-queries the store.
        store.insert(RecipeDraft::new("Pizza")).await.unwrap();
        let listed = cache.get_all(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Pizza");
    }

    #[tokio::test]
    async fn invalidate_after_write_exposes_the_mutation() {
        let cache = local_cache();
        let store = seeded_store(&["Pizza"]).await;

        cache.get_all(&store).await.unwrap();

        let inserted = store.insert(RecipeDraft::new("Ramen")).await.unwrap();
        cache.invalidate().await;

        let listed = cache.get_all(&store).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|r| r.id == inserted.id));
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let cache = local_cache();
        let store = seeded_store(&["Pizza"]).await;

        cache.get_all(&store).await.unwrap();
        cache.invalidate().await;
        cache.invalidate().await;

        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.get_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_is_internally_consistent() {
        let cache = Arc::new(local_cache());
        let store = Arc::new(seeded_store(&["Pizza", "Ramen", "Tacos"]).await);

        // Concurrent readers against a mutating store: every observed
        // snapshot must be one the store actually held, never a mix.
        let mut readers = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let store = Arc::clone(&store);
            readers.push(tokio::spawn(async move {
                for _ in 0..20 {
                    let listed = cache.get_all(store.as_ref()).await.unwrap();
                    assert!(listed.len() == 3 || listed.len() == 4);
                }
            }));
        }

        let writer = {
            let cache = Arc::clone(&cache);
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.insert(RecipeDraft::new("Stew")).await.unwrap();
                cache.invalidate().await;
            })
        };

        for task in readers {
            task.await.unwrap();
        }
        writer.await.unwrap();

        assert_eq!(cache.get_all(store.as_ref()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_dropped_and_reread() {
        let backend = CacheBackend::new_local();
        backend
            .set(RECIPE_LIST_KEY, b"not json at all".to_vec(), None)
            .await;
        let cache = RecipeListCache::new(backend);
        let store = seeded_store(&["Pizza"]).await;

        let listed = cache.get_all(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn cache_outage_degrades_to_the_store() {
        let cache = unreachable_redis_cache();
        let store = seeded_store(&["Pizza", "Ramen"]).await;

        let listed = cache.get_all(&store).await.unwrap();
        assert_eq!(listed.len(), 2);

        // Invalidation against a dead backend must not fail the caller.
        cache.invalidate().await;
    }
}
