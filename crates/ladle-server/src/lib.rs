pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod server;

pub use auth::{Session, SessionStore};
pub use cache::{CacheBackend, CacheError, CachedEntry, RecipeListCache, RECIPE_LIST_KEY};
pub use config::{AppConfig, AuthConfig, RedisConfig, ServerConfig};
pub use error::ApiError;
pub use metrics::{init_metrics, render_metrics};
pub use observability::{apply_logging_level, init_tracing};
pub use server::{build_app, build_app_with_store, AppState, LadleServer, ServerBuilder};

/// Create a cache backend based on configuration.
///
/// ## Cache Modes
///
/// - **Redis disabled**: Returns local-only cache (DashMap)
/// - **Redis enabled**: Attempts to connect to Redis, falls back to local on failure
///
/// ## Graceful Degradation
///
/// If Redis connection fails, the system automatically falls back to local-only mode.
/// This allows the server to start and run even if Redis is unavailable.
pub async fn create_cache_backend(config: &RedisConfig) -> CacheBackend {
    use std::time::Duration;

    if !config.enabled {
        tracing::info!("Redis disabled, using local cache only");
        return CacheBackend::new_local();
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    // Create Redis pool configuration
    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    redis_config.pool = Some(deadpool_redis::PoolConfig {
        max_size: config.pool_size,
        timeouts: deadpool_redis::Timeouts {
            wait: Some(Duration::from_millis(config.timeout_ms)),
            create: Some(Duration::from_millis(config.timeout_ms)),
            recycle: Some(Duration::from_millis(config.timeout_ms)),
        },
        ..Default::default()
    });

    // Create pool
    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to create Redis pool. Falling back to local cache."
            );
            return CacheBackend::new_local();
        }
    };

    // Test connection
    match pool.get().await {
        Ok(_) => {
            tracing::info!("Connected to Redis successfully");
            CacheBackend::new_redis(pool)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to connect to Redis. Falling back to local cache."
            );
            CacheBackend::new_local()
        }
    }
}
