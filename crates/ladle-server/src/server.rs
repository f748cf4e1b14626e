use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use ladle_db_memory::MemoryStore;
use ladle_storage::DynRecipeStore;

use crate::auth::{self, SessionStore};
use crate::cache::RecipeListCache;
use crate::config::AppConfig;
use crate::{create_cache_backend, handlers, middleware as app_middleware};

/// Process-wide handles, passed explicitly to every handler.
///
/// The store and the cache index are the two collaborators of the
/// cache-aside protocol; both are shared across all in-flight requests
/// and safe for concurrent use.
#[derive(Clone)]
pub struct AppState {
    pub store: DynRecipeStore,
    pub recipes: Arc<RecipeListCache>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

pub struct LadleServer {
    addr: SocketAddr,
    app: Router,
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store: DynRecipeStore = Arc::new(MemoryStore::new());
    build_app_with_store(cfg, store).await
}

/// Build the router over an externally constructed store (test seam).
pub async fn build_app_with_store(
    cfg: &AppConfig,
    store: DynRecipeStore,
) -> anyhow::Result<Router> {
    let backend = create_cache_backend(&cfg.redis).await;
    let state = AppState {
        store,
        recipes: Arc::new(RecipeListCache::new(backend)),
        sessions: Arc::new(SessionStore::new(Duration::from_secs(
            cfg.auth.session_ttl_secs,
        ))),
        config: Arc::new(cfg.clone()),
    };

    let app = Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/metrics", get(handlers::metrics_text))
        // Session endpoints
        .route("/signin", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        // Recipe CRUD and search
        .route(
            "/recipes",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route("/recipes/search", get(handlers::search_recipes))
        .route(
            "/recipes/{id}",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        // Middleware stack (order: request id -> metrics -> auth gate -> cors/compression/trace -> body limit)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_gate,
        ))
        .layer(middleware::from_fn(app_middleware::track_metrics))
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(
            cfg.server.body_limit_bytes,
        ))
        .with_state(state);

    Ok(app)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<LadleServer> {
        let app = build_app(&self.config).await?;

        Ok(LadleServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LadleServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
