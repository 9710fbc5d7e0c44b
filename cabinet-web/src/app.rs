/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use cabinet_shared::{db::pool::{create_pool, DatabaseConfig}, storage::FileStore};
/// use cabinet_web::{app::{build_router, AppState}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let files = FileStore::new(&config.storage.upload_dir);
/// let app = build_router(AppState::new(pool, files, config));
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::require_session},
    routes,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use cabinet_shared::storage::FileStore;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Per-user file storage
    pub files: FileStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, files: FileStore, config: Config) -> Self {
        Self {
            db,
            files,
            config: Arc::new(config),
        }
    }

    /// Gets the key used to sign session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET       /                     # Landing page (public)
/// ├── GET|POST  /register             # Account creation (public)
/// ├── GET|POST  /login                # Sign in (public)
/// ├── GET       /logout               # Sign out (public)
/// ├── GET       /health               # Health check (public)
/// └── session required
///     ├── GET       /cabinet              # File listing
///     ├── GET|POST  /upload               # Upload form / multipart upload
///     ├── GET       /download/:filename   # Attachment download
///     └── GET       /search?query=        # Content search
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost last):
/// 1. Session guard (document routes only)
/// 2. Upload body limit (document routes only)
/// 3. Logging (tower-http TraceLayer)
/// 4. Cookie jar (tower-cookies)
/// 5. Security headers
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::auth::index))
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route("/login", get(routes::auth::login_form).post(routes::auth::login))
        .route("/logout", get(routes::auth::logout))
        .route("/health", get(routes::health::health_check));

    let document_routes = Router::new()
        .route("/cabinet", get(routes::documents::cabinet))
        .route(
            "/upload",
            get(routes::documents::upload_form).post(routes::documents::upload),
        )
        .route("/download/:filename", get(routes::documents::download))
        .route("/search", get(routes::search::search))
        .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(document_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CookieManagerLayer::new())
        .layer(SecurityHeadersLayer::new(state.config.server.production))
        .with_state(state)
}
