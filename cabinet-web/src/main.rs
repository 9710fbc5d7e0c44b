//! # File Cabinet Web Server
//!
//! Multi-user document cabinet: accounts, per-user storage namespaces,
//! upload, download, listing, and content search over HTML forms.
//!
//! ## Usage
//!
//! ```bash
//! SESSION_SECRET=$(openssl rand -hex 32) cargo run -p cabinet-web
//! ```

use cabinet_shared::{
    db::{
        migrations::{get_migration_status, run_migrations},
        pool,
    },
    storage::FileStore,
};
use cabinet_web::{
    app::{build_router, AppState},
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the log format is read
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("File Cabinet v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&db).await?;

    let schema = get_migration_status(&db).await?;
    tracing::info!(
        applied = schema.applied_migrations,
        latest = ?schema.latest_version,
        "Database schema ready"
    );

    let files = FileStore::new(&config.storage.upload_dir);
    files.init().await?;

    let addr = config.bind_address();
    let state = AppState::new(db.clone(), files, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Plain output by default, JSON when `LOG_FORMAT=json`
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cabinet_web=debug,cabinet_shared=debug,tower_http=debug".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
