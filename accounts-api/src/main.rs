//! # Accounts API Server
//!
//! REST backend for user accounts: register, list, update and delete.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/accounts \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p accounts-api
//! ```

use accounts_api::{
    app::{build_router, AppState},
    config::Config,
};
use accounts_shared::db::{migrations, pool};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "accounts_api=debug,accounts_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Accounts API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let db = pool::create_pool(config.pool_config())
        .await
        .context("Failed to connect to database")?;

    migrations::run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let app = build_router(AppState::with_pool(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutdown signal received, closing database pool...");
    pool::close_pool(db).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
