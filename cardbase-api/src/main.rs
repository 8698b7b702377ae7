//! # Cardbase API Server
//!
//! HTTP backend for cardbase: authenticated users own projects, and within
//! a project own cards (atomic notes) and documents (generated reports).
//!
//! ## Architecture
//!
//! - Owner-scoped CRUD for projects, cards, and documents
//! - GitHub OAuth login issuing JWT access tokens
//! - AI-assisted tag suggestion, card clustering, and report generation
//!   delegated to an external service
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p cardbase-api
//! ```

use std::sync::Arc;

use cardbase_ai::HttpAiBackend;
use cardbase_api::{
    app::{build_router, AppState},
    config::Config,
};
use cardbase_shared::db::{migrations::run_migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardbase_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Cardbase API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let ai = Arc::new(HttpAiBackend::new(
        config.ai.base_url.clone(),
        config.ai.timeout_secs,
    ));

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, ai);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
