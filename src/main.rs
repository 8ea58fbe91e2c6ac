mod auth;
mod config;
mod db;
mod error;
mod extractors;
mod routes;
mod state;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::error::AppResult;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(config.db_path())?;
    db::run_migrations(&pool)?;

    // Build app state
    let state = AppState {
        db: pool,
        config: config.clone(),
    };

    let mut app = routes::router();

    // Test-only reset endpoint: wipes users, posts, and comments
    if std::env::var("INKSTAND_TEST_RESET").is_ok() {
        app = app.route("/test/reset", get(test_reset));
    }

    let app = app.layer(TraceLayer::new_for_http()).with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Test-only: administrative reset of all stored entities.
/// Only mounted when INKSTAND_TEST_RESET env var is set.
async fn test_reset(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;
    db::store::reset_all(&conn)?;
    tracing::warn!("Administrative reset: all users, posts, and comments deleted");
    Ok("Reset complete")
}
