mod config;
mod cv_parser;
mod db;
mod errors;
mod matching;
mod models;
mod repo;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cv_parser::HttpCvExtractor;
use crate::db::create_pool;
use crate::matching::matcher::Matcher;
use crate::repo::pg::{PgCandidateRepository, PgJobRepository};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Wire the matching engine: Postgres repositories + HTTP CV extractor
    let cv_extractor = HttpCvExtractor::new(Duration::from_secs(config.cv_fetch_timeout_secs));
    let matcher = Arc::new(Matcher::new(
        Arc::new(PgJobRepository::new(db.clone())),
        Arc::new(PgCandidateRepository::new(db)),
        Arc::new(cv_extractor),
    ));
    info!(
        "Matcher initialized (CV fetch timeout: {}s)",
        config.cv_fetch_timeout_secs
    );

    let state = AppState { matcher };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
