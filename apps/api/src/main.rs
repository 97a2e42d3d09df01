mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod roadmap;
mod routes;
mod state;
mod store;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::CompletionClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgSubmissionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration and check the Groq credential once, before any
    // request is served.
    let config = Config::from_env()?;
    config.validate()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Learning Roadmap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the insert-only submissions table
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the completion client
    let llm = CompletionClient::new(config.groq_api_url.clone(), config.groq_api_key.clone());
    info!("Completion client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        llm,
        store: Arc::new(PgSubmissionStore::new(db)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Browser requests are limited to the configured origins. Requests without
/// an Origin header (curl, server-to-server) are not subject to CORS.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
