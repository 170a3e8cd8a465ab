mod config;
mod db;
mod errors;
mod generation;
mod history;
mod llm_client;
mod models;
mod routes;
mod search_client;
mod state;
mod users;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::generation::pipeline::{ContentOrchestrator, Providers};
use crate::history::store::PgHistoryStore;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::search_client::YouTubeClient;
use crate::state::AppState;
use crate::users::store::PgUserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing keys or a malformed timeout
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillPath API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let llm = GeminiClient::new(&config)?;
    info!("Generative client initialized (model: {})", config.model_name);

    let search = YouTubeClient::new(&config)?;
    info!(
        "Video search client initialized ({} results per query)",
        config.video_results
    );

    let providers = Providers {
        llm: Arc::new(llm),
        search: Arc::new(search),
        call_timeout: config.provider_timeout,
        video_results: config.video_results,
    };

    let state = AppState {
        orchestrator: ContentOrchestrator::new(providers),
        users: Arc::new(PgUserStore::new(db.clone())),
        history: Arc::new(PgHistoryStore::new(db)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Any origin when none are configured, otherwise exactly the configured list.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    info!("CORS restricted to {} origin(s)", origins.len());
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
