use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commentlens_common::Config;
use commentlens_store::CommentsStore;

mod rest;

pub struct AppState {
    pub store: CommentsStore,
    pub apify_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("commentlens=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let store = CommentsStore::connect(&config.database_url).await?;

    let state = Arc::new(AppState {
        store,
        apify_token: config.apify_token,
        openai_api_key: config.openai_api_key,
        openai_model: config.openai_model,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Dashboard API
        .route("/api/comments", get(rest::api_comments))
        .route("/api/pipeline/run", post(rest::api_run_pipeline))
        .with_state(state)
        // CORS: the dashboard runs in the browser on another origin
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(addr = %addr, "commentlens API listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
