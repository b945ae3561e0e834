use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use apify_client::ApifyClient;
use commentlens_pipeline::{OpenAiAnalyzer, PipelineRunner};

use crate::AppState;

const DEFAULT_MAX_ITEMS: u32 = 10;

#[derive(Deserialize)]
pub struct RunRequest {
    #[serde(rename = "postUrl")]
    post_url: String,
    #[serde(rename = "maxItems")]
    max_items: Option<u32>,
}

/// The presentation layer bounds maxItems to [1, 100]; the runner itself only
/// rejects zero.
fn effective_max_items(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_MAX_ITEMS).clamp(1, 100)
}

/// GET /api/comments — all comments, newest first.
pub async fn api_comments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_all().await {
        Ok(comments) => Json(serde_json::json!({ "comments": comments })).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load comments");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /api/pipeline/run — trigger one scrape-analyze-persist invocation.
pub async fn api_run_pipeline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> impl IntoResponse {
    let max_items = effective_max_items(req.max_items);

    let scraper = ApifyClient::new(state.apify_token.clone());
    let analyzer = OpenAiAnalyzer::new(&state.openai_api_key, &state.openai_model);
    let runner = PipelineRunner::new(scraper, analyzer, state.store.clone());

    match runner.run(&req.post_url, max_items).await {
        Ok(outcome) => Json(serde_json::json!({
            "success": true,
            "processedCount": outcome.processed_count,
            "totalFetched": outcome.total_fetched,
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, post_url = %req.post_url, "Pipeline run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "type": "scraping_failed",
                    "message": "Instagram comment scraping failed. No analysis performed.",
                })),
            )
                .into_response()
        }
    }
}
