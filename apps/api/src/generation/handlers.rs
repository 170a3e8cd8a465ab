//! Axum route handlers for the Generation API.
//!
//! Each handler runs one pipeline and, when a `user_id` is supplied, records the
//! prompt and output in the background. History failures never reach the caller.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::models::{
    ArticleFeed, GenerationRequest, LearningPlan, ParsedContent, VideoFeed,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// POST /api/v1/generate/learning-plan
pub async fn handle_learning_plan(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<LearningPlan>, AppError> {
    let result = state.orchestrator.learning_plan().run(&body.prompt).await;
    record_history(&state, body.user_id, &body.prompt, result.as_ref().ok());
    Ok(Json(result?))
}

/// POST /api/v1/generate/videos
pub async fn handle_video_feed(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<VideoFeed>, AppError> {
    let result = state.orchestrator.video_feed().run(&body.prompt).await;
    record_history(&state, body.user_id, &body.prompt, result.as_ref().ok());
    Ok(Json(result?))
}

/// POST /api/v1/generate/articles
pub async fn handle_article_feed(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<ArticleFeed>, AppError> {
    let result = state.orchestrator.article_feed().run(&body.prompt).await;
    record_history(&state, body.user_id, &body.prompt, result.as_ref().ok());
    Ok(Json(result?))
}

/// POST /api/v1/generate
///
/// Content type chosen by the request body.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<ParsedContent>, AppError> {
    let result = state.orchestrator.run(&request).await;
    record_history(
        &state,
        request.user_id,
        &request.raw_prompt,
        result.as_ref().ok(),
    );
    Ok(Json(result?))
}

/// Spawns a detached task that appends the prompt (and output, if any) to history.
fn record_history<T: Serialize>(
    state: &AppState,
    user_id: Option<Uuid>,
    prompt: &str,
    output: Option<&T>,
) {
    let Some(user_id) = user_id else {
        return;
    };
    if prompt.trim().is_empty() {
        return;
    }

    let output = output.and_then(|o| match serde_json::to_string(o) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("Failed to serialize output for history of user {user_id}: {e}");
            None
        }
    });
    let history = state.history.clone();
    let prompt = prompt.to_string();

    tokio::spawn(async move {
        if let Err(e) = history.append_prompt(user_id, &prompt).await {
            warn!("Failed to record prompt for user {user_id}: {e}");
        }
        if let Some(output) = output {
            if let Err(e) = history.append_output(user_id, &output).await {
                warn!("Failed to record output for user {user_id}: {e}");
            }
        }
    });
}
