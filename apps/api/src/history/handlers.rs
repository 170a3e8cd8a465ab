use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddPromptRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct AddOutputRequest {
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PromptHistoryResponse {
    pub id: Uuid,
    pub prompts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OutputHistoryResponse {
    pub id: Uuid,
    pub outputs: Vec<String>,
}

/// POST /api/v1/prompts/:user_id
pub async fn handle_add_prompt(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AddPromptRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    state.history.append_prompt(user_id, &request.prompt).await?;
    Ok(Json(MessageResponse { msg: "Prompt added" }))
}

/// GET /api/v1/prompts/:user_id
pub async fn handle_get_prompts(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PromptHistoryResponse>, AppError> {
    let prompts = state.history.prompts(user_id).await?;
    Ok(Json(PromptHistoryResponse {
        id: user_id,
        prompts,
    }))
}

/// POST /api/v1/outputs/:user_id
pub async fn handle_add_output(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AddOutputRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if request.output.trim().is_empty() {
        return Err(AppError::Validation("output cannot be empty".to_string()));
    }
    state.history.append_output(user_id, &request.output).await?;
    Ok(Json(MessageResponse { msg: "Output added" }))
}

/// GET /api/v1/outputs/:user_id
pub async fn handle_get_outputs(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<OutputHistoryResponse>, AppError> {
    let outputs = state.history.outputs(user_id).await?;
    Ok(Json(OutputHistoryResponse {
        id: user_id,
        outputs,
    }))
}
