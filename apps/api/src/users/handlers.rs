use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub msg: &'static str,
    pub id: Uuid,
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<Json<CreateUserResponse>, AppError> {
    user.validate()?;

    if state.users.find_by_email(&user.email).await?.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let id = state.users.create(user).await?;
    Ok(Json(CreateUserResponse {
        msg: "User created",
        id,
    }))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}
