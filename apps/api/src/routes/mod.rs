pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::history::handlers as history;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/generate", post(generation::handle_generate))
        .route(
            "/api/v1/generate/learning-plan",
            post(generation::handle_learning_plan),
        )
        .route("/api/v1/generate/videos", post(generation::handle_video_feed))
        .route(
            "/api/v1/generate/articles",
            post(generation::handle_article_feed),
        )
        // Users
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/:id", get(users::handle_get_user))
        // History
        .route(
            "/api/v1/prompts/:user_id",
            get(history::handle_get_prompts).post(history::handle_add_prompt),
        )
        .route(
            "/api/v1/outputs/:user_id",
            get(history::handle_get_outputs).post(history::handle_add_output),
        )
        .with_state(state)
}
