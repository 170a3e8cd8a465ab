use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::generation::error::GenerationError;

/// Which external service a provider failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Generative,
    VideoSearch,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Generative => f.write_str("generative"),
            Provider::VideoSearch => f.write_str("video search"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Timeout,
    Auth,
    RateLimit,
    Transport,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Timeout => f.write_str("timeout"),
            ProviderErrorKind::Auth => f.write_str("auth"),
            ProviderErrorKind::RateLimit => f.write_str("rate_limit"),
            ProviderErrorKind::Transport => f.write_str("transport"),
        }
    }
}

/// A transport-level failure talking to the generative or the video-search provider.
///
/// Content-shape problems are never reported through this type.
#[derive(Debug, Clone, Error)]
#[error("{provider} provider error ({kind}): {message}")]
pub struct ProviderError {
    pub provider: Provider,
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: Provider, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }

    /// Maps a non-success HTTP status onto the provider failure taxonomy.
    pub fn from_status(provider: Provider, status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ProviderErrorKind::Auth,
            429 => ProviderErrorKind::RateLimit,
            _ => ProviderErrorKind::Transport,
        };
        Self::new(provider, kind, format!("status {status}: {body}"))
    }

    /// The request URL is dropped from the message: it can carry query credentials
    /// and the message is rendered to HTTP callers.
    pub fn from_reqwest(provider: Provider, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else {
            ProviderErrorKind::Transport
        };
        Self::new(provider, kind, err.without_url().to_string())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Generation(e) => return generation_response(e),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn generation_response(err: &GenerationError) -> Response {
    let status = match err {
        GenerationError::Input(_) => StatusCode::BAD_REQUEST,
        GenerationError::Provider(e) => match e.kind {
            ProviderErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ProviderErrorKind::RateLimit => StatusCode::SERVICE_UNAVAILABLE,
            ProviderErrorKind::Auth | ProviderErrorKind::Transport => StatusCode::BAD_GATEWAY,
        },
        GenerationError::Extraction { .. }
        | GenerationError::Validation { .. }
        | GenerationError::Integrity(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
        tracing::error!(kind = err.kind(), "Generation failed: {err}");
    }

    let mut error = json!({
        "code": err.code(),
        "message": err.to_string(),
    });
    if let GenerationError::Validation { path, .. } = err {
        error["path"] = json!(path);
    }
    if let GenerationError::Provider(e) = err {
        error["provider"] = json!(e.provider);
        error["reason"] = json!(e.kind);
    }

    (status, Json(json!({ "error": error }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ProviderError::from_status(Provider::Generative, 401, "").kind,
            ProviderErrorKind::Auth
        );
        assert_eq!(
            ProviderError::from_status(Provider::VideoSearch, 403, "quota").kind,
            ProviderErrorKind::Auth
        );
        assert_eq!(
            ProviderError::from_status(Provider::Generative, 429, "").kind,
            ProviderErrorKind::RateLimit
        );
        assert_eq!(
            ProviderError::from_status(Provider::Generative, 500, "").kind,
            ProviderErrorKind::Transport
        );
    }

    #[test]
    fn test_input_error_maps_to_bad_request() {
        let err = GenerationError::Input("prompt is required".into());
        let response = AppError::Generation(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_timeout_maps_to_gateway_timeout() {
        let err = ProviderError::new(Provider::Generative, ProviderErrorKind::Timeout, "30s");
        let response = AppError::Generation(err.into()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_rate_limit_maps_to_service_unavailable() {
        let err = ProviderError::new(Provider::VideoSearch, ProviderErrorKind::RateLimit, "");
        let response = AppError::Generation(err.into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_schema_failures_map_to_bad_gateway() {
        let response = AppError::Generation(GenerationError::Validation {
            path: "milestones".into(),
            reason: "expected 5 entries, found 4".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response =
            AppError::Generation(GenerationError::Integrity("reordered".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("User not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
