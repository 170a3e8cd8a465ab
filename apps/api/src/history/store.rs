//! Append-only prompt and output logs, keyed by user.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append_prompt(&self, user_id: Uuid, text: &str) -> Result<(), AppError>;

    async fn append_output(&self, user_id: Uuid, text: &str) -> Result<(), AppError>;

    /// Oldest first. Unknown users have an empty history.
    async fn prompts(&self, user_id: Uuid) -> Result<Vec<String>, AppError>;

    /// Oldest first. Unknown users have an empty history.
    async fn outputs(&self, user_id: Uuid) -> Result<Vec<String>, AppError>;
}

pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append_prompt(&self, user_id: Uuid, text: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_prompts (user_id, prompt) VALUES ($1, $2)")
            .bind(user_id)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn append_output(&self, user_id: Uuid, text: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_outputs (user_id, output) VALUES ($1, $2)")
            .bind(user_id)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn prompts(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let prompts = sqlx::query_scalar::<_, String>(
            "SELECT prompt FROM user_prompts WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(prompts)
    }

    async fn outputs(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let outputs = sqlx::query_scalar::<_, String>(
            "SELECT output FROM user_outputs WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(outputs)
    }
}
