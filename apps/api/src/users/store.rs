//! User persistence behind a trait so the HTTP layer never touches SQL directly.
//!
//! `AppState` holds an `Arc<dyn UserStore>`; production uses `PgUserStore`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn create(&self, user: NewUser) -> Result<Uuid, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let result = sqlx::query(
            r#"
            INSERT INTO users
                (id, first_name, last_name, email, phone_number, street_address,
                 city, state, zip_code, country, terms_and_conditions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.trim())
        .bind(&user.phone_number)
        .bind(&user.street_address)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.zip_code)
        .bind(&user.country)
        .bind(user.terms_and_conditions)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!("Created user {id}");
                Ok(id)
            }
            // Lost a race with a concurrent registration for the same email.
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(AppError::Validation("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
