use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub terms_and_conditions: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration payload. Credentials are handled outside this service.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub terms_and_conditions: bool,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.first_name.trim().is_empty() {
            return Err(AppError::Validation("first_name cannot be empty".to_string()));
        }
        if !looks_like_email(&self.email) {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if !self.terms_and_conditions {
            return Err(AppError::Validation(
                "terms_and_conditions must be accepted".to_string(),
            ));
        }
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            email: email.to_string(),
            phone_number: "+44 20 7946 0000".to_string(),
            street_address: "12 St James's Square".to_string(),
            city: "London".to_string(),
            state: "London".to_string(),
            zip_code: "SW1Y 4JH".to_string(),
            country: "UK".to_string(),
            terms_and_conditions: true,
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(new_user("ada@example.org").validate().is_ok());
    }

    #[test]
    fn test_bad_emails_are_rejected() {
        for email in ["", "ada", "@example.org", "ada@", "ada@localhost", "ada@.org"] {
            assert!(new_user(email).validate().is_err(), "{email}");
        }
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut user = new_user("ada@example.org");
        user.terms_and_conditions = false;
        assert!(matches!(user.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_last_name_is_optional() {
        let json = r#"{
            "first_name": "Grace",
            "email": "grace@example.org",
            "phone_number": "555-0100",
            "street_address": "1 Navy Way",
            "city": "Arlington",
            "state": "VA",
            "zip_code": "22202",
            "country": "US",
            "terms_and_conditions": true
        }"#;
        let user: NewUser = serde_json::from_str(json).unwrap();
        assert!(user.last_name.is_none());
        assert!(user.validate().is_ok());
    }
}
