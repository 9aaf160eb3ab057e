use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};
use zxcvbn::Score;

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8), custom(function = "validate_password_strength"))]
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Reject passwords that zxcvbn scores below 3 ("safely unguessable").
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if zxcvbn::zxcvbn(password, &[]).score() < Score::Three {
        let mut error = ValidationError::new("password_strength");
        error.message = Some("Password is too easy to guess".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_passwords_are_rejected() {
        assert!(validate_password_strength("password123").is_err());
        assert!(validate_password_strength("aaaaaaaa").is_err());
    }

    #[test]
    fn strong_passwords_pass() {
        assert!(validate_password_strength("corridor-Lantern-91!").is_ok());
    }

    #[test]
    fn signup_request_validates_shape() {
        let request = SignupRequest {
            full_name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
