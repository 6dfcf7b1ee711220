use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::UserPublic;
use crate::validation::{FieldError, Validate, check_email};

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        if self.password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "must be at least 6 characters",
            ));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPublic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_violation() {
        let payload = LoginRequest {
            email: "nope".into(),
            password: "abc".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].field, "password");
    }

    #[test]
    fn accepts_valid_credentials_payload() {
        let payload = LoginRequest {
            email: "alice@example.com".into(),
            password: "secret1".into(),
        };
        assert!(payload.validate().is_ok());
    }
}
