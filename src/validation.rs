use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// A single violated constraint, reported with the offending field path.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Declarative payload validation. Implementations collect every violated
/// constraint rather than stopping at the first.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn check_email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if !is_valid_email(value) {
        errors.push(FieldError::new(field, "must be a valid email address"));
    }
}

pub fn check_length(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.trim().chars().count();
    if len < min || len > max {
        errors.push(FieldError::new(
            field,
            format!("must be between {min} and {max} characters"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@sub.domain.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn length_check_counts_chars_after_trim() {
        let mut errors = Vec::new();
        check_length(&mut errors, "first_name", "  ", 1, 50);
        check_length(&mut errors, "last_name", &"x".repeat(51), 1, 50);
        check_length(&mut errors, "ok", "Alice", 1, 50);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "first_name");
        assert_eq!(errors[1].field, "last_name");
    }
}
