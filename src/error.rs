use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{response::ApiResponse, validation::FieldError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        AppError::Validation(errors)
    }
}

// Fails closed: detail is only exposed when APP_ENV is explicitly
// "development".
fn detail_visible() -> bool {
    std::env::var("APP_ENV")
        .map(|env| env == "development")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, error, data) = match &self {
            AppError::Validation(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::BAD_REQUEST,
                    self.to_string(),
                    Some(joined),
                    serde_json::to_value(errors).ok(),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None, None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string(), None, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None, None),
            AppError::DbError(err) => db_error_parts(err),
            AppError::OrmError(err) => orm_error_parts(err),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
                detail_visible().then(|| err.to_string()),
                None,
            ),
        };

        let body: ApiResponse<serde_json::Value> = ApiResponse::failure(message, error, data);
        (status, axum::Json(body)).into_response()
    }
}

fn db_error_parts(
    err: &sqlx::Error,
) -> (StatusCode, String, Option<String>, Option<serde_json::Value>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            None,
            None,
        ),
        sqlx::Error::Database(db) if db.is_unique_violation() => (
            StatusCode::CONFLICT,
            "A record with this value already exists".to_string(),
            None,
            None,
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
            detail_visible().then(|| err.to_string()),
            None,
        ),
    }
}

fn orm_error_parts(
    err: &sea_orm::DbErr,
) -> (StatusCode, String, Option<String>, Option<serde_json::Value>) {
    if let sea_orm::DbErr::RecordNotFound(_) = err {
        return (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            None,
            None,
        );
    }
    if let Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return (
            StatusCode::CONFLICT,
            "A record with this value already exists".to_string(),
            None,
            None,
        );
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".to_string(),
        detail_visible().then(|| err.to_string()),
        None,
    )
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::Validation(vec![FieldError::new("email", "must be valid")]);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let resp = AppError::Unauthorized("Access token required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("Customer not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let resp = AppError::Conflict("Email already exists".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    async fn body_value(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // Both directions of the gate in one test: the APP_ENV mutation must
    // not race with a second reader.
    #[tokio::test]
    async fn internal_detail_follows_environment() {
        unsafe { std::env::set_var("APP_ENV", "development") };
        let resp = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let value = body_value(resp).await;
        assert_eq!(value["error"], "boom");

        unsafe { std::env::set_var("APP_ENV", "production") };
        let resp = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        let value = body_value(resp).await;
        assert!(value.get("error").is_none());
        assert_eq!(value["message"], "Internal Server Error");

        // Unset must behave like production, not development.
        unsafe { std::env::remove_var("APP_ENV") };
        let resp = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        let value = body_value(resp).await;
        assert!(value.get("error").is_none());
    }
}
