use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    models::User,
    response::ApiResponse,
    security::{issue_token, verify_password},
    state::AppState,
    validation::Validate,
};

/// Authenticate against the seeded users table. Unknown email and wrong
/// password produce the identical error so accounts cannot be enumerated.
pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let LoginRequest { email, password } = payload;

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid credentials".into())),
    };

    if !verify_password(&password, &user.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = issue_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = LoginResponse {
        token,
        user: user.into(),
    };
    Ok(ApiResponse::success("Login successful", resp))
}
