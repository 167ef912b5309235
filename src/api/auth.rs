// Registration and login

use crate::api::dto::{json_body, CredentialsRequest, MessageResponse, TokenResponse};
use crate::api::routes::AppState;
use crate::auth::password;
use crate::errors::{AppError, Result};
use crate::observability::MetricsRecorder;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

fn invalid_input() -> AppError {
    AppError::ValidationError("invalid input".to_string())
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let req = json_body(payload)?;
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(invalid_input());
    }

    let password_hash = password::hash_password(&req.password, state.auth.password_min_length)?;
    state.users.create(email, &password_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "registration successful".to_string(),
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let req = json_body(payload)?;

    // Unknown account and wrong password are indistinguishable to the caller
    let Some(user) = state.users.find_by_email(req.email.trim()).await? else {
        tracing::debug!("Login for unknown email");
        MetricsRecorder::record_login("failure");
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Invalid password");
        MetricsRecorder::record_login("failure");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.token_codec.issue(&user.id.to_string())?;
    MetricsRecorder::record_login("success");
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse { token }))
}
