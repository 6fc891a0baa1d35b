//! Account endpoints that work without an authenticated session.

use axum::{Json, extract::State, http::StatusCode};

use api_types::user::{PasswordReset, PasswordResetRequest, RegisterUser, UserCreated};

use crate::{ServerError, server::ServerState};
use engine::NewUser;

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let id = state
        .engine
        .register_user(NewUser {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserCreated { id })))
}

/// Always answers 202, whether or not the email maps to an account.
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<StatusCode, ServerError> {
    match state.engine.start_password_reset(&payload.email).await {
        Ok(Some(token)) => {
            // Stands in for mail delivery.
            tracing::info!("password reset token for {}: {token}", payload.email);
        }
        Ok(None) => {
            tracing::debug!("password reset requested for unknown email");
        }
        Err(err) => {
            tracing::error!("password reset request failed: {err}");
        }
    }
    Ok(StatusCode::ACCEPTED)
}

pub async fn reset_password(
    State(state): State<ServerState>,
    Json(payload): Json<PasswordReset>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .reset_password(&payload.token, &payload.password)
        .await?;
    Ok(StatusCode::OK)
}
