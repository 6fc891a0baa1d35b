//! User administration endpoints (admin-only).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::user::{SetAdmin, UserView, UsersResponse};

use crate::{ServerError, server::ServerState};
use engine::users;

pub async fn list_users(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<UsersResponse>, ServerError> {
    let users = state
        .engine
        .list_users(&user)
        .await?
        .into_iter()
        .map(|u| UserView {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
        })
        .collect();

    Ok(Json(UsersResponse { users }))
}

pub async fn remove_user(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(&user, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_admin(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SetAdmin>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_admin(&user, &user_id, payload.is_admin)
        .await?;
    Ok(StatusCode::OK)
}
