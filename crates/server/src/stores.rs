//! Store directory endpoints. Writes are admin-only; reads are open to any
//! authenticated user.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::store::{StoreCreated, StoreDraft, StoreListQuery, StoreView, StoresResponse};

use crate::{ServerError, server::ServerState};
use engine::users;

fn draft_from_payload(payload: StoreDraft) -> engine::StoreDraft {
    engine::StoreDraft {
        name: payload.name,
        address: payload.address,
        region: payload.region,
        weekday_hours: payload.weekday_hours,
        saturday_hours: payload.saturday_hours,
        sunday_hours: payload.sunday_hours,
        map_link: payload.map_link,
    }
}

fn view_from_model(model: engine::stores::Model) -> Result<StoreView, ServerError> {
    let id = Uuid::parse_str(&model.id)
        .map_err(|_| ServerError::Generic("malformed store id".to_string()))?;
    Ok(StoreView {
        id,
        name: model.name,
        address: model.address,
        region: model.region,
        weekday_hours: model.weekday_hours,
        saturday_hours: model.saturday_hours,
        sunday_hours: model.sunday_hours,
        map_link: model.map_link,
    })
}

pub async fn list(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StoreListQuery>,
) -> Result<Json<StoresResponse>, ServerError> {
    let records = match query.query.as_deref() {
        Some(needle) => state.engine.search_stores(needle).await?,
        None => state.engine.list_stores().await?,
    };

    let stores = records
        .into_iter()
        .map(view_from_model)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(StoresResponse { stores }))
}

pub async fn detail(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
) -> Result<Json<StoreView>, ServerError> {
    let store = state.engine.store(store_id).await?;
    Ok(Json(view_from_model(store)?))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StoreDraft>,
) -> Result<(StatusCode, Json<StoreCreated>), ServerError> {
    let id = state
        .engine
        .create_store(&user, draft_from_payload(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(StoreCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<StoreDraft>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_store(&user, store_id, draft_from_payload(payload))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_store(&user, store_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
