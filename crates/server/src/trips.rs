//! Trip record endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::fleet::FleetResponse;
use api_types::trip::{
    TotalsView, TripCreated, TripDraft, TripListQuery, TripListResponse, TripView,
};

use crate::{ServerError, server::ServerState};
use engine::users;

fn draft_from_payload(payload: TripDraft) -> engine::TripDraft {
    engine::TripDraft {
        date: payload.date,
        vehicle: payload.vehicle,
        stops: payload.stops,
        km: payload.km,
        loaded_pallets: payload.loaded_pallets,
        empty_crates: payload.empty_crates,
        returned_pallets: payload.returned_pallets,
        weekend: payload.weekend,
    }
}

fn view_from_model(model: engine::trips::Model) -> Result<TripView, ServerError> {
    let id = Uuid::parse_str(&model.id)
        .map_err(|_| ServerError::Generic("malformed trip id".to_string()))?;
    Ok(TripView {
        id,
        date: model.date,
        vehicle: model.vehicle,
        stops: model.stops,
        km: model.km,
        loaded_pallets: model.loaded_pallets,
        empty_crates: model.empty_crates,
        returned_pallets: model.returned_pallets,
        weekend: model.weekend,
        month: model.month,
        payout: model.payout,
    })
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<TripListResponse>, ServerError> {
    let (month, records) = state
        .engine
        .list_trips(&user.id, query.month.as_deref())
        .await?;

    let totals = engine::payout::aggregate(records.iter());
    let trips = records
        .into_iter()
        .map(view_from_model)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(TripListResponse {
        month,
        trips,
        totals: TotalsView {
            stops: totals.stops,
            km: totals.km,
            loaded_pallets: totals.loaded_pallets,
            empty_crates: totals.empty_crates,
            returned_pallets: totals.returned_pallets,
            payout: totals.payout,
        },
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TripDraft>,
) -> Result<(StatusCode, Json<TripCreated>), ServerError> {
    let id = state
        .engine
        .create_trip(&user.id, draft_from_payload(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(TripCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<TripDraft>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_trip(&user, trip_id, draft_from_payload(payload))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_trip(&user, trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn fleet(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Json<FleetResponse> {
    Json(FleetResponse {
        vehicles: state.engine.fleet().to_vec(),
    })
}
