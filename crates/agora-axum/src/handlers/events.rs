//! Event handlers - attendance, time-slot/location polls and ride sharing.

use agora_core::services::RideView;
use agora_core::{Event, PollOption};
use axum::Json;
use axum::extract::{Path, Query, State};

use crate::auth::AuthUser;
use crate::dto::{
    BestOptionResponse, CreateEventRequest, EventResponse, OfferRideRequest, PollKindQuery,
    ProposeOptionRequest, SUCCESS, VoteRequest, VoteResponse,
};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<EventResponse>, HttpError> {
    let event = state.core.events().create(&auth.user, req.into()).await?;
    Ok(Json(event.into()))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>, HttpError> {
    Ok(Json(state.core.events().list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, HttpError> {
    Ok(Json(state.core.events().get(id).await?))
}

pub async fn attend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Event>, HttpError> {
    Ok(Json(state.core.events().attend(&auth.user, id).await?))
}

/// Options proposed so far for one poll, in proposal order.
pub async fn options(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<PollKindQuery>,
) -> Result<Json<Vec<PollOption>>, HttpError> {
    let kind = query.kind()?;
    Ok(Json(state.core.events().options(id, kind).await?))
}

/// Propose a time slot or location. Proposing an existing label returns it.
pub async fn propose_option(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ProposeOptionRequest>,
) -> Result<Json<PollOption>, HttpError> {
    let kind = req.kind()?;
    let option = state
        .core
        .events()
        .propose_option(&auth.user, id, kind, &req.label)
        .await?;
    Ok(Json(option))
}

/// Replace the caller's votes for one poll.
pub async fn vote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, HttpError> {
    let kind = req.kind()?;
    let option_ids = state
        .core
        .events()
        .vote(&auth.user, id, kind, &req.option_ids)
        .await?;
    Ok(Json(VoteResponse {
        message: SUCCESS,
        option_ids,
    }))
}

pub async fn best(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<PollKindQuery>,
) -> Result<Json<BestOptionResponse>, HttpError> {
    let kind = query.kind()?;
    let best = state.core.events().best(id, kind).await?;
    Ok(Json(BestOptionResponse { kind, best }))
}

pub async fn list_rides(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<RideView>>, HttpError> {
    Ok(Json(state.core.events().list_rides(id).await?))
}

pub async fn offer_ride(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<OfferRideRequest>,
) -> Result<Json<RideView>, HttpError> {
    let ride = state
        .core
        .events()
        .offer_ride(&auth.user, id, req.into())
        .await?;
    Ok(Json(ride))
}

pub async fn join_ride(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, ride_id)): Path<(i64, i64)>,
) -> Result<Json<RideView>, HttpError> {
    Ok(Json(
        state.core.events().join_ride(&auth.user, id, ride_id).await?,
    ))
}

pub async fn leave_ride(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, ride_id)): Path<(i64, i64)>,
) -> Result<Json<RideView>, HttpError> {
    Ok(Json(
        state.core.events().leave_ride(&auth.user, id, ride_id).await?,
    ))
}
