//! Bounty handlers - creation, search, submissions, verification and the leaderboard.

use agora_core::BountyFilter;
use agora_core::services::{CreateBounty, SubmitBounty};
use axum::Json;
use axum::extract::{Query, State};

use crate::auth::AuthUser;
use crate::dto::{
    BountyDetailsQuery, BountyDetailsResponse, BountyDto, CreateBountyRequest,
    CreatedBountyResponse, IdentifyRequest, IdentifyResponse, LeaderboardEntryDto,
    LeaderboardQuery, SUCCESS, SearchBountiesQuery, SubmitBountyRequest, SubmittedResponse,
    UserBountiesResponse, UsernameQuery, VerifyRequest, VerifyResponse,
};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBountyRequest>,
) -> Result<Json<CreatedBountyResponse>, HttpError> {
    let input = CreateBounty::try_from(req)?;
    let bounty = state.core.bounties().create(&auth.user, input).await?;
    Ok(Json(CreatedBountyResponse::new(bounty.id)))
}

/// Open bounties, newest first.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchBountiesQuery>,
) -> Result<Json<Vec<BountyDto>>, HttpError> {
    let filter = BountyFilter::try_from(query)?;
    let bounties = state.core.bounties().search(&filter).await?;
    Ok(Json(bounties.into_iter().map(Into::into).collect()))
}

pub async fn details(
    State(state): State<AppState>,
    Query(query): Query<BountyDetailsQuery>,
) -> Result<Json<BountyDetailsResponse>, HttpError> {
    let details = state.core.bounties().details(query.bounty_id).await?;
    Ok(Json(BountyDetailsResponse {
        message: SUCCESS,
        bounty: details.bounty.into(),
        submissions: details.submissions,
    }))
}

pub async fn user_bounties(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<UserBountiesResponse>, HttpError> {
    let bounties = state.core.bounties().user_bounties(&query.username).await?;
    Ok(Json(bounties.into()))
}

/// Preview identification of a photo without storing it.
pub async fn identify(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<IdentifyRequest>,
) -> Result<Json<IdentifyResponse>, HttpError> {
    let result = state.core.bounties().identify(&req.image_base64).await?;
    Ok(Json(IdentifyResponse { result }))
}

pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubmitBountyRequest>,
) -> Result<Json<SubmittedResponse>, HttpError> {
    let input = SubmitBounty::try_from(req)?;
    let submission = state.core.bounties().submit(&auth.user, input).await?;
    Ok(Json(submission.into()))
}

/// Approve or reject a submission. Only the bounty creator may verify.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, HttpError> {
    let modified_count = state
        .core
        .bounties()
        .verify(&auth.user, req.submission_id, req.is_approved)
        .await?;
    Ok(Json(VerifyResponse {
        message: SUCCESS,
        modified_count,
    }))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntryDto>>, HttpError> {
    let entries = state.core.leaderboard().top(query.limit).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
