//! Account handlers - registration, login and profiles.

use axum::Json;
use axum::extract::{Query, State};

use crate::auth::AuthUser;
use crate::dto::{
    LoginRequest, MessageResponse, RegisterRequest, SessionResponse, UserProfileDto,
    UsernameQuery,
};
use crate::error::HttpError;
use crate::state::AppState;

/// Register a new user and open a session.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, HttpError> {
    let session = state.core.accounts().register(req.into()).await?;
    Ok(Json(session.into()))
}

/// Check credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, HttpError> {
    let session = state
        .core
        .accounts()
        .login(&req.username, &req.password)
        .await?;
    Ok(Json(session.into()))
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, HttpError> {
    state.core.accounts().logout(&auth.token).await?;
    Ok(Json(MessageResponse::success()))
}

/// Public profile by username.
pub async fn profile(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<UserProfileDto>, HttpError> {
    let user = state.core.accounts().profile(&query.username).await?;
    Ok(Json(user.into()))
}

/// Profile of the session's user.
pub async fn me(auth: AuthUser) -> Json<UserProfileDto> {
    Json(auth.user.into())
}
