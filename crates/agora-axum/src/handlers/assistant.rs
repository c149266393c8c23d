//! Botany assistant handler.

use axum::Json;
use axum::extract::State;

use crate::auth::AuthUser;
use crate::dto::{AskRequest, AskResponse, SUCCESS};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn ask(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, HttpError> {
    let response = state
        .core
        .assistant()
        .ask(&req.prompt, req.system_message)
        .await?;
    Ok(Json(AskResponse {
        message: SUCCESS,
        response,
    }))
}
