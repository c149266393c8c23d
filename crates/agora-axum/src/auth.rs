//! Bearer session authentication.
//!
//! Protected handlers take an [`AuthUser`] argument. The extractor reads
//! `Authorization: Bearer {token}`, resolves the session through the account
//! service and rejects with 401 plus `WWW-Authenticate: Bearer` otherwise.

use agora_core::{CoreError, User};
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::HttpError;
use crate::state::AppState;

/// The user behind a valid session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// The raw session token, needed for logout.
    pub token: String,
}

/// Extract the token from an `Authorization` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        let Some(token) = token else {
            tracing::warn!(
                path = %parts.uri.path(),
                "Unauthorized API request - missing bearer token"
            );
            return Err(HttpError::Unauthorized("missing_token".to_string()));
        };

        match state.core.accounts().authenticate(token).await {
            Ok(user) => Ok(Self {
                user,
                token: token.to_string(),
            }),
            Err(CoreError::Unauthorized(msg)) => {
                tracing::warn!(
                    path = %parts.uri.path(),
                    "Unauthorized API request - invalid or expired session"
                );
                Err(HttpError::Unauthorized(msg))
            }
            Err(e) => Err(e.into()),
        }
    }
}
