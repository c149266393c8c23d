//! Data Transfer Objects (DTOs) for HTTP API contract.
//!
//! These types define the stable HTTP API contract with explicit serialization
//! control. They decouple internal domain types from external API representation:
//! money leaves the core in cents and reaches clients in dollars, and request
//! enums arrive as strings so a bad value is a 400 with a readable message.

pub mod accounts;
pub mod assistant;
pub mod bounties;
pub mod events;
pub mod payouts;
pub mod projects;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::HttpError;

pub use accounts::{LoginRequest, RegisterRequest, SessionResponse, UserProfileDto, UsernameQuery};
pub use assistant::{AskRequest, AskResponse};
pub use bounties::{
    BountyDetailsQuery, BountyDetailsResponse, BountyDto, CreateBountyRequest,
    CreatedBountyResponse, IdentifyRequest, IdentifyResponse, LeaderboardEntryDto,
    LeaderboardQuery, SearchBountiesQuery, SubmitBountyRequest, SubmittedResponse,
    UserBountiesResponse, VerifyRequest, VerifyResponse,
};
pub use events::{
    BestOptionResponse, CreateEventRequest, EventResponse, OfferRideRequest, PollKindQuery,
    ProposeOptionRequest, VoteRequest, VoteResponse,
};
pub use payouts::{
    CardResponse, CashoutRequest, CashoutResponse, HistoryQuery, WithdrawalDto,
    WithdrawalHistoryResponse, WithdrawalRequest, WithdrawalResponse,
};
pub use projects::{
    AddLocationRequest, CreateProjectRequest, ListProjectsQuery, NearbyParams, PostMessageRequest,
    UpdateProjectRequest, UploadPictureRequest, UploadPictureResponse, VisualizationQuery,
};

/// Value of `message` on successful mutations.
pub const SUCCESS: &str = "success";

/// Body for endpoints that only report success.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn success() -> Self {
        Self { message: SUCCESS }
    }
}

/// Convert a dollar amount from a request into cents.
pub(crate) fn amount_to_cents(field: &str, dollars: f64) -> Result<i64, HttpError> {
    agora_core::dollars_to_cents(dollars)
        .ok_or_else(|| HttpError::BadRequest(format!("{field} must be a non-negative amount")))
}

/// Parse an optional enum field, falling back to its default when absent.
pub(crate) fn parse_or_default<T: Default>(
    field: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, HttpError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(T::default()),
        Some(raw) => {
            parse(raw).ok_or_else(|| HttpError::BadRequest(format!("invalid {field}: {raw}")))
        }
    }
}

/// Ids that browsers send either as numbers or as route-param strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Int(i64),
    Text(String),
}

pub(crate) fn loose_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match LooseId::deserialize(deserializer)? {
        LooseId::Int(id) => Ok(id),
        LooseId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {text}"))),
    }
}
