//! Event, poll and ride DTOs.
//!
//! Event creation accepts the frontend's camelCase names (`time`,
//! `timeRange`, `isTimeFixed`, `isLocationFixed`) as aliases.

use agora_core::domain::BestOption;
use agora_core::services::{CreateEvent, OfferRide};
use agora_core::{Event, PollKind};
use serde::{Deserialize, Serialize};

use super::SUCCESS;
use crate::error::HttpError;

fn poll_kind(raw: &str) -> Result<PollKind, HttpError> {
    PollKind::parse(raw.trim())
        .ok_or_else(|| HttpError::BadRequest(format!("invalid poll kind: {raw}")))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub project_id: Option<i64>,
    pub location: Option<String>,
    #[serde(alias = "time")]
    pub date: Option<String>,
    #[serde(alias = "timeRange")]
    pub time_range: Option<String>,
    #[serde(default, alias = "isTimeFixed")]
    pub is_time_fixed: bool,
    #[serde(default, alias = "isLocationFixed")]
    pub is_location_fixed: bool,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            title: req.title,
            project_id: req.project_id,
            location: req.location,
            date: req.date,
            time_range: req.time_range,
            is_time_fixed: req.is_time_fixed,
            is_location_fixed: req.is_location_fixed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub message: &'static str,
    pub event: Event,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            message: SUCCESS,
            event,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProposeOptionRequest {
    pub kind: String,
    #[serde(default)]
    pub label: String,
}

impl ProposeOptionRequest {
    pub fn kind(&self) -> Result<PollKind, HttpError> {
        poll_kind(&self.kind)
    }
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub kind: String,
    #[serde(default)]
    pub option_ids: Vec<i64>,
}

impl VoteRequest {
    pub fn kind(&self) -> Result<PollKind, HttpError> {
        poll_kind(&self.kind)
    }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub message: &'static str,
    pub option_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PollKindQuery {
    pub kind: String,
}

impl PollKindQuery {
    pub fn kind(&self) -> Result<PollKind, HttpError> {
        poll_kind(&self.kind)
    }
}

/// `best` is null while the poll has no options.
#[derive(Debug, Serialize)]
pub struct BestOptionResponse {
    pub kind: PollKind,
    pub best: Option<BestOption>,
}

#[derive(Debug, Deserialize)]
pub struct OfferRideRequest {
    pub seats: i64,
    #[serde(default)]
    pub departure_location: String,
    pub departure_time: Option<String>,
}

impl From<OfferRideRequest> for OfferRide {
    fn from(req: OfferRideRequest) -> Self {
        Self {
            seats: req.seats,
            departure_location: req.departure_location,
            departure_time: req.departure_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_event_accepts_frontend_field_names() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{"username":"ana","location":"Riverside","time":"2026-05-01",
                "timeRange":"9-12","isTimeFixed":true,"isLocationFixed":false}"#,
        )
        .unwrap();
        let input = CreateEvent::from(req);

        assert_eq!(input.date.as_deref(), Some("2026-05-01"));
        assert_eq!(input.time_range.as_deref(), Some("9-12"));
        assert!(input.is_time_fixed);
        assert!(!input.is_location_fixed);
        assert!(input.title.is_none());
    }

    #[test]
    fn unknown_poll_kind_is_bad_request() {
        let query = PollKindQuery {
            kind: "weather".to_string(),
        };
        assert!(matches!(query.kind(), Err(HttpError::BadRequest(_))));
        let query = PollKindQuery {
            kind: "time_slot".to_string(),
        };
        assert_eq!(query.kind().unwrap(), PollKind::TimeSlot);
    }
}
