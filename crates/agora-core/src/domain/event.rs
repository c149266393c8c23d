//! Field events, poll options and ride sharing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A field event where volunteers gather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub created_by: i64,
    pub title: String,
    pub project_id: Option<i64>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time_range: Option<String>,
    pub is_time_fixed: bool,
    pub is_location_fixed: bool,
    /// Attendee user ids, creator first.
    pub attendees: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the given poll dimension is already decided.
    #[must_use]
    pub const fn is_fixed(&self, kind: PollKind) -> bool {
        match kind {
            PollKind::TimeSlot => self.is_time_fixed,
            PollKind::Location => self.is_location_fixed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub created_by: i64,
    pub title: String,
    pub project_id: Option<i64>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time_range: Option<String>,
    pub is_time_fixed: bool,
    pub is_location_fixed: bool,
}

/// What a poll option proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollKind {
    TimeSlot,
    Location,
}

impl PollKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TimeSlot => "time_slot",
            Self::Location => "location",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "time_slot" => Some(Self::TimeSlot),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

/// A proposed time slot or location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: i64,
    pub event_id: i64,
    pub kind: PollKind,
    pub label: String,
    pub proposed_by: i64,
    /// Proposal order within the event and kind, starting at 0.
    pub position: i64,
}

/// A ride offered to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    pub id: i64,
    pub event_id: i64,
    pub driver_id: i64,
    pub seats: i64,
    pub departure_location: String,
    pub departure_time: Option<String>,
    pub passengers: Vec<i64>,
}

impl Ride {
    #[must_use]
    pub fn seats_left(&self) -> i64 {
        let taken = i64::try_from(self.passengers.len()).unwrap_or(i64::MAX);
        (self.seats - taken).max(0)
    }

    /// Whether `user_id` is the driver or a passenger.
    #[must_use]
    pub fn involves(&self, user_id: i64) -> bool {
        self.driver_id == user_id || self.passengers.contains(&user_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewRide {
    pub event_id: i64,
    pub driver_id: i64,
    pub seats: i64,
    pub departure_location: String,
    pub departure_time: Option<String>,
}
