//! Bounty and submission domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use super::identification::PlantIdentification;

/// Lifecycle state of a bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyStatus {
    Open,
    Completed,
    Closed,
}

impl BountyStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "completed" => Some(Self::Completed),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// A paid request for photos of a plant species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub plant_species: String,
    /// Reward per approved submission, in cents.
    pub reward_cents: i64,
    pub num_submissions_needed: i64,
    pub current_submissions: i64,
    pub additional_notes: Option<String>,
    pub status: BountyStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBounty {
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub plant_species: String,
    pub reward_cents: i64,
    pub num_submissions_needed: i64,
    pub additional_notes: Option<String>,
}

/// Search filter for open bounties.
#[derive(Debug, Clone, Default)]
pub struct BountyFilter {
    /// Case-insensitive substring of the plant species.
    pub plant_species: Option<String>,
    pub min_reward_cents: Option<i64>,
}

/// Why the photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    #[default]
    Research,
    Removal,
}

impl SubmissionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Removal => "removal",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "research" => Some(Self::Research),
            "removal" => Some(Self::Removal),
            _ => None,
        }
    }
}

/// Review state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    PendingVerification,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingVerification => "pending_verification",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_verification" => Some(Self::PendingVerification),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A photo submitted against a bounty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub bounty_id: i64,
    pub user_id: i64,
    pub image_base64: String,
    pub submission_type: SubmissionType,
    pub submitter_note: Option<String>,
    pub location: Option<GeoPoint>,
    pub identification: PlantIdentification,
    pub status: SubmissionStatus,
    pub verified_by: Option<i64>,
    pub submitted_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub bounty_id: i64,
    pub user_id: i64,
    pub image_base64: String,
    pub submission_type: SubmissionType,
    pub submitter_note: Option<String>,
    pub location: Option<GeoPoint>,
    pub identification: PlantIdentification,
}

/// One approved submission as seen by the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedRecord {
    pub user_id: i64,
    pub username: String,
    pub reward_cents: i64,
}
