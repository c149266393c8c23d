//! Bounty, submission and leaderboard DTOs.

use agora_core::services::{CreateBounty, LeaderboardEntry, SubmitBounty, UserBounties};
use agora_core::{
    Bounty, BountyFilter, PlantIdentification, Submission, SubmissionType, cents_to_dollars,
};
use serde::{Deserialize, Serialize};

use super::{SUCCESS, amount_to_cents, loose_id, parse_or_default};
use crate::error::HttpError;

/// Bounty with its reward also expressed in dollars.
#[derive(Debug, Serialize)]
pub struct BountyDto {
    #[serde(flatten)]
    pub bounty: Bounty,
    pub reward: f64,
}

impl From<Bounty> for BountyDto {
    fn from(bounty: Bounty) -> Self {
        Self {
            reward: cents_to_dollars(bounty.reward_cents),
            bounty,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBountyRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub plant_species: String,
    /// Reward per approved submission, in dollars.
    #[serde(default)]
    pub reward: f64,
    #[serde(default = "one")]
    pub num_submissions_needed: i64,
    pub additional_notes: Option<String>,
}

const fn one() -> i64 {
    1
}

impl TryFrom<CreateBountyRequest> for CreateBounty {
    type Error = HttpError;

    fn try_from(req: CreateBountyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            reward_cents: amount_to_cents("reward", req.reward)?,
            title: req.title,
            description: req.description,
            plant_species: req.plant_species,
            num_submissions_needed: req.num_submissions_needed,
            additional_notes: req.additional_notes,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedBountyResponse {
    pub message: &'static str,
    pub bounty_id: i64,
}

impl CreatedBountyResponse {
    pub const fn new(bounty_id: i64) -> Self {
        Self {
            message: SUCCESS,
            bounty_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBountiesQuery {
    pub plant_species: Option<String>,
    /// Minimum reward in dollars.
    pub min_reward: Option<f64>,
}

impl TryFrom<SearchBountiesQuery> for BountyFilter {
    type Error = HttpError;

    fn try_from(query: SearchBountiesQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            plant_species: query.plant_species.filter(|s| !s.trim().is_empty()),
            min_reward_cents: query
                .min_reward
                .map(|r| amount_to_cents("min_reward", r))
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BountyDetailsQuery {
    pub bounty_id: i64,
}

#[derive(Debug, Serialize)]
pub struct BountyDetailsResponse {
    pub message: &'static str,
    pub bounty: BountyDto,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Serialize)]
pub struct UserBountiesResponse {
    pub created_bounties: Vec<BountyDto>,
    pub submitted_bounties: Vec<Submission>,
}

impl From<UserBounties> for UserBountiesResponse {
    fn from(bounties: UserBounties) -> Self {
        Self {
            created_bounties: bounties.created_bounties.into_iter().map(Into::into).collect(),
            submitted_bounties: bounties.submitted_bounties,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    #[serde(default)]
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
    pub result: PlantIdentification,
}

#[derive(Debug, Deserialize)]
pub struct SubmitBountyRequest {
    #[serde(deserialize_with = "loose_id")]
    pub bounty_id: i64,
    #[serde(default)]
    pub image_base64: String,
    pub submission_type: Option<String>,
    pub submitter_note: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TryFrom<SubmitBountyRequest> for SubmitBounty {
    type Error = HttpError;

    fn try_from(req: SubmitBountyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            submission_type: parse_or_default(
                "submission_type",
                req.submission_type.as_deref(),
                SubmissionType::parse,
            )?,
            bounty_id: req.bounty_id,
            image_base64: req.image_base64,
            submitter_note: req.submitter_note,
            latitude: req.latitude,
            longitude: req.longitude,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub message: &'static str,
    pub submission_id: i64,
    pub identified_species: String,
    pub scientific_name: Option<String>,
    pub confidence: f64,
}

impl From<Submission> for SubmittedResponse {
    fn from(submission: Submission) -> Self {
        Self {
            message: SUCCESS,
            submission_id: submission.id,
            identified_species: submission.identification.species,
            scientific_name: submission.identification.scientific_name,
            confidence: submission.identification.confidence,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(deserialize_with = "loose_id")]
    pub submission_id: i64,
    pub is_approved: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    pub modified_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntryDto {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub total_earned: f64,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            total_earned: cents_to_dollars(entry.total_earned_cents),
            entry,
        }
    }
}
