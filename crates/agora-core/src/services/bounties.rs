//! Bounty service - bounties, photo submissions and their review.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::identification::identify_or_unknown;
use crate::domain::{
    Bounty, BountyFilter, BountyStatus, NewBounty, NewSubmission, Organ, PlantIdentification,
    Submission, SubmissionStatus, SubmissionType, User,
};
use crate::ports::{
    BountyRepository, CoreError, PlantIdentifierPort, SubmissionRepository, UserRepository,
};
use crate::utils::validation::{decode_image, optional_point, optional_text, require_text};

/// Input for a new bounty. Amounts in cents.
#[derive(Debug, Clone)]
pub struct CreateBounty {
    pub title: String,
    pub description: Option<String>,
    pub plant_species: String,
    pub reward_cents: i64,
    pub num_submissions_needed: i64,
    pub additional_notes: Option<String>,
}

/// Input for a photo submission.
#[derive(Debug, Clone)]
pub struct SubmitBounty {
    pub bounty_id: i64,
    pub image_base64: String,
    pub submission_type: SubmissionType,
    pub submitter_note: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BountyDetails {
    pub bounty: Bounty,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserBounties {
    pub created_bounties: Vec<Bounty>,
    pub submitted_bounties: Vec<Submission>,
}

pub struct BountyService {
    bounties: Arc<dyn BountyRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    users: Arc<dyn UserRepository>,
    identifier: Arc<dyn PlantIdentifierPort>,
}

impl BountyService {
    pub fn new(
        bounties: Arc<dyn BountyRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        users: Arc<dyn UserRepository>,
        identifier: Arc<dyn PlantIdentifierPort>,
    ) -> Self {
        Self {
            bounties,
            submissions,
            users,
            identifier,
        }
    }

    pub async fn create(&self, creator: &User, input: CreateBounty) -> Result<Bounty, CoreError> {
        let title = require_text("title", &input.title)?;
        let plant_species = require_text("plant_species", &input.plant_species)?;
        if input.reward_cents < 0 {
            return Err(CoreError::Validation("reward must not be negative".to_string()));
        }
        if input.num_submissions_needed < 1 {
            return Err(CoreError::Validation(
                "num_submissions_needed must be at least 1".to_string(),
            ));
        }

        let bounty = self
            .bounties
            .insert(&NewBounty {
                creator_id: creator.id,
                title,
                description: optional_text(input.description),
                plant_species,
                reward_cents: input.reward_cents,
                num_submissions_needed: input.num_submissions_needed,
                additional_notes: optional_text(input.additional_notes),
            })
            .await?;

        tracing::info!(bounty_id = bounty.id, user_id = creator.id, "Created bounty");
        Ok(bounty)
    }

    /// Open bounties matching the filter, newest first.
    pub async fn search(&self, filter: &BountyFilter) -> Result<Vec<Bounty>, CoreError> {
        let filter = BountyFilter {
            plant_species: filter
                .plant_species
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            min_reward_cents: filter.min_reward_cents,
        };
        self.bounties.search(&filter).await.map_err(CoreError::from)
    }

    pub async fn details(&self, bounty_id: i64) -> Result<BountyDetails, CoreError> {
        let bounty = self.get(bounty_id).await?;
        let submissions = self.submissions.list_by_bounty(bounty_id).await?;
        Ok(BountyDetails {
            bounty,
            submissions,
        })
    }

    /// Bounties created by and submissions made by `username`.
    pub async fn user_bounties(&self, username: &str) -> Result<UserBounties, CoreError> {
        let user = self
            .users
            .get_by_username(username.trim())
            .await
            .map_err(CoreError::not_found_as("user_not_found"))?;

        Ok(UserBounties {
            created_bounties: self.bounties.list_by_creator(user.id).await?,
            submitted_bounties: self.submissions.list_by_user(user.id).await?,
        })
    }

    /// Identify a photo without storing anything.
    ///
    /// Unlike submissions, provider failures surface to the caller.
    pub async fn identify(&self, image_base64: &str) -> Result<PlantIdentification, CoreError> {
        let image = decode_image(image_base64)?;
        self.identifier
            .identify(&image.bytes, Organ::Auto)
            .await
            .map_err(CoreError::from)
    }

    pub async fn submit(&self, user: &User, input: SubmitBounty) -> Result<Submission, CoreError> {
        let bounty = self.get(input.bounty_id).await?;
        if bounty.status != BountyStatus::Open {
            return Err(CoreError::Conflict("bounty_not_open".to_string()));
        }

        let image = decode_image(&input.image_base64)?;
        let location = optional_point(input.latitude, input.longitude)?;
        let identification = identify_or_unknown(self.identifier.as_ref(), &image.bytes).await;

        let submission = self
            .submissions
            .insert(&NewSubmission {
                bounty_id: bounty.id,
                user_id: user.id,
                image_base64: image.base64,
                submission_type: input.submission_type,
                submitter_note: optional_text(input.submitter_note),
                location,
                identification,
            })
            .await?;
        self.bounties.increment_submissions(bounty.id).await?;

        tracing::info!(
            bounty_id = bounty.id,
            submission_id = submission.id,
            user_id = user.id,
            species = %submission.identification.species,
            "Received bounty submission"
        );
        Ok(submission)
    }

    /// Approve or reject a pending submission. Only the bounty creator may.
    ///
    /// Returns the number of submissions changed: 0 when it was already resolved.
    pub async fn verify(
        &self,
        verifier: &User,
        submission_id: i64,
        approve: bool,
    ) -> Result<u64, CoreError> {
        let submission = self
            .submissions
            .get_by_id(submission_id)
            .await
            .map_err(CoreError::not_found_as("submission_not_found"))?;
        let bounty = self.get(submission.bounty_id).await?;
        if bounty.creator_id != verifier.id {
            return Err(CoreError::Forbidden(
                "Only the bounty creator can verify submissions".to_string(),
            ));
        }

        let now = Utc::now();
        let (status, changed) = if approve {
            let changed = self
                .submissions
                .approve(submission_id, verifier.id, now, bounty.reward_cents)
                .await?;
            (SubmissionStatus::Approved, changed)
        } else {
            let changed = self
                .submissions
                .resolve(submission_id, SubmissionStatus::Rejected, verifier.id, now)
                .await?;
            (SubmissionStatus::Rejected, changed)
        };
        if !changed {
            return Ok(0);
        }

        if approve {
            let approved = self.submissions.count_approved(bounty.id).await?;
            if approved >= bounty.num_submissions_needed {
                self.bounties
                    .set_status(bounty.id, BountyStatus::Completed)
                    .await?;
                tracing::info!(bounty_id = bounty.id, "Bounty completed");
            }
        }

        tracing::info!(
            submission_id,
            bounty_id = bounty.id,
            status = status.as_str(),
            "Verified submission"
        );
        Ok(1)
    }

    /// Delete every bounty and submission. Returns the number of bounties removed.
    pub async fn reset(&self) -> Result<u64, CoreError> {
        let removed = self.bounties.delete_all().await?;
        tracing::warn!(removed, "Deleted all bounties");
        Ok(removed)
    }

    async fn get(&self, bounty_id: i64) -> Result<Bounty, CoreError> {
        self.bounties
            .get_by_id(bounty_id)
            .await
            .map_err(CoreError::not_found_as("bounty_not_found"))
    }
}
