//! Submission repository trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{ApprovedRecord, NewSubmission, Submission, SubmissionStatus};

/// Repository for bounty submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Submission, RepositoryError>;

    /// Submissions for a bounty, newest first.
    async fn list_by_bounty(&self, bounty_id: i64) -> Result<Vec<Submission>, RepositoryError>;

    /// Submissions made by a user, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Submission>, RepositoryError>;

    /// Move a `pending_verification` submission to `status`.
    ///
    /// Returns `false` when the submission was not pending and nothing changed.
    async fn resolve(
        &self,
        id: i64,
        status: SubmissionStatus,
        verified_by: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// Approve a `pending_verification` submission and credit its submitter
    /// `reward_cents` in the same transaction.
    ///
    /// Returns `false` when the submission was not pending; nothing is credited then.
    async fn approve(
        &self,
        id: i64,
        verified_by: i64,
        verified_at: DateTime<Utc>,
        reward_cents: i64,
    ) -> Result<bool, RepositoryError>;

    async fn count_approved(&self, bounty_id: i64) -> Result<i64, RepositoryError>;

    /// Every approved submission with its submitter and the bounty reward.
    async fn list_approved(&self) -> Result<Vec<ApprovedRecord>, RepositoryError>;
}
