//! `SQLite` implementation of the `SubmissionRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use agora_core::domain::{
    ApprovedRecord, NewSubmission, Submission, SubmissionStatus,
};
use agora_core::ports::{RepositoryError, SubmissionRepository};

use super::row_mappers::{
    SUBMISSION_SELECT_COLUMNS, col, encode_list, row_to_submission, storage_error,
};

pub struct SqliteSubmissionRepository {
    pool: SqlitePool,
}

impl SqliteSubmissionRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, id: i64) -> Result<Vec<Submission>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBMISSION_SELECT_COLUMNS} FROM submissions WHERE {column} = ? ORDER BY id DESC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_submission).collect()
    }
}

#[async_trait]
impl SubmissionRepository for SqliteSubmissionRepository {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, RepositoryError> {
        let id = &submission.identification;
        let result = sqlx::query(
            "INSERT INTO submissions (bounty_id, user_id, image_base64, submission_type, submitter_note, latitude, longitude, species, scientific_name, confidence, common_names, status, submitted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(submission.bounty_id)
        .bind(submission.user_id)
        .bind(&submission.image_base64)
        .bind(submission.submission_type.as_str())
        .bind(&submission.submitter_note)
        .bind(submission.location.map(|p| p.latitude))
        .bind(submission.location.map(|p| p.longitude))
        .bind(&id.species)
        .bind(&id.scientific_name)
        .bind(id.confidence)
        .bind(encode_list(&id.common_names)?)
        .bind(SubmissionStatus::PendingVerification.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Submission, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SUBMISSION_SELECT_COLUMNS} FROM submissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("submission id={id}")))?;

        row_to_submission(&row)
    }

    async fn list_by_bounty(&self, bounty_id: i64) -> Result<Vec<Submission>, RepositoryError> {
        self.list_where("bounty_id", bounty_id).await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Submission>, RepositoryError> {
        self.list_where("user_id", user_id).await
    }

    async fn resolve(
        &self,
        id: i64,
        status: SubmissionStatus,
        verified_by: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE submissions SET status = ?, verified_by = ?, verified_at = ?
             WHERE id = ? AND status = 'pending_verification'",
        )
        .bind(status.as_str())
        .bind(verified_by)
        .bind(verified_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn approve(
        &self,
        id: i64,
        verified_by: i64,
        verified_at: DateTime<Utc>,
        reward_cents: i64,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let result = sqlx::query(
            "UPDATE submissions SET status = 'approved', verified_by = ?, verified_at = ?
             WHERE id = ? AND status = 'pending_verification'",
        )
        .bind(verified_by)
        .bind(verified_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;
        if result.rows_affected() != 1 {
            return Ok(false);
        }

        let credited = sqlx::query(
            "UPDATE users
             SET earnings_cents = earnings_cents + ?,
                 total_approved_submissions = total_approved_submissions + 1
             WHERE id = (SELECT user_id FROM submissions WHERE id = ?)",
        )
        .bind(reward_cents)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;
        if credited.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("submitter of submission id={id}")));
        }

        tx.commit().await.map_err(storage_error)?;
        Ok(true)
    }

    async fn count_approved(&self, bounty_id: i64) -> Result<i64, RepositoryError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions WHERE bounty_id = ? AND status = 'approved'",
        )
        .bind(bounty_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn list_approved(&self) -> Result<Vec<ApprovedRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT s.user_id, u.username, b.reward_cents
             FROM submissions s
             JOIN users u ON u.id = s.user_id
             JOIN bounties b ON b.id = s.bounty_id
             WHERE s.status = 'approved'
             ORDER BY s.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(|row| {
                Ok(ApprovedRecord {
                    user_id: col(row, "user_id")?,
                    username: col(row, "username")?,
                    reward_cents: col(row, "reward_cents")?,
                })
            })
            .collect()
    }
}
