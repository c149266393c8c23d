//! Bounty repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Bounty, BountyFilter, BountyStatus, NewBounty};

/// Repository for bounties.
///
/// # Design Rules
///
/// - Search returns only `open` bounties, newest first
/// - Counters are bumped in SQL, never read-then-written by callers
#[async_trait]
pub trait BountyRepository: Send + Sync {
    async fn insert(&self, bounty: &NewBounty) -> Result<Bounty, RepositoryError>;

    /// Returns `Err(RepositoryError::NotFound)` if the bounty doesn't exist.
    async fn get_by_id(&self, id: i64) -> Result<Bounty, RepositoryError>;

    async fn search(&self, filter: &BountyFilter) -> Result<Vec<Bounty>, RepositoryError>;

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Bounty>, RepositoryError>;

    async fn increment_submissions(&self, id: i64) -> Result<(), RepositoryError>;

    async fn set_status(&self, id: i64, status: BountyStatus) -> Result<(), RepositoryError>;

    /// Delete every bounty and its submissions. Returns the number of bounties removed.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}
