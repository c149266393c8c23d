//! Session repository trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::Session;

/// Repository for login sessions keyed by their opaque token.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), RepositoryError>;

    /// Look up a session. Expired sessions are still returned; callers check expiry.
    async fn find(&self, token: &str) -> Result<Option<Session>, RepositoryError>;

    async fn delete(&self, token: &str) -> Result<(), RepositoryError>;

    /// Remove sessions that expired before `now`. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
