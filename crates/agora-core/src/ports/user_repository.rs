//! User repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{NewUser, User};

/// A user together with their stored password hash.
///
/// Only returned by [`UserRepository::get_credentials`] for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository for user accounts and their reward balances.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `Err(RepositoryError::AlreadyExists)` if the username is taken.
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError>;

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError>;

    async fn get_credentials(&self, username: &str) -> Result<UserCredentials, RepositoryError>;

    /// Fetch the users with the given ids. Unknown ids are skipped.
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepositoryError>;

    /// Subtract `amount_cents` only if the balance covers it.
    ///
    /// Returns `false` when the balance is insufficient and nothing changed.
    async fn debit_earnings(&self, user_id: i64, amount_cents: i64)
    -> Result<bool, RepositoryError>;

    /// Give back a debit whose payout failed.
    async fn refund_earnings(&self, user_id: i64, amount_cents: i64) -> Result<(), RepositoryError>;
}
