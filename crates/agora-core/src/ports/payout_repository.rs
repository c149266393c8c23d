//! Payout repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Card, NewCard, NewWithdrawal, Withdrawal};

/// Repository for withdrawals, issued cards and card-issuer user tokens.
#[async_trait]
pub trait PayoutRepository: Send + Sync {
    async fn insert_withdrawal(
        &self,
        withdrawal: &NewWithdrawal,
    ) -> Result<Withdrawal, RepositoryError>;

    /// Withdrawals of a user, newest first.
    async fn list_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, RepositoryError>;

    async fn insert_card(&self, card: &NewCard) -> Result<Card, RepositoryError>;

    async fn list_cards(&self, user_id: i64) -> Result<Vec<Card>, RepositoryError>;

    /// The card issuer's user token for this user, if one was created.
    async fn cardholder_token(&self, user_id: i64) -> Result<Option<String>, RepositoryError>;

    async fn save_cardholder_token(&self, user_id: i64, token: &str)
    -> Result<(), RepositoryError>;
}
