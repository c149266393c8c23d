//! `SQLite` implementation of the `PayoutRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{Card, NewCard, NewWithdrawal, Withdrawal};
use agora_core::ports::{PayoutRepository, RepositoryError};

use super::row_mappers::{
    CARD_SELECT_COLUMNS, WITHDRAWAL_SELECT_COLUMNS, row_to_card, row_to_withdrawal, storage_error,
};

pub struct SqlitePayoutRepository {
    pool: SqlitePool,
}

impl SqlitePayoutRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutRepository for SqlitePayoutRepository {
    async fn insert_withdrawal(
        &self,
        withdrawal: &NewWithdrawal,
    ) -> Result<Withdrawal, RepositoryError> {
        let id = sqlx::query(
            "INSERT INTO withdrawals (user_id, amount_cents, payment_method, payment_details, status, provider_reference, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(withdrawal.user_id)
        .bind(withdrawal.amount_cents)
        .bind(withdrawal.payment_method.as_str())
        .bind(&withdrawal.payment_details)
        .bind(withdrawal.status.as_str())
        .bind(&withdrawal.provider_reference)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?
        .last_insert_rowid();

        let row = sqlx::query(&format!(
            "SELECT {WITHDRAWAL_SELECT_COLUMNS} FROM withdrawals WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row_to_withdrawal(&row)
    }

    async fn list_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {WITHDRAWAL_SELECT_COLUMNS} FROM withdrawals WHERE user_id = ? ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_withdrawal).collect()
    }

    async fn insert_card(&self, card: &NewCard) -> Result<Card, RepositoryError> {
        let id = sqlx::query(
            "INSERT INTO cards (user_id, provider_user_token, card_token, last_four, state, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(card.user_id)
        .bind(&card.provider_user_token)
        .bind(&card.card_token)
        .bind(&card.last_four)
        .bind(&card.state)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?
        .last_insert_rowid();

        let row = sqlx::query(&format!("SELECT {CARD_SELECT_COLUMNS} FROM cards WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        row_to_card(&row)
    }

    async fn list_cards(&self, user_id: i64) -> Result<Vec<Card>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {CARD_SELECT_COLUMNS} FROM cards WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_card).collect()
    }

    async fn cardholder_token(&self, user_id: i64) -> Result<Option<String>, RepositoryError> {
        sqlx::query_scalar("SELECT token FROM cardholders WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn save_cardholder_token(
        &self,
        user_id: i64,
        token: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cardholders (user_id, token, created_at) VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET token = excluded.token",
        )
        .bind(user_id)
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{pool, seed_user};
    use agora_core::domain::{PaymentMethod, WithdrawalStatus};

    fn withdrawal(user_id: i64, amount_cents: i64) -> NewWithdrawal {
        NewWithdrawal {
            user_id,
            amount_cents,
            payment_method: PaymentMethod::Paypal,
            payment_details: Some("ada@example.com".to_string()),
            status: WithdrawalStatus::Processing,
            provider_reference: None,
        }
    }

    #[tokio::test]
    async fn test_withdrawals_newest_first() {
        let pool = pool().await;
        let user = seed_user(&pool, "ada").await;
        let repo = SqlitePayoutRepository::new(pool);

        repo.insert_withdrawal(&withdrawal(user, 100)).await.unwrap();
        let latest = repo.insert_withdrawal(&withdrawal(user, 250)).await.unwrap();
        assert_eq!(latest.payment_method, PaymentMethod::Paypal);
        assert_eq!(latest.status, WithdrawalStatus::Processing);

        let history = repo.list_withdrawals(user).await.unwrap();
        let amounts: Vec<_> = history.iter().map(|w| w.amount_cents).collect();
        assert_eq!(amounts, vec![250, 100]);
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected_by_schema() {
        let pool = pool().await;
        let user = seed_user(&pool, "ada").await;
        let repo = SqlitePayoutRepository::new(pool);
        let err = repo.insert_withdrawal(&withdrawal(user, 0)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_cardholder_token_and_cards() {
        let pool = pool().await;
        let user = seed_user(&pool, "ada").await;
        let repo = SqlitePayoutRepository::new(pool);

        assert!(repo.cardholder_token(user).await.unwrap().is_none());
        repo.save_cardholder_token(user, "agora-user-1").await.unwrap();
        assert_eq!(
            repo.cardholder_token(user).await.unwrap().as_deref(),
            Some("agora-user-1")
        );

        let card = repo
            .insert_card(&NewCard {
                user_id: user,
                provider_user_token: "agora-user-1".to_string(),
                card_token: "card-1".to_string(),
                last_four: "4242".to_string(),
                state: "ACTIVE".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(repo.list_cards(user).await.unwrap(), vec![card]);
    }
}
