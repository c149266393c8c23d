//! `SQLite` implementation of the `UserRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{NewUser, User};
use agora_core::ports::{RepositoryError, UserCredentials, UserRepository};

use super::row_mappers::{
    USER_SELECT_COLUMNS, col, encode_list, placeholders, row_to_user, storage_error,
};

/// `SQLite` implementation of the `UserRepository` trait.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, name, email, expertise, is_verified_org, organization_name, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.email)
        .bind(encode_list(&user.expertise)?)
        .bind(user.is_verified_org)
        .bind(&user.organization_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match storage_error(e) {
            RepositoryError::AlreadyExists(_) => {
                RepositoryError::AlreadyExists(format!("username '{}'", user.username))
            }
            other => other,
        })?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_SELECT_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("user id={id}")))?;

        row_to_user(&row)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_SELECT_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("username '{username}'")))?;

        row_to_user(&row)
    }

    async fn get_credentials(&self, username: &str) -> Result<UserCredentials, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_SELECT_COLUMNS}, password_hash FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("username '{username}'")))?;

        Ok(UserCredentials {
            user: row_to_user(&row)?,
            password_hash: col(&row, "password_hash")?,
        })
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {USER_SELECT_COLUMNS} FROM users WHERE id IN {} ORDER BY id",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(storage_error)?;
        rows.iter().map(row_to_user).collect()
    }

    async fn debit_earnings(
        &self,
        user_id: i64,
        amount_cents: i64,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET earnings_cents = earnings_cents - ?
             WHERE id = ? AND earnings_cents >= ?",
        )
        .bind(amount_cents)
        .bind(user_id)
        .bind(amount_cents)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn refund_earnings(
        &self,
        user_id: i64,
        amount_cents: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET earnings_cents = earnings_cents + ? WHERE id = ?")
            .bind(amount_cents)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user id={user_id}")));
        }
        Ok(())
    }
}
