//! Fixtures shared by the repository tests.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::setup::setup_test_database;

pub async fn pool() -> SqlitePool {
    setup_test_database().await.unwrap()
}

/// Insert a bare user row and return its id.
pub async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, 'hash', ?)")
        .bind(username)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}
