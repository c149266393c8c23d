//! `SQLite` implementation of the `EventRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{Event, NewEvent, PollKind, PollOption};
use agora_core::ports::{EventRepository, RepositoryError};

use super::row_mappers::{
    EVENT_SELECT_COLUMNS, col, row_to_event, row_to_poll_option, storage_error,
};

const POLL_OPTION_COLUMNS: &str = "id, event_id, kind, label, proposed_by, position";

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn attendees_of(&self, event_id: i64) -> Result<Vec<i64>, RepositoryError> {
        sqlx::query_scalar("SELECT user_id FROM event_attendees WHERE event_id = ? ORDER BY rowid")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn insert(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let id = sqlx::query(
            "INSERT INTO events (created_by, title, project_id, location, date, time_range, is_time_fixed, is_location_fixed, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(event.created_by)
        .bind(&event.title)
        .bind(event.project_id)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time_range)
        .bind(event.is_time_fixed)
        .bind(event.is_location_fixed)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?
        .last_insert_rowid();

        sqlx::query("INSERT INTO event_attendees (event_id, user_id, joined_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(event.created_by)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Event, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_SELECT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("event id={id}")))?;

        let mut event = row_to_event(&row)?;
        event.attendees = self.attendees_of(id).await?;
        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_SELECT_COLUMNS} FROM events ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let attendee_rows =
            sqlx::query("SELECT event_id, user_id FROM event_attendees ORDER BY rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?;
        let mut attendees: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in &attendee_rows {
            attendees
                .entry(col(row, "event_id")?)
                .or_default()
                .push(col(row, "user_id")?);
        }

        rows.iter()
            .map(|row| {
                let mut event = row_to_event(row)?;
                event.attendees = attendees.remove(&event.id).unwrap_or_default();
                Ok(event)
            })
            .collect()
    }

    async fn add_attendee(&self, event_id: i64, user_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO event_attendees (event_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_option(
        &self,
        event_id: i64,
        kind: PollKind,
        label: &str,
        proposed_by: i64,
    ) -> Result<PollOption, RepositoryError> {
        let id = sqlx::query(
            "INSERT INTO poll_options (event_id, kind, label, proposed_by, position)
             SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(position) + 1, 0)
             FROM poll_options WHERE event_id = ?1 AND kind = ?2",
        )
        .bind(event_id)
        .bind(kind.as_str())
        .bind(label)
        .bind(proposed_by)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?
        .last_insert_rowid();

        let row = sqlx::query(&format!(
            "SELECT {POLL_OPTION_COLUMNS} FROM poll_options WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row_to_poll_option(&row)
    }

    async fn list_options(
        &self,
        event_id: i64,
        kind: PollKind,
    ) -> Result<Vec<PollOption>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {POLL_OPTION_COLUMNS} FROM poll_options
             WHERE event_id = ? AND kind = ? ORDER BY position"
        ))
        .bind(event_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_poll_option).collect()
    }

    async fn replace_votes(
        &self,
        event_id: i64,
        kind: PollKind,
        user_id: i64,
        option_ids: &[i64],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query(
            "DELETE FROM poll_votes WHERE user_id = ? AND option_id IN
                (SELECT id FROM poll_options WHERE event_id = ? AND kind = ?)",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        for option_id in option_ids {
            sqlx::query("INSERT OR IGNORE INTO poll_votes (option_id, user_id) VALUES (?, ?)")
                .bind(option_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;
        }

        tx.commit().await.map_err(storage_error)
    }

    async fn list_votes(&self, event_id: i64, kind: PollKind) -> Result<Vec<i64>, RepositoryError> {
        sqlx::query_scalar(
            "SELECT v.option_id FROM poll_votes v
             JOIN poll_options o ON o.id = v.option_id
             WHERE o.event_id = ? AND o.kind = ?
             ORDER BY o.position, v.user_id",
        )
        .bind(event_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)
    }
}
