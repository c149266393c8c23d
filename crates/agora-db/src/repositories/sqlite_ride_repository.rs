//! `SQLite` implementation of the `RideRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{NewRide, Ride};
use agora_core::ports::{RepositoryError, RideRepository};

use super::row_mappers::{RIDE_SELECT_COLUMNS, col, row_to_ride, storage_error};

pub struct SqliteRideRepository {
    pool: SqlitePool,
}

impl SqliteRideRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RideRepository for SqliteRideRepository {
    async fn insert(&self, ride: &NewRide) -> Result<Ride, RepositoryError> {
        let id = sqlx::query(
            "INSERT INTO rides (event_id, driver_id, seats, departure_location, departure_time, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(ride.event_id)
        .bind(ride.driver_id)
        .bind(ride.seats)
        .bind(&ride.departure_location)
        .bind(&ride.departure_time)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?
        .last_insert_rowid();

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Ride, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {RIDE_SELECT_COLUMNS} FROM rides WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("ride id={id}")))?;

        let mut ride = row_to_ride(&row)?;
        ride.passengers =
            sqlx::query_scalar("SELECT user_id FROM ride_passengers WHERE ride_id = ? ORDER BY rowid")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?;
        Ok(ride)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Ride>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {RIDE_SELECT_COLUMNS} FROM rides WHERE event_id = ? ORDER BY id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let passenger_rows = sqlx::query(
            "SELECT ride_id, user_id FROM ride_passengers WHERE event_id = ? ORDER BY rowid",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        let mut passengers: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in &passenger_rows {
            passengers
                .entry(col(row, "ride_id")?)
                .or_default()
                .push(col(row, "user_id")?);
        }

        rows.iter()
            .map(|row| {
                let mut ride = row_to_ride(row)?;
                ride.passengers = passengers.remove(&ride.id).unwrap_or_default();
                Ok(ride)
            })
            .collect()
    }

    async fn claim_seat(&self, ride_id: i64, user_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO ride_passengers (ride_id, event_id, user_id, joined_at)
             SELECT ?1, r.event_id, ?2, ?3 FROM rides r
             WHERE r.id = ?1
               AND (SELECT COUNT(*) FROM ride_passengers WHERE ride_id = ?1) < r.seats",
        )
        .bind(ride_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_seat(&self, ride_id: i64, user_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM ride_passengers WHERE ride_id = ? AND user_id = ?")
            .bind(ride_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{pool, seed_user};

    async fn seed_event(pool: &SqlitePool, host: i64) -> i64 {
        sqlx::query("INSERT INTO events (created_by, title, created_at) VALUES (?, 'Cleanup', ?)")
            .bind(host)
            .bind(Utc::now())
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    fn new_ride(event_id: i64, driver_id: i64, seats: i64) -> NewRide {
        NewRide {
            event_id,
            driver_id,
            seats,
            departure_location: "Library".to_string(),
            departure_time: Some("08:30".to_string()),
        }
    }

    #[tokio::test]
    async fn test_claim_seat_respects_capacity() {
        let pool = pool().await;
        let driver = seed_user(&pool, "driver").await;
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        let event = seed_event(&pool, driver).await;
        let repo = SqliteRideRepository::new(pool);
        let ride = repo.insert(&new_ride(event, driver, 1)).await.unwrap();

        assert!(repo.claim_seat(ride.id, a).await.unwrap());
        assert!(!repo.claim_seat(ride.id, b).await.unwrap());

        let stored = repo.get_by_id(ride.id).await.unwrap();
        assert_eq!(stored.passengers, vec![a]);
        assert_eq!(stored.seats_left(), 0);

        assert!(repo.release_seat(ride.id, a).await.unwrap());
        assert!(!repo.release_seat(ride.id, a).await.unwrap());
        assert!(repo.claim_seat(ride.id, b).await.unwrap());
    }

    #[tokio::test]
    async fn test_one_ride_per_event() {
        let pool = pool().await;
        let d1 = seed_user(&pool, "d1").await;
        let d2 = seed_user(&pool, "d2").await;
        let rider = seed_user(&pool, "rider").await;
        let event = seed_event(&pool, d1).await;
        let repo = SqliteRideRepository::new(pool);
        let first = repo.insert(&new_ride(event, d1, 3)).await.unwrap();
        let second = repo.insert(&new_ride(event, d2, 3)).await.unwrap();

        assert!(repo.claim_seat(first.id, rider).await.unwrap());
        let err = repo.claim_seat(second.id, rider).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));

        let rides = repo.list_by_event(event).await.unwrap();
        assert_eq!(rides.len(), 2);
        assert_eq!(rides[0].passengers, vec![rider]);
        assert!(rides[1].passengers.is_empty());
    }

    #[tokio::test]
    async fn test_claim_on_missing_ride_is_false() {
        let pool = pool().await;
        let rider = seed_user(&pool, "rider").await;
        let repo = SqliteRideRepository::new(pool);
        assert!(!repo.claim_seat(77, rider).await.unwrap());
    }
}
