//! Ride repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{NewRide, Ride};

/// Repository for rides offered to events.
///
/// # Design Rules
///
/// - `claim_seat` is a single guarded statement: it never lets the
///   passenger count exceed the ride's seats
#[async_trait]
pub trait RideRepository: Send + Sync {
    async fn insert(&self, ride: &NewRide) -> Result<Ride, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Ride, RepositoryError>;

    /// Rides of an event in the order they were offered.
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Ride>, RepositoryError>;

    /// Add a passenger if a seat is free. Returns `false` when the ride is full.
    async fn claim_seat(&self, ride_id: i64, user_id: i64) -> Result<bool, RepositoryError>;

    /// Remove a passenger. Returns `false` if they were not on the ride.
    async fn release_seat(&self, ride_id: i64, user_id: i64) -> Result<bool, RepositoryError>;
}
