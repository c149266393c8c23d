//! Event repository trait definition.
//!
//! Events, their attendees and the time-slot/location polls.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Event, NewEvent, PollKind, PollOption};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert an event with its creator as the first attendee.
    async fn insert(&self, event: &NewEvent) -> Result<Event, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Event, RepositoryError>;

    /// Events, newest first.
    async fn list(&self) -> Result<Vec<Event>, RepositoryError>;

    /// Returns `false` if the user was already attending.
    async fn add_attendee(&self, event_id: i64, user_id: i64) -> Result<bool, RepositoryError>;

    /// Append an option at the next position for `(event_id, kind)`, starting at 0.
    async fn insert_option(
        &self,
        event_id: i64,
        kind: PollKind,
        label: &str,
        proposed_by: i64,
    ) -> Result<PollOption, RepositoryError>;

    /// Options in proposal order.
    async fn list_options(
        &self,
        event_id: i64,
        kind: PollKind,
    ) -> Result<Vec<PollOption>, RepositoryError>;

    /// Replace the user's votes for one poll with `option_ids`.
    async fn replace_votes(
        &self,
        event_id: i64,
        kind: PollKind,
        user_id: i64,
        option_ids: &[i64],
    ) -> Result<(), RepositoryError>;

    /// One option id per vote cast in the poll.
    async fn list_votes(&self, event_id: i64, kind: PollKind) -> Result<Vec<i64>, RepositoryError>;
}
