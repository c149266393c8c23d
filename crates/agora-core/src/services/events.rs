//! Event service - field events, time-slot/location polls and ride sharing.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    BestOption, Event, NewEvent, NewRide, PollKind, PollOption, Ride, User, best_option,
};
use crate::ports::{
    CoreError, EventRepository, ProjectRepository, RepositoryError, RideRepository,
};
use crate::utils::validation::{optional_text, require_text};

const DEFAULT_EVENT_TITLE: &str = "Field event";

#[derive(Debug, Clone, Default)]
pub struct CreateEvent {
    pub title: Option<String>,
    pub project_id: Option<i64>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time_range: Option<String>,
    pub is_time_fixed: bool,
    pub is_location_fixed: bool,
}

#[derive(Debug, Clone)]
pub struct OfferRide {
    pub seats: i64,
    pub departure_location: String,
    pub departure_time: Option<String>,
}

/// A ride with its remaining capacity.
#[derive(Debug, Clone, Serialize)]
pub struct RideView {
    #[serde(flatten)]
    pub ride: Ride,
    pub seats_left: i64,
}

impl From<Ride> for RideView {
    fn from(ride: Ride) -> Self {
        Self {
            seats_left: ride.seats_left(),
            ride,
        }
    }
}

pub struct EventService {
    events: Arc<dyn EventRepository>,
    rides: Arc<dyn RideRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        rides: Arc<dyn RideRepository>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            events,
            rides,
            projects,
        }
    }

    pub async fn create(&self, creator: &User, input: CreateEvent) -> Result<Event, CoreError> {
        let location = optional_text(input.location);
        let date = optional_text(input.date);
        if input.is_location_fixed && location.is_none() {
            return Err(CoreError::Validation(
                "a fixed location requires a location".to_string(),
            ));
        }
        if input.is_time_fixed && date.is_none() {
            return Err(CoreError::Validation("a fixed time requires a date".to_string()));
        }
        if let Some(project_id) = input.project_id {
            self.projects
                .get_by_id(project_id)
                .await
                .map_err(CoreError::not_found_as("Project not found!"))?;
        }

        let event = self
            .events
            .insert(&NewEvent {
                created_by: creator.id,
                title: optional_text(input.title)
                    .unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string()),
                project_id: input.project_id,
                location,
                date,
                time_range: optional_text(input.time_range),
                is_time_fixed: input.is_time_fixed,
                is_location_fixed: input.is_location_fixed,
            })
            .await?;

        tracing::info!(event_id = event.id, user_id = creator.id, "Created event");
        Ok(event)
    }

    pub async fn get(&self, event_id: i64) -> Result<Event, CoreError> {
        self.events
            .get_by_id(event_id)
            .await
            .map_err(CoreError::not_found_as("event_not_found"))
    }

    pub async fn list(&self) -> Result<Vec<Event>, CoreError> {
        self.events.list().await.map_err(CoreError::from)
    }

    pub async fn attend(&self, user: &User, event_id: i64) -> Result<Event, CoreError> {
        self.get(event_id).await?;
        self.events.add_attendee(event_id, user.id).await?;
        self.get(event_id).await
    }

    /// Propose a time slot or location.
    ///
    /// Fails with a conflict when that dimension is fixed. A label already
    /// proposed (ignoring case) returns the existing option.
    pub async fn propose_option(
        &self,
        user: &User,
        event_id: i64,
        kind: PollKind,
        label: &str,
    ) -> Result<PollOption, CoreError> {
        let event = self.get(event_id).await?;
        if event.is_fixed(kind) {
            return Err(CoreError::Conflict(format!(
                "this event's {} is fixed",
                kind_noun(kind)
            )));
        }
        let label = require_text("label", label)?;

        let existing = self.events.list_options(event_id, kind).await?;
        if let Some(option) = existing
            .into_iter()
            .find(|o| o.label.to_lowercase() == label.to_lowercase())
        {
            return Ok(option);
        }

        self.events
            .insert_option(event_id, kind, &label, user.id)
            .await
            .map_err(CoreError::from)
    }

    pub async fn options(
        &self,
        event_id: i64,
        kind: PollKind,
    ) -> Result<Vec<PollOption>, CoreError> {
        self.get(event_id).await?;
        self.events
            .list_options(event_id, kind)
            .await
            .map_err(CoreError::from)
    }

    /// Replace the user's votes in one poll. Returns the accepted option ids.
    pub async fn vote(
        &self,
        user: &User,
        event_id: i64,
        kind: PollKind,
        option_ids: &[i64],
    ) -> Result<Vec<i64>, CoreError> {
        let event = self.get(event_id).await?;
        if event.is_fixed(kind) {
            return Err(CoreError::Conflict(format!(
                "this event's {} is fixed",
                kind_noun(kind)
            )));
        }

        let options = self.events.list_options(event_id, kind).await?;
        let mut ids = option_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if let Some(unknown) = ids.iter().find(|id| !options.iter().any(|o| o.id == **id)) {
            return Err(CoreError::Validation(format!(
                "option {unknown} is not a {} option of this event",
                kind_noun(kind)
            )));
        }

        self.events
            .replace_votes(event_id, kind, user.id, &ids)
            .await?;
        tracing::debug!(
            event_id,
            user_id = user.id,
            kind = kind.as_str(),
            votes = ids.len(),
            "Recorded votes"
        );
        Ok(ids)
    }

    /// The leading option of a poll, if any option exists.
    pub async fn best(
        &self,
        event_id: i64,
        kind: PollKind,
    ) -> Result<Option<BestOption>, CoreError> {
        self.get(event_id).await?;
        let options = self.events.list_options(event_id, kind).await?;
        let votes = self.events.list_votes(event_id, kind).await?;
        Ok(best_option(&options, &votes))
    }

    pub async fn offer_ride(
        &self,
        driver: &User,
        event_id: i64,
        input: OfferRide,
    ) -> Result<RideView, CoreError> {
        self.get(event_id).await?;
        if input.seats < 1 {
            return Err(CoreError::Validation("seats must be at least 1".to_string()));
        }
        let departure_location = require_text("departure_location", &input.departure_location)?;

        let rides = self.rides.list_by_event(event_id).await?;
        if rides.iter().any(|r| r.involves(driver.id)) {
            return Err(CoreError::Conflict(
                "already driving or riding to this event".to_string(),
            ));
        }

        let ride = self
            .rides
            .insert(&NewRide {
                event_id,
                driver_id: driver.id,
                seats: input.seats,
                departure_location,
                departure_time: optional_text(input.departure_time),
            })
            .await?;
        self.events.add_attendee(event_id, driver.id).await?;

        tracing::info!(event_id, ride_id = ride.id, user_id = driver.id, "Offered ride");
        Ok(ride.into())
    }

    /// Take a seat. The driver cannot join their own ride and nobody rides twice per event.
    pub async fn join_ride(
        &self,
        user: &User,
        event_id: i64,
        ride_id: i64,
    ) -> Result<RideView, CoreError> {
        let ride = self.ride(event_id, ride_id).await?;
        if ride.driver_id == user.id {
            return Err(CoreError::Conflict("drivers cannot join their own ride".to_string()));
        }
        if ride.passengers.contains(&user.id) {
            return Ok(ride.into());
        }

        let rides = self.rides.list_by_event(event_id).await?;
        if rides.iter().any(|r| r.involves(user.id)) {
            return Err(CoreError::Conflict(
                "already driving or riding to this event".to_string(),
            ));
        }

        let claimed = self
            .rides
            .claim_seat(ride_id, user.id)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) | RepositoryError::Constraint(_) => {
                    CoreError::Conflict("already driving or riding to this event".to_string())
                }
                other => CoreError::Repository(other),
            })?;
        if !claimed {
            return Err(CoreError::Conflict("ride_full".to_string()));
        }
        self.events.add_attendee(event_id, user.id).await?;

        tracing::debug!(event_id, ride_id, user_id = user.id, "Joined ride");
        Ok(self.ride(event_id, ride_id).await?.into())
    }

    pub async fn leave_ride(
        &self,
        user: &User,
        event_id: i64,
        ride_id: i64,
    ) -> Result<RideView, CoreError> {
        self.ride(event_id, ride_id).await?;
        if !self.rides.release_seat(ride_id, user.id).await? {
            return Err(CoreError::Conflict("not a passenger on this ride".to_string()));
        }
        Ok(self.ride(event_id, ride_id).await?.into())
    }

    pub async fn list_rides(&self, event_id: i64) -> Result<Vec<RideView>, CoreError> {
        self.get(event_id).await?;
        Ok(self
            .rides
            .list_by_event(event_id)
            .await?
            .into_iter()
            .map(RideView::from)
            .collect())
    }

    async fn ride(&self, event_id: i64, ride_id: i64) -> Result<Ride, CoreError> {
        let ride = self
            .rides
            .get_by_id(ride_id)
            .await
            .map_err(CoreError::not_found_as("ride_not_found"))?;
        if ride.event_id != event_id {
            return Err(CoreError::NotFound("ride_not_found".to_string()));
        }
        Ok(ride)
    }
}

const fn kind_noun(kind: PollKind) -> &'static str {
    match kind {
        PollKind::TimeSlot => "time",
        PollKind::Location => "location",
    }
}
