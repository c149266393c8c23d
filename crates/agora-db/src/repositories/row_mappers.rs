//! Row mapping helpers for `SQLite` queries.

use agora_core::{
    Bounty, BountyStatus, Card, CollectionLocation, Event, GeoPoint, PaymentMethod, Picture,
    PlantIdentification, PollKind, PollOption, Project, ProjectMessage, ProjectStatus,
    RepositoryError, Ride, Session, Submission, SubmissionStatus, SubmissionType, User,
    Withdrawal, WithdrawalStatus, domain::ActionType,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};

pub const USER_SELECT_COLUMNS: &str = "id, username, name, email, expertise, earnings_cents, total_approved_submissions, is_verified_org, organization_name, created_at";

pub const BOUNTY_SELECT_COLUMNS: &str = "id, creator_id, title, description, plant_species, reward_cents, num_submissions_needed, current_submissions, additional_notes, status, created_at";

pub const SUBMISSION_SELECT_COLUMNS: &str = "id, bounty_id, user_id, image_base64, submission_type, submitter_note, latitude, longitude, species, scientific_name, confidence, common_names, status, verified_by, submitted_at, verified_at";

pub const PROJECT_SELECT_COLUMNS: &str = "id, created_by, title, description, plant_type, action_type, data_needed, purpose, location_name, latitude, longitude, submissions_needed, submissions_completed, status, created_at";

pub const PICTURE_SELECT_COLUMNS: &str = "id, project_id, user_id, image_base64, latitude, longitude, species, scientific_name, confidence, common_names, is_match, notes, uploaded_at";

pub const EVENT_SELECT_COLUMNS: &str = "id, created_by, title, project_id, location, date, time_range, is_time_fixed, is_location_fixed, created_at";

pub const RIDE_SELECT_COLUMNS: &str =
    "id, event_id, driver_id, seats, departure_location, departure_time";

pub const WITHDRAWAL_SELECT_COLUMNS: &str = "id, user_id, amount_cents, payment_method, payment_details, status, provider_reference, created_at";

pub const CARD_SELECT_COLUMNS: &str =
    "id, user_id, provider_user_token, card_token, last_four, state, created_at";

/// Map a sqlx error onto the storage-agnostic repository error.
pub fn storage_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound(err.to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::AlreadyExists(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() || db.is_check_violation() => {
            RepositoryError::Constraint(db.message().to_string())
        }
        _ => RepositoryError::Storage(err.to_string()),
    }
}

/// Read one column, mapping decode failures to `Storage`.
pub fn col<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::Storage(e.to_string()))
}

fn parse_column<T>(
    row: &SqliteRow,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, RepositoryError> {
    let raw: String = col(row, name)?;
    parse(&raw).ok_or_else(|| {
        RepositoryError::Serialization(format!("unexpected {name} value '{raw}'"))
    })
}

/// Encode a string list as a JSON array for a TEXT column.
pub fn encode_list(values: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(values).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn decode_list(raw: Option<String>) -> Result<Vec<String>, RepositoryError> {
    match raw {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(|e| RepositoryError::Serialization(e.to_string()))
        }
        _ => Ok(Vec::new()),
    }
}

fn point(row: &SqliteRow) -> Result<Option<GeoPoint>, RepositoryError> {
    Ok(GeoPoint::from_parts(
        col(row, "latitude")?,
        col(row, "longitude")?,
    ))
}

/// Build a `(?, ?, ...)` placeholder list for an `IN` clause.
pub fn placeholders(count: usize) -> String {
    let marks = vec!["?"; count].join(", ");
    format!("({marks})")
}

pub fn row_to_user(row: &SqliteRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: col(row, "id")?,
        username: col(row, "username")?,
        name: col(row, "name")?,
        email: col(row, "email")?,
        expertise: decode_list(col(row, "expertise")?)?,
        earnings_cents: col(row, "earnings_cents")?,
        total_approved_submissions: col(row, "total_approved_submissions")?,
        is_verified_org: col(row, "is_verified_org")?,
        organization_name: col(row, "organization_name")?,
        created_at: col(row, "created_at")?,
    })
}

pub fn row_to_session(row: &SqliteRow) -> Result<Session, RepositoryError> {
    Ok(Session {
        token: col(row, "token")?,
        user_id: col(row, "user_id")?,
        created_at: col(row, "created_at")?,
        expires_at: col(row, "expires_at")?,
    })
}

pub fn row_to_bounty(row: &SqliteRow) -> Result<Bounty, RepositoryError> {
    Ok(Bounty {
        id: col(row, "id")?,
        creator_id: col(row, "creator_id")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        plant_species: col(row, "plant_species")?,
        reward_cents: col(row, "reward_cents")?,
        num_submissions_needed: col(row, "num_submissions_needed")?,
        current_submissions: col(row, "current_submissions")?,
        additional_notes: col(row, "additional_notes")?,
        status: parse_column(row, "status", BountyStatus::parse)?,
        created_at: col(row, "created_at")?,
    })
}

pub fn row_to_submission(row: &SqliteRow) -> Result<Submission, RepositoryError> {
    Ok(Submission {
        id: col(row, "id")?,
        bounty_id: col(row, "bounty_id")?,
        user_id: col(row, "user_id")?,
        image_base64: col(row, "image_base64")?,
        submission_type: parse_column(row, "submission_type", SubmissionType::parse)?,
        submitter_note: col(row, "submitter_note")?,
        location: point(row)?,
        identification: PlantIdentification {
            species: col(row, "species")?,
            scientific_name: col(row, "scientific_name")?,
            confidence: col(row, "confidence")?,
            common_names: decode_list(col(row, "common_names")?)?,
        },
        status: parse_column(row, "status", SubmissionStatus::parse)?,
        verified_by: col(row, "verified_by")?,
        submitted_at: col(row, "submitted_at")?,
        verified_at: col(row, "verified_at")?,
    })
}

/// Map a project row. Contributors are stored in their own table and filled in by the caller.
pub fn row_to_project(row: &SqliteRow) -> Result<Project, RepositoryError> {
    Ok(Project {
        id: col(row, "id")?,
        created_by: col(row, "created_by")?,
        title: col(row, "title")?,
        description: col(row, "description")?,
        plant_type: col(row, "plant_type")?,
        action_type: parse_column(row, "action_type", ActionType::parse)?,
        data_needed: col(row, "data_needed")?,
        purpose: col(row, "purpose")?,
        location_name: col(row, "location_name")?,
        location: point(row)?,
        submissions_needed: col(row, "submissions_needed")?,
        submissions_completed: col(row, "submissions_completed")?,
        contributors: Vec::new(),
        status: parse_column(row, "status", ProjectStatus::parse)?,
        created_at: col(row, "created_at")?,
    })
}

pub fn row_to_picture(row: &SqliteRow) -> Result<Picture, RepositoryError> {
    let species: Option<String> = col(row, "species")?;
    let identification = match species {
        Some(species) => Some(PlantIdentification {
            species,
            scientific_name: col(row, "scientific_name")?,
            confidence: col::<Option<f64>>(row, "confidence")?.unwrap_or(0.0),
            common_names: decode_list(col(row, "common_names")?)?,
        }),
        None => None,
    };

    Ok(Picture {
        id: col(row, "id")?,
        project_id: col(row, "project_id")?,
        user_id: col(row, "user_id")?,
        image_base64: col(row, "image_base64")?,
        location: point(row)?,
        identification,
        is_match: col(row, "is_match")?,
        notes: col(row, "notes")?,
        uploaded_at: col(row, "uploaded_at")?,
    })
}

pub fn row_to_location(row: &SqliteRow) -> Result<CollectionLocation, RepositoryError> {
    Ok(CollectionLocation {
        id: col(row, "id")?,
        project_id: col(row, "project_id")?,
        name: col(row, "name")?,
        latitude: col(row, "latitude")?,
        longitude: col(row, "longitude")?,
        description: col(row, "description")?,
        added_by: col(row, "added_by")?,
        created_at: col(row, "created_at")?,
    })
}

pub fn row_to_message(row: &SqliteRow) -> Result<ProjectMessage, RepositoryError> {
    Ok(ProjectMessage {
        id: col(row, "id")?,
        project_id: col(row, "project_id")?,
        user_id: col(row, "user_id")?,
        content: col(row, "content")?,
        created_at: col(row, "created_at")?,
    })
}

/// Map an event row. Attendees are filled in by the caller.
pub fn row_to_event(row: &SqliteRow) -> Result<Event, RepositoryError> {
    Ok(Event {
        id: col(row, "id")?,
        created_by: col(row, "created_by")?,
        title: col(row, "title")?,
        project_id: col(row, "project_id")?,
        location: col(row, "location")?,
        date: col(row, "date")?,
        time_range: col(row, "time_range")?,
        is_time_fixed: col(row, "is_time_fixed")?,
        is_location_fixed: col(row, "is_location_fixed")?,
        attendees: Vec::new(),
        created_at: col(row, "created_at")?,
    })
}

pub fn row_to_poll_option(row: &SqliteRow) -> Result<PollOption, RepositoryError> {
    Ok(PollOption {
        id: col(row, "id")?,
        event_id: col(row, "event_id")?,
        kind: parse_column(row, "kind", PollKind::parse)?,
        label: col(row, "label")?,
        proposed_by: col(row, "proposed_by")?,
        position: col(row, "position")?,
    })
}

/// Map a ride row. Passengers are filled in by the caller.
pub fn row_to_ride(row: &SqliteRow) -> Result<Ride, RepositoryError> {
    Ok(Ride {
        id: col(row, "id")?,
        event_id: col(row, "event_id")?,
        driver_id: col(row, "driver_id")?,
        seats: col(row, "seats")?,
        departure_location: col(row, "departure_location")?,
        departure_time: col(row, "departure_time")?,
        passengers: Vec::new(),
    })
}

pub fn row_to_withdrawal(row: &SqliteRow) -> Result<Withdrawal, RepositoryError> {
    Ok(Withdrawal {
        id: col(row, "id")?,
        user_id: col(row, "user_id")?,
        amount_cents: col(row, "amount_cents")?,
        payment_method: parse_column(row, "payment_method", PaymentMethod::parse)?,
        payment_details: col(row, "payment_details")?,
        status: parse_column(row, "status", WithdrawalStatus::parse)?,
        provider_reference: col(row, "provider_reference")?,
        created_at: col(row, "created_at")?,
    })
}

pub fn row_to_card(row: &SqliteRow) -> Result<Card, RepositoryError> {
    Ok(Card {
        id: col(row, "id")?,
        user_id: col(row, "user_id")?,
        provider_user_token: col(row, "provider_user_token")?,
        card_token: col(row, "card_token")?,
        last_four: col(row, "last_four")?,
        state: col(row, "state")?,
        created_at: col(row, "created_at")?,
    })
}
