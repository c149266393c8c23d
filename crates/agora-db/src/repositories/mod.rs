//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_bounty_repository;
mod sqlite_event_repository;
mod sqlite_payout_repository;
mod sqlite_picture_repository;
mod sqlite_project_repository;
mod sqlite_ride_repository;
mod sqlite_session_repository;
mod sqlite_submission_repository;
mod sqlite_user_repository;

#[cfg(test)]
mod test_support;

pub use sqlite_bounty_repository::SqliteBountyRepository;
pub use sqlite_event_repository::SqliteEventRepository;
pub use sqlite_payout_repository::SqlitePayoutRepository;
pub use sqlite_picture_repository::SqlitePictureRepository;
pub use sqlite_project_repository::SqliteProjectRepository;
pub use sqlite_ride_repository::SqliteRideRepository;
pub use sqlite_session_repository::SqliteSessionRepository;
pub use sqlite_submission_repository::SqliteSubmissionRepository;
pub use sqlite_user_repository::SqliteUserRepository;
