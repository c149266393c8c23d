//! `SQLite` persistence for Agora.
//!
//! Implements every repository port of `agora-core` on top of a single
//! `sqlx` pool and owns the schema.

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::CoreFactory;

#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;

pub use repositories::{
    SqliteBountyRepository, SqliteEventRepository, SqlitePayoutRepository,
    SqlitePictureRepository, SqliteProjectRepository, SqliteRideRepository,
    SqliteSessionRepository, SqliteSubmissionRepository, SqliteUserRepository,
};

pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
