//! Composition utilities for building `AppCore` with `SQLite` backends.
//!
//! This module provides factory functions for wiring up the application
//! with `SQLite` repositories. It is focused purely on construction and
//! should not contain any domain logic.

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use agora_core::{AppCore, CoreError, CoreOptions, Providers, Repos};

use crate::repositories::{
    SqliteBountyRepository, SqliteEventRepository, SqlitePayoutRepository,
    SqlitePictureRepository, SqliteProjectRepository, SqliteRideRepository,
    SqliteSessionRepository, SqliteSubmissionRepository, SqliteUserRepository,
};
use crate::setup::setup_database;

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Open (or create) the database file and apply the schema.
    pub async fn create_pool(db_path: &Path) -> anyhow::Result<SqlitePool> {
        setup_database(db_path).await
    }

    /// Build all `SQLite` repositories from a pool.
    ///
    /// Returns a `Repos` struct from `agora-core` containing trait-object-wrapped
    /// repositories.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            sessions: Arc::new(SqliteSessionRepository::new(pool.clone())),
            bounties: Arc::new(SqliteBountyRepository::new(pool.clone())),
            submissions: Arc::new(SqliteSubmissionRepository::new(pool.clone())),
            projects: Arc::new(SqliteProjectRepository::new(pool.clone())),
            pictures: Arc::new(SqlitePictureRepository::new(pool.clone())),
            events: Arc::new(SqliteEventRepository::new(pool.clone())),
            rides: Arc::new(SqliteRideRepository::new(pool.clone())),
            payouts: Arc::new(SqlitePayoutRepository::new(pool)),
        }
    }

    /// Build a complete `AppCore` from a pool and the provider ports.
    ///
    /// ```ignore
    /// let pool = setup_database(&db_path).await?;
    /// let core = CoreFactory::build_app_core(pool, providers, CoreOptions::default())?;
    /// ```
    pub fn build_app_core(
        pool: SqlitePool,
        providers: Providers,
        options: CoreOptions,
    ) -> Result<AppCore, CoreError> {
        AppCore::with_options(Self::build_repos(pool), providers, options)
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema applied.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }

    /// Build an `AppCore` over this database.
    pub fn app_core(&self, providers: Providers, options: CoreOptions) -> anyhow::Result<AppCore> {
        Ok(AppCore::with_options(self.repos(), providers, options)?)
    }
}
