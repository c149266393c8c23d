//! Database setup and initialization.
//!
//! This module provides the `setup_database()` function for initializing
//! the `SQLite` database with full schema. Entry points call this with the
//! resolved database path.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Sets up the `SQLite` database connection and ensures the schema exists.
///
/// The file and its parent directory are created if missing. Foreign keys
/// are enforced and the journal runs in WAL mode.
///
/// # Example
///
/// ```rust,no_run
/// use agora_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/path/to/agora.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    tracing::debug!(path = %db_path.display(), "Database ready");

    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// A single connection keeps every query on the same in-memory database.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Creates the complete database schema.
///
/// Safe to call multiple times as all statements use IF NOT EXISTS.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        name TEXT,
        email TEXT,
        expertise TEXT NOT NULL DEFAULT '[]',
        earnings_cents INTEGER NOT NULL DEFAULT 0 CHECK (earnings_cents >= 0),
        total_approved_submissions INTEGER NOT NULL DEFAULT 0,
        is_verified_org INTEGER NOT NULL DEFAULT 0,
        organization_name TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at)",
    r"
    CREATE TABLE IF NOT EXISTS bounties (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        creator_id INTEGER NOT NULL REFERENCES users(id),
        title TEXT NOT NULL,
        description TEXT,
        plant_species TEXT NOT NULL,
        reward_cents INTEGER NOT NULL CHECK (reward_cents >= 0),
        num_submissions_needed INTEGER NOT NULL CHECK (num_submissions_needed >= 1),
        current_submissions INTEGER NOT NULL DEFAULT 0,
        additional_notes TEXT,
        status TEXT NOT NULL DEFAULT 'open'
            CHECK (status IN ('open', 'completed', 'closed')),
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_bounties_status ON bounties(status)",
    "CREATE INDEX IF NOT EXISTS idx_bounties_creator ON bounties(creator_id)",
    r"
    CREATE TABLE IF NOT EXISTS submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        bounty_id INTEGER NOT NULL REFERENCES bounties(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id),
        image_base64 TEXT NOT NULL,
        submission_type TEXT NOT NULL CHECK (submission_type IN ('research', 'removal')),
        submitter_note TEXT,
        latitude REAL,
        longitude REAL,
        species TEXT NOT NULL,
        scientific_name TEXT,
        confidence REAL NOT NULL DEFAULT 0,
        common_names TEXT NOT NULL DEFAULT '[]',
        status TEXT NOT NULL DEFAULT 'pending_verification'
            CHECK (status IN ('pending_verification', 'approved', 'rejected')),
        verified_by INTEGER REFERENCES users(id),
        submitted_at TEXT NOT NULL,
        verified_at TEXT
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_submissions_bounty ON submissions(bounty_id)",
    "CREATE INDEX IF NOT EXISTS idx_submissions_user ON submissions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_submissions_status ON submissions(status)",
    r"
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_by INTEGER NOT NULL REFERENCES users(id),
        title TEXT NOT NULL,
        description TEXT,
        plant_type TEXT NOT NULL,
        action_type TEXT NOT NULL CHECK (action_type IN ('research', 'removal')),
        data_needed TEXT,
        purpose TEXT,
        location_name TEXT,
        latitude REAL,
        longitude REAL,
        submissions_needed INTEGER NOT NULL CHECK (submissions_needed >= 1),
        submissions_completed INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed')),
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status)",
    "CREATE INDEX IF NOT EXISTS idx_projects_created_by ON projects(created_by)",
    "CREATE INDEX IF NOT EXISTS idx_projects_plant_type ON projects(plant_type)",
    r"
    CREATE TABLE IF NOT EXISTS project_contributors (
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        joined_at TEXT NOT NULL,
        PRIMARY KEY (project_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS pictures (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id),
        image_base64 TEXT NOT NULL,
        latitude REAL,
        longitude REAL,
        species TEXT,
        scientific_name TEXT,
        confidence REAL,
        common_names TEXT,
        is_match INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        uploaded_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_pictures_project ON pictures(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_pictures_user ON pictures(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_pictures_is_match ON pictures(is_match)",
    r"
    CREATE TABLE IF NOT EXISTS collection_locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        description TEXT,
        added_by INTEGER NOT NULL REFERENCES users(id),
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_locations_project ON collection_locations(project_id)",
    r"
    CREATE TABLE IF NOT EXISTS project_messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id),
        content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_messages_project ON project_messages(project_id)",
    r"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_by INTEGER NOT NULL REFERENCES users(id),
        title TEXT NOT NULL,
        project_id INTEGER REFERENCES projects(id) ON DELETE SET NULL,
        location TEXT,
        date TEXT,
        time_range TEXT,
        is_time_fixed INTEGER NOT NULL DEFAULT 0,
        is_location_fixed INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS event_attendees (
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        joined_at TEXT NOT NULL,
        PRIMARY KEY (event_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS poll_options (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        kind TEXT NOT NULL CHECK (kind IN ('time_slot', 'location')),
        label TEXT NOT NULL,
        proposed_by INTEGER NOT NULL REFERENCES users(id),
        position INTEGER NOT NULL,
        UNIQUE (event_id, kind, position)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS poll_votes (
        option_id INTEGER NOT NULL REFERENCES poll_options(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (option_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS rides (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        driver_id INTEGER NOT NULL REFERENCES users(id),
        seats INTEGER NOT NULL CHECK (seats >= 1),
        departure_location TEXT NOT NULL,
        departure_time TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ride_passengers (
        ride_id INTEGER NOT NULL REFERENCES rides(id) ON DELETE CASCADE,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        joined_at TEXT NOT NULL,
        PRIMARY KEY (ride_id, user_id),
        UNIQUE (event_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS withdrawals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
        payment_method TEXT NOT NULL CHECK (payment_method IN ('stripe', 'paypal', 'bank')),
        payment_details TEXT,
        status TEXT NOT NULL CHECK (status IN ('pending', 'processing', 'completed')),
        provider_reference TEXT,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_withdrawals_user ON withdrawals(user_id)",
    r"
    CREATE TABLE IF NOT EXISTS cardholders (
        user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        token TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        provider_user_token TEXT NOT NULL,
        card_token TEXT NOT NULL UNIQUE,
        last_four TEXT NOT NULL,
        state TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_creates_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("agora.db");

        let pool = setup_database(&path).await.unwrap();
        assert!(path.exists());
        create_schema(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 17);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = setup_test_database().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ('t', 999, 'x', 'y')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
