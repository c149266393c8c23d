//! CLI bootstrap - the composition root for maintenance commands.
//!
//! `serve` bootstraps through `agora_axum::start_server`; the other commands
//! that need storage or providers are wired here.

use agora_clients::{ProviderSettings, build_providers};
use agora_core::services::{AppCore, CoreOptions};
use agora_core::{Providers, ResolvedPaths};
use agora_db::{CoreFactory, setup_database};
use anyhow::Result;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The core application facade.
    pub app: AppCore,
    /// Paths the context was opened with.
    pub paths: ResolvedPaths,
}

impl CliContext {
    /// Access the `AppCore`.
    pub const fn app(&self) -> &AppCore {
        &self.app
    }
}

/// Open the database and wire the core with whichever providers are configured.
pub async fn bootstrap() -> Result<CliContext> {
    let paths = ResolvedPaths::resolve()?;
    tracing::debug!(
        target: "agora.paths",
        database_path = %paths.database_path.display(),
        "CLI bootstrap resolved paths"
    );

    let pool = setup_database(&paths.database_path).await?;
    let app = CoreFactory::build_app_core(pool, providers_from_env()?, CoreOptions::default())?;
    Ok(CliContext { app, paths })
}

/// Provider ports built from the environment.
pub fn providers_from_env() -> Result<Providers> {
    Ok(build_providers(&ProviderSettings::from_env())?)
}
