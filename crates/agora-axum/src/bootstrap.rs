//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use agora_clients::{ProviderSettings, build_providers};
use agora_core::services::{AppCore, CoreOptions, DEFAULT_SESSION_TTL_DAYS};
use agora_core::ResolvedPaths;
use agora_db::{CoreFactory, setup_database};
use anyhow::{Context, Result};
use chrono::Duration;

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "AGORA_PORT";

/// Port used when `AGORA_PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Lifetime of login sessions.
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            cors: CorsConfig::default(),
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }
}

impl ServerConfig {
    /// Create config from defaults, honouring `AGORA_PORT`.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            port: parse_port(std::env::var(PORT_ENV).ok())?,
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    fn core_options(&self) -> CoreOptions {
        CoreOptions {
            session_ttl: self.session_ttl,
            ..CoreOptions::default()
        }
    }
}

fn parse_port(value: Option<String>) -> Result<u16> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{PORT_ENV} must be a port number, got '{raw}'")),
    }
}

/// Application context for the Axum adapter.
///
/// This struct holds all initialized services for the web server.
pub struct AxumContext {
    /// The core application facade.
    pub core: Arc<AppCore>,
}

impl AxumContext {
    pub fn new(core: AppCore) -> Self {
        Self {
            core: Arc::new(core),
        }
    }
}

/// Bootstrap the Axum server with all services.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    // Log resolved paths at startup for diagnostics
    let paths = ResolvedPaths::resolve()?;
    tracing::info!(
        target: "agora.paths",
        database_path = %paths.database_path.display(),
        data_root = %paths.data_root.display(),
        "Axum bootstrap resolved paths"
    );

    // 1. Create database pool with full schema setup
    let pool = setup_database(&paths.database_path).await?;

    // 2. Third-party clients; missing credentials leave a provider unconfigured
    let settings = ProviderSettings::from_env();
    let providers = build_providers(&settings)?;

    // 3. Assemble AppCore
    let core = CoreFactory::build_app_core(pool, providers, config.core_options())?;

    // 4. Drop sessions that expired while the server was down
    match core.accounts().purge_expired_sessions().await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "Purged expired sessions"),
        Err(e) => tracing::warn!("Failed to purge expired sessions: {}", e),
    }

    Ok(AxumContext::new(core))
}

/// Start the web server on the specified port.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config).await?;

    // Choose router based on whether static serving is configured
    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    if config.static_dir.is_some() {
        info!("agora web server (with UI) listening on http://{}", addr);
    } else {
        info!("agora web server (API only) listening on http://{}", addr);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_when_unset_or_blank() {
        assert_eq!(parse_port(None).unwrap(), DEFAULT_PORT);
        assert_eq!(parse_port(Some("  ".to_string())).unwrap(), DEFAULT_PORT);
    }

    #[test]
    fn port_parses_override() {
        tokio_test::assert_ok!(parse_port(Some("9090".to_string())));
        assert_eq!(parse_port(Some(" 9090 ".to_string())).unwrap(), 9090);
    }

    #[test]
    fn invalid_port_is_an_error() {
        tokio_test::assert_err!(parse_port(Some("eighty".to_string())));
        tokio_test::assert_err!(parse_port(Some("70000".to_string())));
    }

    #[test]
    fn builders_compose() {
        let config = ServerConfig::default()
            .with_port(0)
            .with_static_dir("./dist")
            .with_allowed_origins(vec!["http://localhost:3000".to_string()])
            .with_session_ttl(Duration::hours(1));

        assert_eq!(config.port, 0);
        assert_eq!(config.static_dir, Some(PathBuf::from("./dist")));
        assert!(matches!(config.cors, CorsConfig::AllowOrigins(ref o) if o.len() == 1));
        assert_eq!(config.core_options().session_ttl, Duration::hours(1));
    }
}
