//! Serve command handler.

use std::path::{Path, PathBuf};

use agora_axum::{ServerConfig, start_server};
use anyhow::Result;
use chrono::Duration;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub api_only: bool,
    pub cors_origins: Vec<String>,
    pub session_ttl_days: Option<i64>,
}

/// Frontend build locations tried when `--static-dir` is not given.
const STATIC_DIR_CANDIDATES: [&str; 3] = ["frontend/build", "frontend/dist", "dist"];

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = server_config(args, Path::new("."))?;

    if let Some(dir) = &config.static_dir {
        println!();
        println!("  agora server starting...");
        println!();
        println!("  Serving UI from: {}", dir.display());
        println!("  Local:   http://localhost:{}", config.port);
        println!("  Network: http://0.0.0.0:{}", config.port);
        println!();
        println!("  Press Ctrl+C to stop");
        println!();
    } else {
        println!();
        println!("  agora server starting (API only)...");
        println!();
        println!("  API:     http://localhost:{}/api", config.port);
        println!();
        println!("  Tip: Use --static-dir to serve a frontend build");
        println!();
    }

    start_server(config).await
}

/// Build the server config. Static dir: api-only flag > explicit flag > first
/// candidate under `root` containing `index.html`.
fn server_config(args: ServeArgs, root: &Path) -> Result<ServerConfig> {
    let mut config = ServerConfig::default().with_port(args.port);

    if !args.cors_origins.is_empty() {
        config = config.with_allowed_origins(args.cors_origins);
    }
    if let Some(ttl) = args.session_ttl_days {
        anyhow::ensure!(ttl > 0, "session TTL must be at least one day, got {ttl}");
        config = config.with_session_ttl(Duration::days(ttl));
    }

    if !args.api_only {
        let static_dir = args.static_dir.or_else(|| {
            STATIC_DIR_CANDIDATES
                .iter()
                .map(|candidate| root.join(candidate))
                .find(|path| path.join("index.html").exists())
        });
        if let Some(dir) = static_dir {
            config = config.with_static_dir(dir);
        }
    }

    Ok(config)
}
