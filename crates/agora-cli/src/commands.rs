//! Subcommands of the `agora` binary.

use std::path::PathBuf;

use agora_core::domain::Organ;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(
            short,
            long,
            env = "AGORA_PORT",
            default_value_t = agora_axum::bootstrap::DEFAULT_PORT
        )]
        port: u16,
        /// Directory with a built frontend to serve alongside the API
        #[arg(long, env = "AGORA_STATIC_DIR")]
        static_dir: Option<PathBuf>,
        /// Serve only the API, even if a frontend build is found
        #[arg(long)]
        api_only: bool,
        /// Allowed CORS origin (repeatable). Every origin is allowed when omitted
        #[arg(long = "cors-origin", env = "AGORA_CORS_ORIGINS", value_delimiter = ',')]
        cors_origins: Vec<String>,
        /// Session lifetime in days
        #[arg(long, env = "AGORA_SESSION_TTL_DAYS")]
        session_ttl_days: Option<i64>,
    },

    /// Identify a plant photo with PlantNet and print the result as JSON
    Identify {
        /// Path to the image file
        image: PathBuf,
        /// Organ shown in the photo: auto, flower, leaf, fruit or bark
        #[arg(long, default_value = "auto", value_parser = parse_organ)]
        organ: Organ,
    },

    /// Delete every bounty and its submissions
    ResetBounties {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show resolved data directory and database path
    Paths,
}

fn parse_organ(raw: &str) -> Result<Organ, String> {
    Organ::parse(raw).ok_or_else(|| format!("unknown organ '{raw}'"))
}

#[cfg(test)]
mod tests {
    use crate::Cli;
    use crate::commands::Commands;
    use agora_core::domain::Organ;
    use clap::Parser;

    #[test]
    fn test_serve_collects_cors_origins() {
        let cli = Cli::parse_from([
            "agora",
            "serve",
            "--port",
            "9000",
            "--cors-origin",
            "http://localhost:3000",
            "--cors-origin",
            "https://agora.example",
        ]);
        let Some(Commands::Serve {
            port, cors_origins, ..
        }) = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(port, 9000);
        assert_eq!(
            cors_origins,
            vec!["http://localhost:3000", "https://agora.example"]
        );
    }

    #[test]
    fn test_identify_parses_organ() {
        let cli = Cli::parse_from(["agora", "identify", "leaf.jpg", "--organ", "Flower"]);
        let Some(Commands::Identify { image, organ }) = cli.command else {
            panic!("expected identify");
        };
        assert_eq!(image.to_str(), Some("leaf.jpg"));
        assert_eq!(organ, Organ::Flower);
    }

    #[test]
    fn test_identify_rejects_unknown_organ() {
        assert!(Cli::try_parse_from(["agora", "identify", "x.jpg", "--organ", "root"]).is_err());
    }

    #[test]
    fn test_reset_bounties_force_flag() {
        let cli = Cli::parse_from(["agora", "reset-bounties", "-f"]);
        assert!(matches!(
            cli.command,
            Some(Commands::ResetBounties { force: true })
        ));
    }
}
