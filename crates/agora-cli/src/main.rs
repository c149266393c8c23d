//! CLI entry point - the composition root.
//!
//! Loads `.env`, initializes logging and dispatches to the command handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use agora_cli::handlers::{self, serve::ServeArgs};
use agora_cli::{Cli, CliError, Commands, bootstrap};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let result: Result<(), CliError> = match command {
        Commands::Serve {
            port,
            static_dir,
            api_only,
            cors_origins,
            session_ttl_days,
        } => {
            let args = ServeArgs {
                port,
                static_dir,
                api_only,
                cors_origins,
                session_ttl_days,
            };
            handlers::serve::execute(args).await?;
            Ok(())
        }
        Commands::Identify { image, organ } => {
            let providers = bootstrap::providers_from_env()?;
            handlers::identify::execute(providers.identifier.as_ref(), &image, organ).await
        }
        Commands::ResetBounties { force } => {
            let ctx = bootstrap::bootstrap().await?;
            handlers::reset::execute(&ctx, force).await
        }
        Commands::Paths => {
            handlers::paths::execute()?;
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(exit_code(&e))
        }
    }
}

fn exit_code(err: &CliError) -> ExitCode {
    u8::try_from(err.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
