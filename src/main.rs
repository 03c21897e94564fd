//! Chatkeep - chat with a generative model, keep every conversation
//!
#![doc = "Main entry point for the Chatkeep application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatkeep::cli::{Cli, Commands};
use chatkeep::commands;
use chatkeep::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { session } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(s) = &session {
                tracing::debug!("Opening session: {}", s);
            }
            commands::chat::run_chat(config, session).await?;
            Ok(())
        }
        Commands::Send { session, text } => {
            tracing::info!("Sending one-shot message");
            commands::send::run_send(config, session, text.join(" ")).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::debug!("Running session command: {:?}", command);
            commands::sessions::handle_sessions(&config, command)?;
            Ok(())
        }
        Commands::Export { output } => {
            tracing::info!("Exporting sessions to {}", output.display());
            commands::transfer::run_export(&config, &output)?;
            Ok(())
        }
        Commands::Import { path } => {
            tracing::info!("Importing sessions from {}", path.display());
            commands::transfer::run_import(&config, &path)?;
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug level.
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "chatkeep=debug" } else { "chatkeep=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
