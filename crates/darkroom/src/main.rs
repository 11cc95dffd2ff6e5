//! Darkroom CLI - Image transformation pipeline driver.
//!
//! Darkroom takes an image plus a JSON list of transformation steps and
//! writes the transformed image. Steps run strictly in order against the
//! raster engine.
//!
//! # Usage
//!
//! ```bash
//! # Apply a step list to an image
//! darkroom transform photo.jpg out.jpg --steps '[{"operation":"sepia"}]'
//!
//! # List the supported operations
//! darkroom ops
//!
//! # View configuration
//! darkroom config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Darkroom - Image transformation pipeline.
#[derive(Parser, Debug)]
#[command(name = "darkroom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply a list of transformation steps to an image
    Transform(cli::transform::TransformArgs),

    /// List the registered operations
    Ops(cli::ops::OpsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match darkroom_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `darkroom config path`."
            );
            darkroom_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Darkroom v{}", darkroom_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Transform(args) => cli::transform::execute(args, config).await,
        Commands::Ops(args) => cli::ops::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
