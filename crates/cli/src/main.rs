//! Probekit CLI - Main Entry Point
//!
//! Runs `/posts` contract calls, the text-box browser flow and declarative
//! YAML scenarios from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{api, config, scenarios, ui};
use probekit_common::HarnessConfig;

/// Probekit CLI - API contract checks and browser scenarios
#[derive(Parser)]
#[command(name = "probekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value_os_t = probekit_common::default_config_path(), global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the `/posts` REST resource
    Api(api::ApiArgs),

    /// Drive the text-box page in a real browser
    #[command(subcommand)]
    Ui(ui::UiCommands),

    /// Run declarative YAML scenarios
    #[command(subcommand)]
    Scenarios(scenarios::ScenarioCommands),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let load = || HarnessConfig::load(&cli.config);

    match cli.command {
        Commands::Api(args) => api::execute(args, &load()?, cli.format).await?,
        Commands::Ui(cmd) => ui::execute(cmd, &load()?, cli.format).await?,
        Commands::Scenarios(cmd) => scenarios::execute(cmd, &load()?, cli.format).await?,
        // Not loaded first so `config init` works while the current file is broken
        Commands::Config(cmd) => config::execute(cmd, &cli.config, cli.format)?,
        Commands::Version => {
            println!("Probekit CLI v{}", probekit_common::VERSION);
            println!("API contract checks and page-object browser scenarios");
        }
    }

    Ok(())
}
