//! Configuration commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use probekit_common::HarnessConfig;

use crate::output::{print_success, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Destination (defaults to the `--config` path)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn execute(cmd: ConfigCommands, config_path: &Path, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = HarnessConfig::load(config_path)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Table | OutputFormat::Plain => {
                    println!("# {}", config_path.display());
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
        }

        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or_else(|| config_path.to_path_buf());
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            HarnessConfig::default()
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            print_success(&format!("Wrote default configuration to {}", path.display()));
        }
    }

    Ok(())
}
