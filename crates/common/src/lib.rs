//! Probekit Common Library
//!
//! Domain types and configuration shared by the API harness, the browser
//! scenarios and the CLI.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiConfig, BrowserKind, HarnessConfig, ScenarioConfig, UiConfig, Viewport};
pub use error::{Error, Result};
pub use types::*;

/// Probekit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default location of the harness configuration file
pub fn default_config_path() -> std::path::PathBuf {
    std::path::PathBuf::from("probekit.toml")
}
