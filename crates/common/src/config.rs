//! Harness configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};

/// Top-level harness configuration, usually read from `probekit.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// REST API settings
    pub api: ApiConfig,

    /// Browser settings
    pub ui: UiConfig,

    /// Declarative scenario settings
    pub scenarios: ScenarioConfig,
}

/// REST API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/posts` resource hangs off
    pub base_url: String,

    /// Per-call timeout; `None` waits indefinitely
    pub timeout_ms: Option<u64>,

    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            base_url: "http://jsonplaceholder.typicode.com".to_string(),
            timeout_ms: Some(10_000),
            headers,
        }
    }
}

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Page the text-box page object drives
    pub target_url: String,

    pub browser: BrowserKind,

    pub headless: bool,

    /// Timeout applied to each browser action
    pub action_timeout_ms: u64,

    /// Node executable used to host the Playwright bridge
    pub node_binary: PathBuf,

    pub viewport: Viewport,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            target_url: "https://demoqa.com/text-box".to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            action_timeout_ms: 5000,
            node_binary: PathBuf::from("node"),
            viewport: Viewport::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

/// Declarative scenario configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Directory searched for `*.yaml` / `*.yml` scenarios
    pub dir: PathBuf,

    /// Directory results are written to
    pub output_dir: PathBuf,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tests/scenarios"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("api.base_url must not be empty".to_string()));
        }
        if self.ui.target_url.trim().is_empty() {
            return Err(Error::InvalidConfig("ui.target_url must not be empty".to_string()));
        }
        if self.api.timeout_ms == Some(0) {
            return Err(Error::InvalidConfig("api.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.api.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_save_then_load_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/probekit.toml");
        HarnessConfig::default().save(&path).unwrap();
        assert_eq!(HarnessConfig::load(&path).unwrap(), HarnessConfig::default());

        std::fs::write(&path, "[ui]\nheadless = false\nbrowser = \"firefox\"\n").unwrap();
        let config = HarnessConfig::load(&path).unwrap();
        assert!(!config.ui.headless);
        assert_eq!(config.ui.browser, BrowserKind::Firefox);
        assert_eq!(config.ui.target_url, "https://demoqa.com/text-box");
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probekit.toml");
        std::fs::write(&path, "[api]\ntimeout_ms = 0\n").unwrap();
        assert!(matches!(HarnessConfig::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test_case("chromium", BrowserKind::Chromium)]
    #[test_case("Firefox", BrowserKind::Firefox)]
    #[test_case("safari", BrowserKind::Webkit)]
    fn test_browser_from_str(input: &str, expected: BrowserKind) {
        assert_eq!(input.parse::<BrowserKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_browser() {
        assert!("lynx".parse::<BrowserKind>().is_err());
    }
}
