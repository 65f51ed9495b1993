//! Sequential scenario runner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use probekit_common::ScenarioConfig;

use crate::error::{E2eError, E2eResult};
use crate::session::{BrowserSession, SessionFactory};
use crate::spec::{TestSpec, TestStep};

/// Result of executing a test step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

impl TestResult {
    fn failed(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration_ms: 0,
            steps: vec![],
            error: Some(error),
        }
    }
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Prefix for relative `navigate` URLs
    pub base_url: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_scenario_config(&ScenarioConfig::default())
    }
}

impl RunnerConfig {
    pub fn from_scenario_config(config: &ScenarioConfig) -> Self {
        Self {
            specs_dir: config.dir.clone(),
            output_dir: config.output_dir.clone(),
            base_url: None,
        }
    }
}

/// Runs scenarios one after another, each in its own browser session
pub struct TestRunner<F> {
    factory: F,
    config: RunnerConfig,
}

impl<F: SessionFactory> TestRunner<F> {
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, RunnerConfig::default())
    }

    pub fn with_config(factory: F, config: RunnerConfig) -> Self {
        Self { factory, config }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run all tests in the specs directory
    pub async fn run_all(&self) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.config.specs_dir)?;
        Ok(self.run_specs(&specs).await)
    }

    /// Run tests matching a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.config.specs_dir)?;
        let filtered: Vec<TestSpec> = TestSpec::filter_by_tag(&specs, tag)
            .into_iter()
            .cloned()
            .collect();
        Ok(self.run_specs(&filtered).await)
    }

    /// Run a specific test by name
    pub async fn run_test(&self, name: &str) -> E2eResult<TestResult> {
        let specs = TestSpec::load_all(&self.config.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Test not found: {}", name)))?;

        Ok(self.run_spec(&spec).await)
    }

    /// Run a list of test specs
    pub async fn run_specs(&self, specs: &[TestSpec]) -> TestSuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} test(s)...", specs.len());

        for spec in specs {
            let result = self.run_spec(spec).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        TestSuiteResult {
            started_at,
            total: specs.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Run a single test spec. The session is closed whatever the outcome.
    pub async fn run_spec(&self, spec: &TestSpec) -> TestResult {
        let start = Instant::now();
        debug!("Running test: {}", spec.name);

        let mut session = match self.factory.open().await {
            Ok(session) => session,
            Err(e) => return TestResult::failed(&spec.name, format!("session: {}", e)),
        };

        let mut step_results = Vec::new();
        let mut test_error: Option<String> = None;

        for step in &spec.steps {
            let result = execute_step(&mut session, step, self.config.base_url.as_deref()).await;
            if !result.success {
                test_error = result.error.clone();
                step_results.push(result);
                break; // Stop on first failure
            }
            step_results.push(result);
        }

        if let Err(e) = session.close().await {
            warn!("Closing session for '{}' failed: {}", spec.name, e);
            if test_error.is_none() {
                test_error = Some(format!("close: {}", e));
            }
        }

        TestResult {
            name: spec.name.clone(),
            success: test_error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps: step_results,
            error: test_error,
        }
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        write_results(&self.config.output_dir, results)
    }
}

/// Write `results` to `<output_dir>/test-results.json`
pub fn write_results(output_dir: &Path, results: &TestSuiteResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

fn resolve_url(url: &str, base_url: Option<&str>) -> String {
    let absolute = url.contains("://") || url.starts_with("data:") || url.starts_with("about:");
    match base_url {
        Some(base) if !absolute => {
            format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
        }
        _ => url.to_string(),
    }
}

/// Execute a single test step against `session`
pub async fn execute_step<S: BrowserSession + ?Sized>(
    session: &mut S,
    step: &TestStep,
    base_url: Option<&str>,
) -> StepResult {
    let start = Instant::now();
    let step_name = step.name();

    debug!("Executing step: {}", step_name);

    let result = match step {
        TestStep::Navigate { url } => session.goto(&resolve_url(url, base_url)).await,
        TestStep::Fill { selector, value } => session.fill(selector, value).await,
        TestStep::Click { selector } => session.click(selector).await,
        TestStep::AssertText { selector, contains, equals } => {
            assert_text(session, selector, contains.as_deref(), equals.as_deref()).await
        }
        TestStep::Log { message } => {
            info!("[TEST LOG] {}", message);
            Ok(())
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => StepResult {
            success: true,
            step_name,
            duration_ms,
            error: None,
        },
        Err(e) => StepResult {
            success: false,
            step_name,
            duration_ms,
            error: Some(e.to_string()),
        },
    }
}

async fn assert_text<S: BrowserSession + ?Sized>(
    session: &mut S,
    selector: &str,
    contains: Option<&str>,
    equals: Option<&str>,
) -> E2eResult<()> {
    let text = session.text_content(selector).await?.unwrap_or_default();

    if let Some(expected) = equals {
        if text != expected {
            return Err(E2eError::AssertionFailed(format!(
                "{}: expected {:?}, got {:?}",
                selector, expected, text
            )));
        }
    }
    if let Some(needle) = contains {
        if !text.contains(needle) {
            return Err(E2eError::AssertionFailed(format!(
                "{}: {:?} does not contain {:?}",
                selector, text, needle
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/text-box", Some("https://demoqa.com"), "https://demoqa.com/text-box")]
    #[test_case("text-box", Some("https://demoqa.com/"), "https://demoqa.com/text-box")]
    #[test_case(
        "https://demoqa.com/text-box",
        Some("http://localhost"),
        "https://demoqa.com/text-box"
    )]
    #[test_case("/text-box", None, "/text-box")]
    fn test_resolve_url(url: &str, base: Option<&str>, expected: &str) {
        assert_eq!(resolve_url(url, base), expected);
    }
}
