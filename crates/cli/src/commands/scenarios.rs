//! Declarative scenario commands

use anyhow::{bail, Result};
use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;

use probekit_common::HarnessConfig;
use probekit_e2e::runner::{RunnerConfig, TestResult};
use probekit_e2e::{PlaywrightConfig, PlaywrightLauncher, TestRunner, TestSpec};

use crate::output::{print_error, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// Run scenarios, each in a fresh browser session
    Run {
        /// Directory containing YAML scenarios
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Only run scenarios carrying this tag
        #[arg(long, conflicts_with = "name")]
        tag: Option<String>,

        /// Only run the scenario with this name
        #[arg(long)]
        name: Option<String>,

        /// Directory for `test-results.json`
        #[arg(long)]
        output: Option<PathBuf>,

        /// Prefix for relative `navigate` URLs
        #[arg(long)]
        base_url: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },

    /// List scenarios without running them
    List {
        /// Directory containing YAML scenarios
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Only list scenarios carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(Serialize)]
struct ResultDisplay {
    name: String,
    passed: bool,
    steps: usize,
    duration_ms: u64,
    error: Option<String>,
}

impl From<&TestResult> for ResultDisplay {
    fn from(result: &TestResult) -> Self {
        Self {
            name: result.name.clone(),
            passed: result.success,
            steps: result.steps.len(),
            duration_ms: result.duration_ms,
            error: result.error.clone(),
        }
    }
}

impl TableDisplay for ResultDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Scenario", "Result", "Steps", "Duration", "Error"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            if self.passed { "✓ pass" } else { "✗ fail" }.to_string(),
            self.steps.to_string(),
            format!("{} ms", self.duration_ms),
            self.error.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }
}

#[derive(Serialize)]
struct SpecDisplay {
    name: String,
    description: String,
    tags: Vec<String>,
    steps: usize,
}

impl TableDisplay for SpecDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Description", "Tags", "Steps"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.tags.join(", "),
            self.steps.to_string(),
        ]
    }
}

pub async fn execute(
    cmd: ScenarioCommands,
    config: &HarnessConfig,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ScenarioCommands::Run {
            dir,
            tag,
            name,
            output,
            base_url,
            headed,
        } => {
            let mut runner_config = RunnerConfig::from_scenario_config(&config.scenarios);
            if let Some(dir) = dir {
                runner_config.specs_dir = dir;
            }
            if let Some(output) = output {
                runner_config.output_dir = output;
            }
            runner_config.base_url = base_url;

            let mut playwright = PlaywrightConfig::from_ui_config(&config.ui);
            if headed {
                playwright.headless = false;
            }

            let specs_dir = runner_config.specs_dir.clone();
            let runner =
                TestRunner::with_config(PlaywrightLauncher::new(playwright), runner_config);
            let results = match (tag, name) {
                (_, Some(name)) => {
                    let specs: Vec<TestSpec> = TestSpec::load_all(&specs_dir)?
                        .into_iter()
                        .filter(|spec| spec.name == name)
                        .collect();
                    if specs.is_empty() {
                        bail!("no scenario named '{}' in {}", name, specs_dir.display());
                    }
                    runner.run_specs(&specs).await
                }
                (Some(tag), None) => runner.run_tagged(&tag).await?,
                (None, None) => runner.run_all().await?,
            };
            let path = runner.write_results(&results)?;

            let rows: Vec<ResultDisplay> = results.results.iter().map(Into::into).collect();
            print_list(&rows, format);

            if !results.success() {
                print_error(&format!(
                    "{} of {} scenario(s) failed, see {}",
                    results.failed,
                    results.total,
                    path.display()
                ));
                bail!("scenario run failed");
            }
            print_success(&format!(
                "{} scenario(s) passed in {} ms",
                results.passed, results.duration_ms
            ));
        }

        ScenarioCommands::List { dir, tag } => {
            let dir = dir.unwrap_or_else(|| config.scenarios.dir.clone());
            let specs = TestSpec::load_all(&dir)?;
            let selected: Vec<&TestSpec> = match &tag {
                Some(tag) => TestSpec::filter_by_tag(&specs, tag),
                None => specs.iter().collect(),
            };

            let rows: Vec<SpecDisplay> = selected
                .into_iter()
                .map(|spec| SpecDisplay {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    tags: spec.tags.clone(),
                    steps: spec.steps.len(),
                })
                .collect();
            print_list(&rows, format);
        }
    }

    Ok(())
}
