//! Browser commands for the text-box page

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::warn;

use probekit_common::{BrowserKind, FormField, FormSubmission, HarnessConfig, TextBoxInput};
use probekit_e2e::{BrowserSession, PlaywrightConfig, PlaywrightSession, TextBoxPage};

use crate::output::{print_error, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum UiCommands {
    /// Fill and submit the text-box form, then verify the rendered output
    TextBox(TextBoxArgs),
}

#[derive(Args)]
pub struct TextBoxArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub current_address: String,

    #[arg(long)]
    pub permanent_address: String,

    /// Override the configured page URL
    #[arg(long)]
    pub url: Option<String>,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<BrowserKind>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

#[derive(Serialize)]
struct FieldDisplay {
    field: String,
    entered: String,
    rendered: String,
    matched: bool,
}

impl FieldDisplay {
    fn rows(input: &TextBoxInput, submission: &FormSubmission) -> Vec<Self> {
        FormField::ALL
            .into_iter()
            .map(|field| Self {
                field: field.to_string(),
                entered: input.value(field).to_string(),
                rendered: submission.field(field).to_string(),
                matched: submission.contains_entry(field, input.value(field)),
            })
            .collect()
    }
}

impl TableDisplay for FieldDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Field", "Entered", "Rendered", "Match"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.field.clone(),
            self.entered.clone(),
            self.rendered.clone(),
            if self.matched { "✓" } else { "✗" }.to_string(),
        ]
    }
}

pub async fn execute(cmd: UiCommands, config: &HarnessConfig, format: OutputFormat) -> Result<()> {
    match cmd {
        UiCommands::TextBox(args) => text_box(args, config, format).await,
    }
}

async fn text_box(args: TextBoxArgs, config: &HarnessConfig, format: OutputFormat) -> Result<()> {
    let mut playwright = PlaywrightConfig::from_ui_config(&config.ui);
    if args.headed {
        playwright.headless = false;
    }
    if let Some(browser) = args.browser {
        playwright.browser = browser;
    }
    let url = args.url.unwrap_or_else(|| config.ui.target_url.clone());
    let input = TextBoxInput::new(
        args.name,
        args.email,
        args.current_address,
        args.permanent_address,
    );

    let mut session = PlaywrightSession::launch(&playwright).await?;
    let outcome = TextBoxPage::with_url(&mut session, url).submit(&input).await;
    if let Err(e) = session.close().await {
        warn!("Closing browser failed: {}", e);
    }
    let submission = outcome?;

    print_list(&FieldDisplay::rows(&input, &submission), format);

    let mismatches = submission.mismatches(&input);
    if !mismatches.is_empty() {
        let fields: Vec<String> = mismatches.iter().map(ToString::to_string).collect();
        print_error(&format!("Rendered output differs for: {}", fields.join(", ")));
        bail!("{} field(s) did not round-trip", mismatches.len());
    }

    print_success("Form submitted and rendered as entered");
    Ok(())
}
