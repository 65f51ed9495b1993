//! Error types for browser testing

use thiserror::Error;

use crate::page::PageState;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Playwright bridge error: {0}")]
    Playwright(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Element {selector} not interactable: {reason}")]
    ElementNotInteractable { selector: String, reason: String },

    #[error("Cannot {operation} while page is {state}")]
    InvalidPageState {
        operation: &'static str,
        state: PageState,
    },

    #[error("Browser session already closed")]
    SessionClosed,

    #[error("Test spec parse error: {0}")]
    SpecParse(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
