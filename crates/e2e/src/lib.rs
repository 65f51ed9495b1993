//! Probekit browser testing
//!
//! This crate provides:
//! - A `BrowserSession` capability (navigate, fill, click, read text)
//! - A Playwright-backed session hosted in a long-lived `node` bridge
//! - An in-memory double of the text-box page for browserless tests
//! - The `TextBoxPage` page object with explicit page state
//! - Declarative YAML scenarios and a sequential runner
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TestRunner<F: SessionFactory>                              │
//! │    ├── open() -> BrowserSession    (one per scenario)       │
//! │    ├── execute_step(step) -> StepResult                     │
//! │    └── close()                     (on every exit path)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── fill { selector, value }                       │
//! │          ├── click { selector }                             │
//! │          ├── assert_text { selector, contains?, equals? }   │
//! │          └── log { message }                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TextBoxPage<S: BrowserSession>                             │
//! │    Unloaded ──navigate──> Loaded ──click_submit──> Submitted│
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod double;
pub mod error;
pub mod page;
pub mod playwright;
pub mod runner;
pub mod session;
pub mod spec;

pub use double::{TextBoxDouble, TextBoxDoubleFactory};
pub use error::{E2eError, E2eResult};
pub use page::{PageState, TextBoxPage};
pub use playwright::{PlaywrightConfig, PlaywrightLauncher, PlaywrightSession};
pub use runner::TestRunner;
pub use session::{BrowserSession, SessionFactory};
pub use spec::{TestSpec, TestStep};
