//! Page object for the text-box form

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use probekit_common::{FormField, FormSubmission, TextBoxInput};

use crate::error::{E2eError, E2eResult};
use crate::session::BrowserSession;

pub const TEXT_BOX_URL: &str = "https://demoqa.com/text-box";

/// Selectors of the text-box page
pub mod selectors {
    use probekit_common::FormField;

    pub const FULL_NAME_INPUT: &str = "input#userName";
    pub const EMAIL_INPUT: &str = "input#userEmail";
    pub const CURRENT_ADDRESS_INPUT: &str = "textarea#currentAddress";
    pub const PERMANENT_ADDRESS_INPUT: &str = "textarea#permanentAddress";
    pub const SUBMIT_BUTTON: &str = "#submit";
    pub const OUTPUT_NAME: &str = "#name";
    pub const OUTPUT_EMAIL: &str = "#email";
    pub const OUTPUT_CURRENT_ADDRESS: &str = "p#currentAddress";
    pub const OUTPUT_PERMANENT_ADDRESS: &str = "p#permanentAddress";

    pub fn input(field: FormField) -> &'static str {
        match field {
            FormField::Name => FULL_NAME_INPUT,
            FormField::Email => EMAIL_INPUT,
            FormField::CurrentAddress => CURRENT_ADDRESS_INPUT,
            FormField::PermanentAddress => PERMANENT_ADDRESS_INPUT,
        }
    }

    pub fn output(field: FormField) -> &'static str {
        match field {
            FormField::Name => OUTPUT_NAME,
            FormField::Email => OUTPUT_EMAIL,
            FormField::CurrentAddress => OUTPUT_CURRENT_ADDRESS,
            FormField::PermanentAddress => OUTPUT_PERMANENT_ADDRESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    Unloaded,
    Loaded,
    Submitted,
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageState::Unloaded => write!(f, "unloaded"),
            PageState::Loaded => write!(f, "loaded"),
            PageState::Submitted => write!(f, "submitted"),
        }
    }
}

/// The text-box form behind semantic operations.
///
/// Field entry and submit need a loaded page; reading the submitted data
/// needs a submit first. Navigating again starts over from `Loaded`.
pub struct TextBoxPage<'s, S: BrowserSession + ?Sized> {
    session: &'s mut S,
    url: String,
    state: PageState,
}

impl<'s, S: BrowserSession + ?Sized> TextBoxPage<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self::with_url(session, TEXT_BOX_URL)
    }

    /// Point the page object at a different deployment of the same form
    pub fn with_url(session: &'s mut S, url: impl Into<String>) -> Self {
        Self {
            session,
            url: url.into(),
            state: PageState::Unloaded,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn navigate(&mut self) -> E2eResult<()> {
        info!("Navigating to {}", self.url);
        self.state = PageState::Unloaded;
        self.session.goto(&self.url).await?;
        self.state = PageState::Loaded;
        Ok(())
    }

    pub async fn enter_full_name(&mut self, full_name: &str) -> E2eResult<()> {
        self.enter(FormField::Name, full_name).await
    }

    pub async fn enter_email(&mut self, email: &str) -> E2eResult<()> {
        self.enter(FormField::Email, email).await
    }

    pub async fn enter_current_address(&mut self, current_address: &str) -> E2eResult<()> {
        self.enter(FormField::CurrentAddress, current_address).await
    }

    pub async fn enter_permanent_address(&mut self, permanent_address: &str) -> E2eResult<()> {
        self.enter(FormField::PermanentAddress, permanent_address).await
    }

    /// Enter all four fields in page order
    pub async fn fill_form(&mut self, input: &TextBoxInput) -> E2eResult<()> {
        for field in FormField::ALL {
            self.enter(field, input.value(field)).await?;
        }
        Ok(())
    }

    pub async fn click_submit(&mut self) -> E2eResult<()> {
        self.require_loaded("click submit")?;
        self.session.click(selectors::SUBMIT_BUTTON).await?;
        self.state = PageState::Submitted;
        Ok(())
    }

    pub async fn get_submitted_form_data(&mut self) -> E2eResult<FormSubmission> {
        if self.state != PageState::Submitted {
            return Err(E2eError::InvalidPageState {
                operation: "read submitted form data",
                state: self.state,
            });
        }
        let mut submission = FormSubmission::default();
        for field in FormField::ALL {
            let text = self
                .session
                .text_content(selectors::output(field))
                .await?
                .unwrap_or_default();
            submission.set_field(field, text);
        }
        Ok(submission)
    }

    /// Navigate, fill, submit and read back in one go
    pub async fn submit(&mut self, input: &TextBoxInput) -> E2eResult<FormSubmission> {
        self.navigate().await?;
        self.fill_form(input).await?;
        self.click_submit().await?;
        self.get_submitted_form_data().await
    }

    async fn enter(&mut self, field: FormField, value: &str) -> E2eResult<()> {
        self.require_loaded("enter form data")?;
        debug!("Entering {}", field);
        self.session.fill(selectors::input(field), value).await
    }

    fn require_loaded(&self, operation: &'static str) -> E2eResult<()> {
        match self.state {
            PageState::Unloaded => Err(E2eError::InvalidPageState {
                operation,
                state: self.state,
            }),
            PageState::Loaded | PageState::Submitted => Ok(()),
        }
    }
}
