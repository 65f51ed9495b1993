//! In-memory stand-in for the text-box page
//!
//! Behaves like the real form closely enough to run page-object and
//! scenario tests without a browser: inputs keep their values, submit
//! renders the labelled output paragraphs, an invalid email blocks the
//! submit, and anything else is reported the way a browser would.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use probekit_common::FormField;

use crate::error::{E2eError, E2eResult};
use crate::page::TEXT_BOX_URL;
use crate::session::{BrowserSession, SessionFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Input(FormField),
    Submit,
    Output(FormField),
}

fn resolve(selector: &str) -> Option<Element> {
    let element = match selector.trim() {
        "input#userName" | "#userName" => Element::Input(FormField::Name),
        "input#userEmail" | "#userEmail" => Element::Input(FormField::Email),
        // The textarea precedes the output paragraph in the DOM.
        "textarea#currentAddress" | "#currentAddress" => Element::Input(FormField::CurrentAddress),
        "textarea#permanentAddress" | "#permanentAddress" => {
            Element::Input(FormField::PermanentAddress)
        }
        "#submit" | "button#submit" => Element::Submit,
        "#name" | "p#name" => Element::Output(FormField::Name),
        "#email" | "p#email" => Element::Output(FormField::Email),
        "p#currentAddress" => Element::Output(FormField::CurrentAddress),
        "p#permanentAddress" => Element::Output(FormField::PermanentAddress),
        _ => return None,
    };
    Some(element)
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

pub struct TextBoxDouble {
    url: String,
    loaded: bool,
    closed: bool,
    inputs: HashMap<FormField, String>,
    outputs: HashMap<FormField, String>,
    closes: Option<Arc<AtomicUsize>>,
}

impl TextBoxDouble {
    pub fn new() -> Self {
        Self::serving(TEXT_BOX_URL)
    }

    /// A double answering only at `url`
    pub fn serving(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            loaded: false,
            closed: false,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            closes: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Current value of an input, as a browser would report it
    pub fn input_value(&self, field: FormField) -> Option<&str> {
        self.inputs.get(&field).map(String::as_str)
    }

    fn element(&self, selector: &str) -> E2eResult<Element> {
        if self.closed {
            return Err(E2eError::SessionClosed);
        }
        if !self.loaded {
            return Err(E2eError::ElementNotInteractable {
                selector: selector.to_string(),
                reason: "no page loaded".to_string(),
            });
        }
        resolve(selector).ok_or_else(|| E2eError::ElementNotInteractable {
            selector: selector.to_string(),
            reason: "no element matches selector".to_string(),
        })
    }

    fn submit(&mut self) {
        self.outputs.clear();
        let email = self.inputs.get(&FormField::Email).cloned().unwrap_or_default();
        if !email.is_empty() && !is_valid_email(&email) {
            debug!("double: rejecting invalid email {:?}", email);
            return;
        }
        for field in FormField::ALL {
            match self.inputs.get(&field) {
                Some(value) if !value.is_empty() => {
                    self.outputs
                        .insert(field, format!("{}{}", field.output_label(), value));
                }
                _ => {}
            }
        }
    }
}

impl Default for TextBoxDouble {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserSession for TextBoxDouble {
    async fn goto(&mut self, url: &str) -> E2eResult<()> {
        if self.closed {
            return Err(E2eError::SessionClosed);
        }
        if url.trim_end_matches('/') != self.url.trim_end_matches('/') {
            self.loaded = false;
            return Err(E2eError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.loaded = true;
        self.inputs.clear();
        self.outputs.clear();
        Ok(())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> E2eResult<()> {
        match self.element(selector)? {
            Element::Input(field) => {
                self.inputs.insert(field, value.to_string());
                Ok(())
            }
            _ => Err(E2eError::ElementNotInteractable {
                selector: selector.to_string(),
                reason: "element is not an <input>, <textarea> or [contenteditable]".to_string(),
            }),
        }
    }

    async fn click(&mut self, selector: &str) -> E2eResult<()> {
        if let Element::Submit = self.element(selector)? {
            self.submit();
        }
        Ok(())
    }

    async fn text_content(&mut self, selector: &str) -> E2eResult<Option<String>> {
        match self.element(selector)? {
            Element::Output(field) => match self.outputs.get(&field) {
                Some(text) => Ok(Some(text.clone())),
                None => Err(E2eError::ElementNotInteractable {
                    selector: selector.to_string(),
                    reason: "element is not attached".to_string(),
                }),
            },
            Element::Submit => Ok(Some("Submit".to_string())),
            Element::Input(_) => Ok(Some(String::new())),
        }
    }

    async fn close(&mut self) -> E2eResult<()> {
        if !self.closed {
            self.closed = true;
            if let Some(closes) = &self.closes {
                closes.fetch_add(1, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

/// Hands out fresh doubles and counts how many were opened and closed
#[derive(Clone)]
pub struct TextBoxDoubleFactory {
    url: String,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl TextBoxDoubleFactory {
    pub fn new() -> Self {
        Self::serving(TEXT_BOX_URL)
    }

    pub fn serving(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for TextBoxDoubleFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionFactory for TextBoxDoubleFactory {
    type Session = TextBoxDouble;

    async fn open(&self) -> E2eResult<TextBoxDouble> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let mut double = TextBoxDouble::serving(self.url.clone());
        double.closes = Some(Arc::clone(&self.closed));
        Ok(double)
    }
}
