//! Declarative YAML test specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use probekit_common::{FormField, TextBoxInput};

use crate::error::{E2eError, E2eResult};
use crate::page::selectors;

/// A complete test specification parsed from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    /// Unique name for this test
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

/// A single step in a test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (absolute, or relative to the runner's base URL)
    Navigate { url: String },

    /// Fill an input field
    Fill { selector: String, value: String },

    /// Click an element
    Click { selector: String },

    /// Assert on an element's text content
    AssertText {
        selector: String,
        #[serde(default)]
        contains: Option<String>,
        #[serde(default)]
        equals: Option<String>,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

impl TestStep {
    /// Short label used in logs and results
    pub fn name(&self) -> String {
        match self {
            TestStep::Navigate { url } => format!("navigate:{}", url),
            TestStep::Fill { selector, .. } => format!("fill:{}", selector),
            TestStep::Click { selector } => format!("click:{}", selector),
            TestStep::AssertText { selector, .. } => format!("assert_text:{}", selector),
            TestStep::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl TestSpec {
    /// Parse a test spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse a test spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all test specs from a directory, in path order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }

    fn validate(&self) -> E2eResult<()> {
        if self.name.trim().is_empty() {
            return Err(E2eError::SpecParse("test name must not be empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(E2eError::SpecParse(format!("test '{}' has no steps", self.name)));
        }
        for step in &self.steps {
            if let TestStep::AssertText { contains: None, equals: None, .. } = step {
                return Err(E2eError::SpecParse(format!(
                    "{} in '{}' needs `contains` or `equals`",
                    step.name(),
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// The text-box form flow: fill all four fields, submit, and check each
    /// labelled output line
    pub fn text_box(url: &str, input: &TextBoxInput) -> Self {
        let mut steps = vec![TestStep::Navigate { url: url.to_string() }];
        for field in FormField::ALL {
            steps.push(TestStep::Fill {
                selector: selectors::input(field).to_string(),
                value: input.value(field).to_string(),
            });
        }
        steps.push(TestStep::Click {
            selector: selectors::SUBMIT_BUTTON.to_string(),
        });
        for field in FormField::ALL {
            steps.push(TestStep::AssertText {
                selector: selectors::output(field).to_string(),
                contains: Some(format!("{}{}", field.output_label(), input.value(field))),
                equals: None,
            });
        }

        Self {
            name: "text-box-form".to_string(),
            description: "Fill and submit the text-box form".to_string(),
            tags: vec!["ui".to_string(), "form".to_string()],
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_spec() {
        let yaml = r#"
name: text-box-name-only
description: Submit only the name field
tags:
  - form
  - smoke
steps:
  - action: navigate
    url: https://demoqa.com/text-box
  - action: fill
    selector: 'input#userName'
    value: Donald Duck
  - action: click
    selector: '#submit'
  - action: assert_text
    selector: '#name'
    contains: 'Name:Donald Duck'
"#;
        let spec = TestSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.name, "text-box-name-only");
        assert_eq!(spec.steps.len(), 4);
        assert_eq!(spec.steps[2].name(), "click:#submit");
    }

    #[test]
    fn test_assert_needs_expectation() {
        let yaml = r#"
name: bad
steps:
  - action: assert_text
    selector: '#name'
"#;
        assert!(matches!(TestSpec::from_yaml(yaml), Err(E2eError::SpecParse(_))));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let yaml = r#"
name: bad
steps:
  - action: teleport
    selector: '#name'
"#;
        assert!(matches!(TestSpec::from_yaml(yaml), Err(E2eError::Yaml(_))));
    }

    #[test]
    fn test_text_box_scenario_shape() {
        let input = TextBoxInput::new(
            "Donald Duck",
            "donald.duck@example.com",
            "56 Main St",
            "379 Apple Rd",
        );
        let spec = TestSpec::text_box("https://demoqa.com/text-box", &input);
        assert_eq!(spec.steps.len(), 10);
        assert!(spec.steps.contains(&TestStep::AssertText {
            selector: "p#permanentAddress".to_string(),
            contains: Some("Permananet Address :379 Apple Rd".to_string()),
            equals: None,
        }));

        let yaml = serde_yaml::to_string(&spec).unwrap();
        assert_eq!(TestSpec::from_yaml(&yaml).unwrap(), spec);
    }

    #[test]
    fn test_filter_by_tag() {
        let input = TextBoxInput::default();
        let mut other = TestSpec::text_box("https://demoqa.com/text-box", &input);
        other.name = "other".to_string();
        other.tags = vec!["smoke".to_string()];
        let specs = vec![TestSpec::text_box("https://demoqa.com/text-box", &input), other];
        let tagged = TestSpec::filter_by_tag(&specs, "smoke");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].name, "other");
    }
}
