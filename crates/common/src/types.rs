//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A post resource as returned by the `/posts` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Payload for creating a post. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn new(user_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// The post the server is expected to echo back once it assigns `id`
    pub fn with_id(&self, id: i64) -> Post {
        Post {
            user_id: self.user_id,
            id,
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

/// Partial update payload for an existing post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

/// The four text-box form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    CurrentAddress,
    PermanentAddress,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::CurrentAddress,
        FormField::PermanentAddress,
    ];

    /// Label the target page prefixes to the rendered value.
    ///
    /// `Permananet` is the page's own spelling and must stay as-is for
    /// output matching to work.
    pub fn output_label(&self) -> &'static str {
        match self {
            FormField::Name => "Name:",
            FormField::Email => "Email:",
            FormField::CurrentAddress => "Current Address :",
            FormField::PermanentAddress => "Permananet Address :",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::CurrentAddress => "current_address",
            FormField::PermanentAddress => "permanent_address",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values typed into the text-box form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBoxInput {
    pub name: String,
    pub email: String,
    pub current_address: String,
    pub permanent_address: String,
}

impl TextBoxInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        current_address: impl Into<String>,
        permanent_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            current_address: current_address.into(),
            permanent_address: permanent_address.into(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::CurrentAddress => &self.current_address,
            FormField::PermanentAddress => &self.permanent_address,
        }
    }
}

/// Output text read back from the page after submit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub name: String,
    pub email: String,
    pub current_address: String,
    pub permanent_address: String,
}

impl FormSubmission {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::CurrentAddress => &self.current_address,
            FormField::PermanentAddress => &self.permanent_address,
        }
    }

    pub fn set_field(&mut self, field: FormField, text: String) {
        match field {
            FormField::Name => self.name = text,
            FormField::Email => self.email = text,
            FormField::CurrentAddress => self.current_address = text,
            FormField::PermanentAddress => self.permanent_address = text,
        }
    }

    /// True if the rendered text for `field` contains `<label><value>`
    pub fn contains_entry(&self, field: FormField, value: &str) -> bool {
        let expected = format!("{}{}", field.output_label(), value);
        self.field(field).contains(&expected)
    }

    /// Fields whose rendered text does not reflect what was entered
    pub fn mismatches(&self, input: &TextBoxInput) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| !self.contains_entry(*f, input.value(*f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_uses_camel_case_keys() {
        let post = Post {
            user_id: 1,
            id: 1,
            title: "Test Post".to_string(),
            body: "Test content".to_string(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["userId"], 1);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_post_update_skips_missing_fields() {
        let update = PostUpdate::default().title("Test");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Test"}));
        assert!(PostUpdate::default().is_empty());
    }

    #[test]
    fn test_submission_contains_labelled_entries() {
        let submission = FormSubmission {
            name: "Name:Donald Duck".to_string(),
            email: "Email:donald.duck@example.com".to_string(),
            current_address: "Current Address :56 Main St ".to_string(),
            permanent_address: "Permananet Address :379 Apple Rd".to_string(),
        };
        let input = TextBoxInput::new(
            "Donald Duck",
            "donald.duck@example.com",
            "56 Main St",
            "379 Apple Rd",
        );
        assert!(submission.mismatches(&input).is_empty());

        let other = TextBoxInput { name: "Daisy Duck".to_string(), ..input };
        assert_eq!(submission.mismatches(&other), vec![FormField::Name]);
    }
}
