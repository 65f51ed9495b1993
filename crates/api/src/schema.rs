//! JSON Schema validation of response bodies

use jsonschema::{CompilationOptions, Draft, JSONSchema};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};

/// Schema every post returned by the server must satisfy
pub fn post_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "userId": {"type": "integer"},
            "id": {"type": "integer"},
            "title": {"type": "string"},
            "body": {"type": "string"}
        },
        "required": ["userId", "id", "title", "body"]
    })
}

/// A compiled schema
pub struct SchemaValidator {
    name: String,
    schema: JSONSchema,
}

impl SchemaValidator {
    pub fn compile(name: impl Into<String>, schema: &Value) -> ApiResult<Self> {
        let mut options = CompilationOptions::default();
        options.with_draft(Draft::Draft7);
        let compiled = options
            .compile(schema)
            .map_err(|err| ApiError::InvalidSchema(err.to_string()))?;
        Ok(Self {
            name: name.into(),
            schema: compiled,
        })
    }

    pub fn post() -> ApiResult<Self> {
        Self::compile("post", &post_schema())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every violation, each prefixed with the offending location when it is
    /// not the document root
    pub fn violations(&self, instance: &Value) -> Vec<String> {
        match self.schema.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let location = error.instance_path.to_string();
                    if location.is_empty() {
                        error.to_string()
                    } else {
                        format!("{}: {}", location, error)
                    }
                })
                .collect(),
        }
    }

    /// Fails with the first violation
    pub fn validate(&self, instance: &Value) -> ApiResult<()> {
        match self.violations(instance).into_iter().next() {
            None => Ok(()),
            Some(first) => Err(ApiError::Validation(format!("{} ({})", first, self.name))),
        }
    }
}

/// Validate `instance` against [`post_schema`]
pub fn validate_post(instance: &Value) -> ApiResult<()> {
    SchemaValidator::post()?.validate(instance)
}
