//! Plugin option validation.
//!
//! # Responsibilities
//! - Shape checks on the raw options object: only `errorFiles` and
//!   `staticRoute` are accepted, and each must be an object
//! - Build the typed [`PluginOptions`] from a valid object
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: `&Value → Result<PluginOptions, Vec<ValidationError>>`
//! - No per-entry checks: `errorFiles` entries that can never match are
//!   skipped, and the static route definition is left to the router
//! - Runs before anything is installed on the router

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::schema::{ErrorFileMap, PluginOptions, RouteDefinition};

const ERROR_FILES: &str = "errorFiles";
const STATIC_ROUTE: &str = "staticRoute";

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("options must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("unknown option `{0}`")]
    UnknownKey(String),

    #[error("`{key}` must be an object, got {found}")]
    ExpectedObject { key: &'static str, found: &'static str },
}

/// Validate raw plugin options and build the typed [`PluginOptions`].
///
/// `null` is treated as an empty options object.
pub fn validate_options(raw: &Value) -> Result<PluginOptions, Vec<ValidationError>> {
    let object = match raw {
        Value::Null => return Ok(PluginOptions::default()),
        Value::Object(object) => object,
        other => return Err(vec![ValidationError::NotAnObject(kind(other))]),
    };

    let errors = check_shape(object);
    if !errors.is_empty() {
        return Err(errors);
    }

    let error_files = object
        .get(ERROR_FILES)
        .and_then(Value::as_object)
        .map(|entries| ErrorFileMap::from_entries(entries.iter().map(|(key, value)| (key.as_str(), value))));

    let static_route = object.get(STATIC_ROUTE).cloned().map(RouteDefinition::new);

    Ok(PluginOptions {
        error_files,
        static_route,
    })
}

fn check_shape(object: &Map<String, Value>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (key, value) in object {
        let key = match key.as_str() {
            ERROR_FILES => ERROR_FILES,
            STATIC_ROUTE => STATIC_ROUTE,
            other => {
                errors.push(ValidationError::UnknownKey(other.to_string()));
                continue;
            }
        };
        if !value.is_object() {
            errors.push(ValidationError::ExpectedObject { key, found: kind(value) });
        }
    }
    errors
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
