//! Schema validation for sanitized payloads.
//!
//! Sanitization decides which fields are visible; validation decides whether
//! the visible fields satisfy the schema. The only schema rule for the
//! `Client` resource is that `name` is a required, non-empty string.

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::sanitize::FIELD_NAME;

/// Extract and validate the required `name` field for a create.
///
/// # Errors
///
/// Returns `AppError::Validation` when the field is missing, not a string,
/// or empty.
pub fn require_name(fields: &Map<String, Value>) -> AppResult<String> {
    match fields.get(FIELD_NAME) {
        None | Some(Value::Null) => Err(AppError::Validation("name is required".to_string())),
        Some(value) => validate_name_value(value),
    }
}

/// Extract and validate the `name` field for an update, if present.
///
/// An absent field is not an error: updates apply only the fields the
/// caller supplied, and the persisted record already satisfies the
/// required-field invariant.
///
/// # Errors
///
/// Returns `AppError::Validation` when the field is present but not a
/// non-empty string.
pub fn optional_name(fields: &Map<String, Value>) -> AppResult<Option<String>> {
    match fields.get(FIELD_NAME) {
        None => Ok(None),
        Some(value) => validate_name_value(value).map(Some),
    }
}

fn validate_name_value(value: &Value) -> AppResult<String> {
    let name = value
        .as_str()
        .ok_or_else(|| AppError::Validation("name must be a string".to_string()))?;

    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    Ok(name.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_require_name_accepts_non_empty_string() {
        let name = require_name(&fields(json!({"name": "John Doe"}))).unwrap();
        assert_eq!(name, "John Doe");
    }

    #[test]
    fn test_require_name_rejects_missing_field() {
        let err = require_name(&Map::new()).unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_require_name_rejects_null() {
        let err = require_name(&fields(json!({"name": null}))).unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_require_name_rejects_empty_string() {
        let err = require_name(&fields(json!({"name": ""}))).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_require_name_rejects_non_string() {
        for value in [json!(42), json!(true), json!(["a"]), json!({"first": "J"})] {
            let err = require_name(&fields(json!({"name": value}))).unwrap_err();
            assert!(err.to_string().contains("must be a string"));
        }
    }

    #[test]
    fn test_optional_name_absent_is_ok() {
        assert_eq!(optional_name(&Map::new()).unwrap(), None);
    }

    #[test]
    fn test_optional_name_present_is_validated() {
        let name = optional_name(&fields(json!({"name": "John Updated"}))).unwrap();
        assert_eq!(name, Some("John Updated".to_string()));

        assert!(optional_name(&fields(json!({"name": ""}))).is_err());
        assert!(optional_name(&fields(json!({"name": 7}))).is_err());
    }

    #[test]
    fn test_whitespace_name_is_preserved() {
        // Whitespace is not trimmed; only the empty string violates the
        // required-field invariant.
        let name = require_name(&fields(json!({"name": "  "}))).unwrap();
        assert_eq!(name, "  ");
    }
}
