//! Field allow-listing for client-supplied payloads.
//!
//! Request bodies arrive as arbitrary JSON objects. Before any field reaches
//! the repository, the payload is filtered against an explicit allow-list so
//! unknown keys are silently dropped rather than persisted. Rejection of a
//! missing required field is the job of validation, not sanitization: an
//! empty result here is a valid (empty) payload.
//!
//! The schema lives in a [`SchemaPolicy`] value that is constructed once and
//! handed to the repository, not in module-level state.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Field name of the client display name.
pub const FIELD_NAME: &str = "name";

/// Allow-list and required-field set for a resource schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPolicy {
    allowed: BTreeSet<String>,
    required: BTreeSet<String>,
}

impl SchemaPolicy {
    /// Build a policy from explicit field sets.
    ///
    /// Required fields are implicitly allowed; a field that must be present
    /// but would then be stripped makes no sense.
    pub fn new<A, R>(allowed: A, required: R) -> Self
    where
        A: IntoIterator<Item = String>,
        R: IntoIterator<Item = String>,
    {
        let required: BTreeSet<String> = required.into_iter().collect();
        let mut allowed: BTreeSet<String> = allowed.into_iter().collect();
        allowed.extend(required.iter().cloned());
        Self { allowed, required }
    }

    /// The schema of the `Client` resource: a single required `name` field.
    pub fn client() -> Self {
        Self::new([FIELD_NAME.to_string()], [FIELD_NAME.to_string()])
    }

    /// Whether `field` survives sanitization.
    pub fn is_allowed(&self, field: &str) -> bool {
        self.allowed.contains(field)
    }

    /// Whether `field` must be present on create.
    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
    }

    /// Filter `raw` down to the allow-listed fields.
    ///
    /// Pure: the input is not modified, values are cloned unchanged, and the
    /// output keys are always a subset of the allow-list. An empty input
    /// yields an empty output.
    pub fn sanitize(&self, raw: &Map<String, Value>) -> Map<String, Value> {
        raw.iter()
            .filter(|(key, _)| self.is_allowed(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let policy = SchemaPolicy::client();
        let raw = as_map(json!({
            "name": "John Doe",
            "role": "admin",
            "isAdmin": true,
        }));

        let clean = policy.sanitize(&raw);

        assert_eq!(clean.len(), 1);
        assert_eq!(clean.get("name"), Some(&json!("John Doe")));
    }

    #[test]
    fn test_allowed_values_pass_through_unchanged() {
        let policy = SchemaPolicy::client();

        // Value types are preserved, even when downstream validation would
        // reject them.
        for value in [json!("x"), json!(42), json!(null), json!({"a": 1})] {
            let raw = as_map(json!({ "name": value.clone() }));
            let clean = policy.sanitize(&raw);
            assert_eq!(clean.get("name"), Some(&value));
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let policy = SchemaPolicy::client();
        let clean = policy.sanitize(&Map::new());
        assert!(clean.is_empty());
    }

    #[test]
    fn test_output_keys_are_subset_of_allow_list() {
        let policy = SchemaPolicy::new(
            ["name".to_string(), "email".to_string()],
            ["name".to_string()],
        );
        let raw = as_map(json!({
            "name": "a",
            "email": "a@example.com",
            "_id": "injected",
            "$where": "1 == 1",
        }));

        let clean = policy.sanitize(&raw);

        assert!(clean.keys().all(|k| policy.is_allowed(k)));
        assert_eq!(clean.len(), 2);
    }

    #[test]
    fn test_required_fields_are_implicitly_allowed() {
        let policy = SchemaPolicy::new([], ["name".to_string()]);
        assert!(policy.is_allowed("name"));
        assert!(policy.is_required("name"));
    }

    #[test]
    fn test_sanitize_does_not_mutate_input() {
        let policy = SchemaPolicy::client();
        let raw = as_map(json!({ "name": "a", "extra": 1 }));
        let before = raw.clone();

        let _ = policy.sanitize(&raw);

        assert_eq!(raw, before);
    }
}
