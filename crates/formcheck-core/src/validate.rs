//! Entry points that run a schema against an input value.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::{Config, ConfigOverrides};
use crate::dataset::Dataset;
use crate::issue::Issue;
use crate::schema::{Node, Run};

/// Result of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Whether the output matches the schema's type.
    pub typed: bool,
    /// `true` when no issue was reported.
    pub success: bool,
    /// The rebuilt value, with unknown object keys removed and
    /// transformations applied.
    pub output: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

impl From<Dataset> for Output {
    fn from(dataset: Dataset) -> Self {
        Self {
            typed: dataset.typed,
            success: dataset.issues.is_none(),
            output: dataset.value,
            issues: dataset.issues,
        }
    }
}

/// Field name to error message, keyed by dotted path.
pub type FieldErrors = BTreeMap<String, String>;

/// Validates `input` against `schema`.
///
/// Unset fields in `overrides` fall back to the installed global config.
pub fn validate(schema: &Node, input: Value, overrides: ConfigOverrides) -> Output {
    let config = Config::resolve(overrides);
    validate_with(schema, input, &config)
}

/// Validates `input` with an already resolved config.
pub fn validate_with(schema: &Node, input: Value, config: &Config) -> Output {
    tracing::debug!(
        schema = schema.type_name(),
        lang = ?config.lang,
        abort_early = config.abort_early,
        abort_pipe_early = config.abort_pipe_early,
        "validating input"
    );
    let output = Output::from(schema.run(Dataset::new(input), config));
    tracing::debug!(
        success = output.success,
        issues = output.issues.as_ref().map_or(0, Vec::len),
        "validation finished"
    );
    output
}

/// Async form of [`validate`]. The run itself is synchronous.
pub async fn validate_async(schema: &Node, input: Value, overrides: ConfigOverrides) -> Output {
    validate(schema, input, overrides)
}

/// Folds issues into one message per field.
///
/// The first issue for a path wins. Issues without a path are keyed by the
/// empty string.
pub fn flatten_issues(issues: &[Issue]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for issue in issues {
        let key = issue.dotted_path().unwrap_or_default();
        errors.entry(key).or_insert_with(|| issue.message.clone());
    }
    errors
}

/// Validates `input` for form display: stops each field at its first issue
/// and returns one message per field.
///
/// Returns an empty map when the input is valid.
pub fn to_field_errors(schema: &Node, input: Value, overrides: ConfigOverrides) -> FieldErrors {
    let output = validate(schema, input, overrides.abort_pipe_early(true));
    output
        .issues
        .as_deref()
        .map(flatten_issues)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{min_length, non_empty, object, pipe, string};
    use serde_json::json;

    fn account() -> Node {
        object([
            ("name", pipe([string(), non_empty(), min_length(3)])),
            ("email", string()),
        ])
    }

    #[test]
    fn test_success_output() {
        let input = json!({"name": "alice", "email": "a@b.co"});
        let output = validate(&account(), input, ConfigOverrides::new());
        assert!(output.success);
        assert!(output.typed);
        assert!(output.issues.is_none());
    }

    #[test]
    fn test_failure_output() {
        let output = validate(&account(), json!({"name": ""}), ConfigOverrides::new());
        assert!(!output.success);
        assert!(!output.typed);
        assert_eq!(output.issues.unwrap().len(), 3);
    }

    #[test]
    fn test_flatten_keeps_first_message() {
        let output = validate(&account(), json!({"name": ""}), ConfigOverrides::new());
        let errors = flatten_issues(&output.issues.unwrap());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["name"], "Invalid length: Expected !0 but received 0");
        assert_eq!(errors["email"], "Invalid key: Expected \"email\" but received undefined");
    }

    #[test]
    fn test_field_errors_root_key() {
        let errors = to_field_errors(&account(), json!(7), ConfigOverrides::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[""], "Invalid type: Expected Object but received 7");
    }

    #[test]
    fn test_field_errors_empty_when_valid() {
        let errors = to_field_errors(
            &account(),
            json!({"name": "alice", "email": "a@b.co"}),
            ConfigOverrides::new(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_output_serializes_camel_case() {
        let output = validate(&string(), json!(1), ConfigOverrides::new());
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["issues"][0]["abortPipeEarly"], json!(false));
        assert_eq!(value["issues"][0]["type"], json!("string"));
    }
}
