//! Issue records produced by validation.
//!
//! An [`Issue`] is one reported failure with the node that raised it, the
//! offending input, the expectation, and a path from the validated root down
//! to the failing value.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The role a node plays in a schema tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Checks the runtime type of a value and narrows it.
    Schema,
    /// Checks a requirement on an already-typed value.
    Validation,
    /// Rewrites the value.
    Transformation,
    /// Carries descriptive data only; never runs.
    Metadata,
}

/// The container type a path segment walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Object,
    Array,
    Unknown,
}

/// Whether a path segment points at a key or at the value stored under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Key,
    Value,
}

/// One hop in an issue path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    #[serde(rename = "type")]
    pub path_type: PathType,
    pub origin: Origin,
    /// The container the key was looked up in.
    pub input: Value,
    pub key: String,
    /// The value found under `key`, absent when the key is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PathItem {
    /// Segment for a value stored under `key` of an object.
    pub fn object_value(input: Value, key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            path_type: PathType::Object,
            origin: Origin::Value,
            input,
            key: key.into(),
            value,
        }
    }

    /// Segment for a missing object key.
    pub fn object_key(input: Value, key: impl Into<String>) -> Self {
        let key = key.into();
        let value = input.get(&key).cloned();
        Self {
            path_type: PathType::Object,
            origin: Origin::Key,
            input,
            key,
            value,
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Kind of the node that raised the issue.
    pub kind: Kind,

    /// Type name of the node that raised the issue, e.g. `"min_length"`.
    #[serde(rename = "type")]
    pub type_name: &'static str,

    /// Failure category used in default messages.
    ///
    /// One of `type`, `length`, `format`, `email`, `key`, `input`, `value`
    /// or `integer`.
    pub label: &'static str,

    /// The offending input, absent for missing object keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,

    pub expected: Option<String>,

    pub received: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Value>,

    /// Location of the failure, root first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,

    pub lang: Option<String>,

    pub abort_early: bool,

    pub abort_pipe_early: bool,
}

impl Issue {
    /// Joins the path keys with `.`, or `None` when the issue has no path.
    pub fn dotted_path(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let keys: Vec<&str> = path.iter().map(|item| item.key.as_str()).collect();
        Some(keys.join("."))
    }

    /// Appends a segment at the leaf end of the path.
    pub fn push_path(&mut self, item: PathItem) {
        self.path.get_or_insert_with(Vec::new).push(item);
    }

    /// Prepends a segment at the root end of the path.
    pub fn unshift_path(&mut self, item: PathItem) {
        self.path.get_or_insert_with(Vec::new).insert(0, item);
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dotted_path() {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path, self.message)?,
            _ => write!(f, "{}", self.message)?,
        }
        write!(f, " [{}]", self.type_name)
    }
}

/// Fields that replace the values `add_issue` would otherwise derive.
#[derive(Debug, Clone, Default)]
pub struct IssueOverrides {
    pub input: Option<Value>,
    /// Report the input as missing instead of using the dataset value.
    pub missing_input: bool,
    pub expected: Option<String>,
    pub received: Option<String>,
    pub message: Option<crate::MessageSource>,
    pub path: Option<Vec<PathItem>>,
    pub issues: Option<Vec<Issue>>,
}

/// Renders a value the way it appears in the `received` field.
///
/// Strings are quoted, scalars are printed as-is, containers are named by
/// their type and a missing value is `undefined`.
pub fn describe_received(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => format!("\"{}\"", s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(_)) => "Array".to_string(),
        Some(Value::Object(_)) => "Object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_at(keys: &[&str]) -> Issue {
        Issue {
            kind: Kind::Validation,
            type_name: "min_length",
            label: "length",
            input: Some(json!("ab")),
            expected: Some(">=3".into()),
            received: "2".into(),
            message: "too short".into(),
            requirement: Some(json!(3)),
            path: if keys.is_empty() {
                None
            } else {
                Some(
                    keys.iter()
                        .map(|k| PathItem::object_value(json!({}), *k, None))
                        .collect(),
                )
            },
            issues: None,
            lang: None,
            abort_early: false,
            abort_pipe_early: false,
        }
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(issue_at(&["user", "name"]).dotted_path().as_deref(), Some("user.name"));
        assert_eq!(issue_at(&[]).dotted_path(), None);
    }

    #[test]
    fn test_unshift_and_push_path() {
        let mut issue = issue_at(&["name"]);
        issue.unshift_path(PathItem::object_value(json!({}), "user", None));
        issue.push_path(PathItem::object_value(json!({}), "first", None));
        assert_eq!(issue.dotted_path().as_deref(), Some("user.name.first"));
    }

    #[test]
    fn test_display_includes_path_and_type() {
        let display = format!("{}", issue_at(&["username"]));
        assert_eq!(display, "username: too short [min_length]");
    }

    #[test]
    fn test_describe_received() {
        assert_eq!(describe_received(Some(&json!("abc"))), "\"abc\"");
        assert_eq!(describe_received(Some(&json!(42))), "42");
        assert_eq!(describe_received(Some(&json!(true))), "true");
        assert_eq!(describe_received(Some(&json!(null))), "null");
        assert_eq!(describe_received(Some(&json!([1]))), "Array");
        assert_eq!(describe_received(Some(&json!({"a": 1}))), "Object");
        assert_eq!(describe_received(None), "undefined");
    }

    #[test]
    fn test_object_key_segment_reads_value() {
        let item = PathItem::object_key(json!({"a": 1}), "b");
        assert_eq!(item.origin, Origin::Key);
        assert_eq!(item.value, None);
    }
}
