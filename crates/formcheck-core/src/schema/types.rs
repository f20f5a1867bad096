//! Type schemas and the wrappers that relax them.

use serde_json::Value;
use std::sync::Arc;

use super::{add_issue, Node, NodeInfo, Reference, Run};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::issue::{IssueOverrides, Kind};
use crate::message::MessageSource;

/// JSON value categories a type schema can check for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Boolean,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
        }
    }

    fn reference(&self) -> Reference {
        match self {
            ValueType::String => Reference::String,
            ValueType::Number => Reference::Number,
            ValueType::Boolean => Reference::Boolean,
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Number => value.is_number(),
            ValueType::Boolean => value.is_boolean(),
        }
    }
}

/// Leaf schema that checks a value's runtime type.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    value_type: ValueType,
    message: Option<MessageSource>,
}

impl TypeSchema {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            message: None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn with_message(mut self, message: MessageSource) -> Self {
        self.message = Some(message);
        self
    }
}

impl Run for TypeSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.value_type.matches(&dataset.value) {
            dataset.typed = true;
        } else {
            let info = NodeInfo {
                kind: Kind::Schema,
                type_name: self.value_type.as_str(),
                reference: self.value_type.reference(),
                expects: Some(self.value_type.as_str().to_string()),
                requirement: None,
                message: self.message.as_ref(),
            };
            add_issue(&info, "type", &mut dataset, config, IssueOverrides::default());
        }
        dataset
    }
}

pub fn string() -> Node {
    Node::Type(TypeSchema::new(ValueType::String))
}

pub fn number() -> Node {
    Node::Type(TypeSchema::new(ValueType::Number))
}

pub fn boolean() -> Node {
    Node::Type(TypeSchema::new(ValueType::Boolean))
}

/// Which absent-ish inputs a wrapper accepts in place of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The field may be missing from its object.
    Optional,
    /// The value may be `null`; the field itself is still required.
    Nullable,
    /// The field may be missing or `null`.
    Nullish,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Optional => "optional",
            Presence::Nullable => "nullable",
            Presence::Nullish => "nullish",
        }
    }

    pub fn allows_missing(&self) -> bool {
        matches!(self, Presence::Optional | Presence::Nullish)
    }

    fn allows_null(&self) -> bool {
        matches!(self, Presence::Nullable | Presence::Nullish)
    }
}

/// Wrapper accepting a missing or `null` value in place of the inner schema.
#[derive(Debug, Clone)]
pub struct OptionalSchema {
    inner: Arc<Node>,
    presence: Presence,
    default: Option<Value>,
}

impl OptionalSchema {
    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn inner(&self) -> &Node {
        &self.inner
    }

    pub(crate) fn map_inner(mut self, f: impl FnOnce(Node) -> Node) -> Self {
        self.inner = Arc::new(f(Node::clone(&self.inner)));
        self
    }
}

impl Run for OptionalSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        // Missing fields are resolved by the enclosing object, so only
        // `null` is special here.
        if self.presence.allows_null() && dataset.value.is_null() {
            match &self.default {
                Some(default) if !default.is_null() => dataset.value = default.clone(),
                _ => {
                    dataset.typed = true;
                    return dataset;
                }
            }
        }
        self.inner.run(dataset, config)
    }
}

pub fn optional(inner: Node) -> Node {
    wrap(inner, Presence::Optional, None)
}

/// Optional field that takes `default` when missing.
pub fn optional_with_default(inner: Node, default: Value) -> Node {
    wrap(inner, Presence::Optional, Some(default))
}

pub fn nullable(inner: Node) -> Node {
    wrap(inner, Presence::Nullable, None)
}

pub fn nullish(inner: Node) -> Node {
    wrap(inner, Presence::Nullish, None)
}

fn wrap(inner: Node, presence: Presence, default: Option<Value>) -> Node {
    Node::Optional(OptionalSchema {
        inner: Arc::new(inner),
        presence,
        default,
    })
}

/// Wrapper that replaces a failing value with a fixed one.
#[derive(Debug, Clone)]
pub struct FallbackSchema {
    inner: Arc<Node>,
    value: Value,
}

impl FallbackSchema {
    pub fn inner(&self) -> &Node {
        &self.inner
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn map_inner(mut self, f: impl FnOnce(Node) -> Node) -> Self {
        self.inner = Arc::new(f(Node::clone(&self.inner)));
        self
    }
}

impl Run for FallbackSchema {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let dataset = self.inner.run(dataset, config);
        if dataset.has_issues() {
            return Dataset {
                value: self.value.clone(),
                typed: true,
                issues: None,
            };
        }
        dataset
    }
}

pub fn fallback(inner: Node, value: Value) -> Node {
    Node::Fallback(FallbackSchema {
        inner: Arc::new(inner),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(node: &Node, value: Value) -> Dataset {
        node.run(Dataset::new(value), &Config::default())
    }

    #[test]
    fn test_string_accepts_strings() {
        let dataset = run(&string(), json!("hello"));
        assert!(dataset.typed);
        assert!(dataset.issues.is_none());
    }

    #[test]
    fn test_string_rejects_numbers() {
        let dataset = run(&string(), json!(42));
        assert!(!dataset.typed);
        let issues = dataset.issues.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].label, "type");
        assert_eq!(issues[0].expected.as_deref(), Some("string"));
        assert_eq!(issues[0].received, "42");
    }

    #[test]
    fn test_number_and_boolean() {
        assert!(run(&number(), json!(1.5)).typed);
        assert!(!run(&number(), json!("1.5")).typed);
        assert!(run(&boolean(), json!(false)).typed);
        assert!(!run(&boolean(), json!(0)).typed);
    }

    #[test]
    fn test_custom_type_message() {
        let dataset = run(&string().with_message("Must be text"), json!(null));
        assert_eq!(dataset.issues.unwrap()[0].message, "Must be text");
    }

    #[test]
    fn test_nullable_accepts_null() {
        let dataset = run(&nullable(string()), json!(null));
        assert!(dataset.typed);
        assert!(dataset.issues.is_none());

        let dataset = run(&nullable(string()), json!(3));
        assert!(dataset.has_issues());
    }

    #[test]
    fn test_nullish_accepts_null_but_checks_values() {
        let dataset = run(&nullish(string()), json!(null));
        assert!(dataset.typed);
        assert!(dataset.issues.is_none());

        assert!(run(&nullish(string()), json!("x")).issues.is_none());
        let issues = run(&nullish(string()), json!(false)).issues.unwrap();
        assert_eq!(issues[0].type_name, "string");
    }

    #[test]
    fn test_optional_does_not_accept_null() {
        let dataset = run(&optional(string()), json!(null));
        assert!(dataset.has_issues());
    }

    #[test]
    fn test_fallback_replaces_failure() {
        let dataset = run(&fallback(number(), json!(0)), json!("abc"));
        assert!(dataset.typed);
        assert!(dataset.issues.is_none());
        assert_eq!(dataset.value, json!(0));
    }
}
