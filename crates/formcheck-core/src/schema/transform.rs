use serde_json::Value;

use super::{Node, Run};
use crate::config::Config;
use crate::dataset::Dataset;

/// String rewrites applied inside a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    Trim,
    ToLowerCase,
    ToUpperCase,
}

impl Transformation {
    pub fn type_name(&self) -> &'static str {
        match self {
            Transformation::Trim => "trim",
            Transformation::ToLowerCase => "to_lower_case",
            Transformation::ToUpperCase => "to_upper_case",
        }
    }

    fn apply(&self, s: &str) -> String {
        match self {
            Transformation::Trim => s.trim().to_string(),
            Transformation::ToLowerCase => s.to_lowercase(),
            Transformation::ToUpperCase => s.to_uppercase(),
        }
    }
}

impl Run for Transformation {
    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        if let Value::String(s) = &dataset.value {
            dataset.value = Value::String(self.apply(s));
        }
        dataset
    }
}

pub fn trim() -> Node {
    Node::Transformation(Transformation::Trim)
}

pub fn to_lower_case() -> Node {
    Node::Transformation(Transformation::ToLowerCase)
}

pub fn to_upper_case() -> Node {
    Node::Transformation(Transformation::ToUpperCase)
}

/// Descriptive annotation; pipes skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    description: String,
}

impl Metadata {
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Run for Metadata {
    fn run(&self, dataset: Dataset, _config: &Config) -> Dataset {
        dataset
    }
}

pub fn description(text: impl Into<String>) -> Node {
    Node::Metadata(Metadata {
        description: text.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(node: &Node, value: Value) -> Value {
        node.run(Dataset::new(value), &Config::default()).value
    }

    #[test]
    fn test_string_transformations() {
        assert_eq!(run(&trim(), json!("  hi  ")), json!("hi"));
        assert_eq!(run(&to_lower_case(), json!("MiXeD")), json!("mixed"));
        assert_eq!(run(&to_upper_case(), json!("MiXeD")), json!("MIXED"));
    }

    #[test]
    fn test_non_strings_pass_through() {
        assert_eq!(run(&trim(), json!(5)), json!(5));
    }

    #[test]
    fn test_description_is_identity() {
        let node = description("login name");
        let Node::Metadata(meta) = &node else {
            panic!("expected metadata node");
        };
        assert_eq!(meta.description(), "login name");
        assert_eq!(run(&node, json!("x")), json!("x"));
    }
}
