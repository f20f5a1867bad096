//! Primitive validators.
//!
//! Each validator only inspects the value when the dataset is typed, so a
//! value that already failed its type schema never collects secondary
//! format or length issues.

use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

use super::{add_issue, Node, NodeInfo, Reference, Run};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::SchemaError;
use crate::issue::{IssueOverrides, Kind};
use crate::message::MessageSource;

/// Permissive `local@domain.tld` pattern, case-insensitive.
pub const EMAIL_PATTERN: &str =
    r"(?i)^[A-Za-z0-9_+-]+(?:\.[A-Za-z0-9_+-]+)*@[0-9a-z]+(?:[.-][0-9a-z]+)*\.[a-z]{2,}$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by tests.
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// The requirement a validation node checks.
#[derive(Debug, Clone)]
pub enum Rule {
    Email,
    MinLength(usize),
    MaxLength(usize),
    NonEmpty,
    Regex(Regex),
    MinValue(f64),
    MaxValue(f64),
    Integer,
}

impl Rule {
    pub fn type_name(&self) -> &'static str {
        match self {
            Rule::Email => "email",
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::NonEmpty => "non_empty",
            Rule::Regex(_) => "regex",
            Rule::MinValue(_) => "min_value",
            Rule::MaxValue(_) => "max_value",
            Rule::Integer => "integer",
        }
    }

    fn reference(&self) -> Reference {
        match self {
            Rule::Email => Reference::Email,
            Rule::MinLength(_) => Reference::MinLength,
            Rule::MaxLength(_) => Reference::MaxLength,
            Rule::NonEmpty => Reference::NonEmpty,
            Rule::Regex(_) => Reference::Regex,
            Rule::MinValue(_) => Reference::MinValue,
            Rule::MaxValue(_) => Reference::MaxValue,
            Rule::Integer => Reference::Integer,
        }
    }

    /// The expectation reported on failure.
    pub fn expects(&self) -> Option<String> {
        match self {
            Rule::Email | Rule::Integer => None,
            Rule::MinLength(n) => Some(format!(">={}", n)),
            Rule::MaxLength(n) => Some(format!("<={}", n)),
            Rule::NonEmpty => Some("!0".to_string()),
            Rule::Regex(re) => Some(re.as_str().to_string()),
            Rule::MinValue(n) => Some(format!(">={}", n)),
            Rule::MaxValue(n) => Some(format!("<={}", n)),
        }
    }

    fn requirement(&self) -> Option<Value> {
        match self {
            Rule::Email => Some(json!(EMAIL_PATTERN)),
            Rule::MinLength(n) | Rule::MaxLength(n) => Some(json!(n)),
            Rule::NonEmpty | Rule::Integer => None,
            Rule::Regex(re) => Some(json!(re.as_str())),
            Rule::MinValue(n) | Rule::MaxValue(n) => Some(json!(n)),
        }
    }

    /// Checks the value, returning the failure label and any received
    /// override when the requirement is not met.
    ///
    /// Values of a shape the rule does not apply to pass silently.
    fn check(&self, value: &Value) -> Option<(&'static str, Option<String>)> {
        match self {
            Rule::Email => {
                let s = value.as_str()?;
                (!email_regex().is_match(s)).then_some(("email", None))
            }
            Rule::MinLength(n) => {
                let len = value_length(value)?;
                (len < *n).then(|| ("length", Some(len.to_string())))
            }
            Rule::MaxLength(n) => {
                let len = value_length(value)?;
                (len > *n).then(|| ("length", Some(len.to_string())))
            }
            Rule::NonEmpty => {
                let len = value_length(value)?;
                (len == 0).then(|| ("length", Some("0".to_string())))
            }
            Rule::Regex(re) => {
                let s = value.as_str()?;
                (!re.is_match(s)).then_some(("format", None))
            }
            Rule::MinValue(n) => {
                let v = value.as_f64()?;
                (v < *n).then_some(("value", None))
            }
            Rule::MaxValue(n) => {
                let v = value.as_f64()?;
                (v > *n).then_some(("value", None))
            }
            Rule::Integer => {
                let number = value.as_number()?;
                let integral = number.is_i64()
                    || number.is_u64()
                    || number
                        .as_f64()
                        .is_some_and(|f| f.is_finite() && f.fract() == 0.0);
                (!integral).then_some(("integer", None))
            }
        }
    }
}

/// Length in characters for strings, in elements for arrays.
fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// A validation node: one rule plus an optional custom message.
#[derive(Debug, Clone)]
pub struct Validation {
    rule: Rule,
    message: Option<MessageSource>,
}

impl Validation {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn with_message(mut self, message: MessageSource) -> Self {
        self.message = Some(message);
        self
    }
}

impl Run for Validation {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some((label, received)) = self.rule.check(&dataset.value) {
            let info = NodeInfo {
                kind: Kind::Validation,
                type_name: self.rule.type_name(),
                reference: self.rule.reference(),
                expects: self.rule.expects(),
                requirement: self.rule.requirement(),
                message: self.message.as_ref(),
            };
            let overrides = IssueOverrides {
                received,
                ..Default::default()
            };
            add_issue(&info, label, &mut dataset, config, overrides);
        }
        dataset
    }
}

fn validation(rule: Rule) -> Node {
    Node::Validation(Validation::new(rule))
}

pub fn email() -> Node {
    validation(Rule::Email)
}

pub fn min_length(n: usize) -> Node {
    validation(Rule::MinLength(n))
}

pub fn max_length(n: usize) -> Node {
    validation(Rule::MaxLength(n))
}

pub fn non_empty() -> Node {
    validation(Rule::NonEmpty)
}

pub fn regex(pattern: Regex) -> Node {
    validation(Rule::Regex(pattern))
}

/// Compiles `pattern` and builds a regex validator from it.
pub fn try_regex(pattern: &str) -> Result<Node, SchemaError> {
    let re = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(regex(re))
}

pub fn min_value(n: f64) -> Node {
    validation(Rule::MinValue(n))
}

pub fn max_value(n: f64) -> Node {
    validation(Rule::MaxValue(n))
}

pub fn integer() -> Node {
    validation(Rule::Integer)
}
