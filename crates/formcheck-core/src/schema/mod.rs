//! Schema nodes and the run protocol they share.
//!
//! A schema is a tree of [`Node`]s built once and reused. Running a node takes
//! a [`Dataset`] by value, checks or rewrites it, and hands it back to the
//! parent. Failures are recorded through [`add_issue`] and never abort the
//! walk on their own; only the abort flags in [`Config`] stop iteration early.

mod check;
mod object;
mod pipe;
mod transform;
mod types;
mod validators;

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::ConfigError;
use crate::issue::{describe_received, Issue, IssueOverrides, Kind};
use crate::message::{resolve_message, MessageChain, MessageSource};

pub use check::{forward, partial_check, Forward, PartialCheck};
pub use object::{object, ObjectSchema};
pub use pipe::{pipe, Pipe};
pub use transform::{description, to_lower_case, to_upper_case, trim, Metadata, Transformation};
pub use types::{
    boolean, fallback, nullable, nullish, number, optional, optional_with_default, string,
    FallbackSchema, OptionalSchema, Presence, TypeSchema, ValueType,
};
pub use validators::{
    email, integer, max_length, max_value, min_length, min_value, non_empty, regex, try_regex,
    Rule, Validation, EMAIL_PATTERN,
};

/// Anything that can take part in a validation run.
pub trait Run {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset;
}

/// Identifies the builder a node came from.
///
/// Locales key their per-validator messages by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    String,
    Number,
    Boolean,
    Object,
    Optional,
    Nullable,
    Nullish,
    Email,
    MinLength,
    MaxLength,
    NonEmpty,
    Regex,
    MinValue,
    MaxValue,
    Integer,
    PartialCheck,
    Trim,
    ToLowerCase,
    ToUpperCase,
    Description,
}

impl Reference {
    pub const ALL: [Reference; 20] = [
        Reference::String,
        Reference::Number,
        Reference::Boolean,
        Reference::Object,
        Reference::Optional,
        Reference::Nullable,
        Reference::Nullish,
        Reference::Email,
        Reference::MinLength,
        Reference::MaxLength,
        Reference::NonEmpty,
        Reference::Regex,
        Reference::MinValue,
        Reference::MaxValue,
        Reference::Integer,
        Reference::PartialCheck,
        Reference::Trim,
        Reference::ToLowerCase,
        Reference::ToUpperCase,
        Reference::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Reference::String => "string",
            Reference::Number => "number",
            Reference::Boolean => "boolean",
            Reference::Object => "object",
            Reference::Optional => "optional",
            Reference::Nullable => "nullable",
            Reference::Nullish => "nullish",
            Reference::Email => "email",
            Reference::MinLength => "min_length",
            Reference::MaxLength => "max_length",
            Reference::NonEmpty => "non_empty",
            Reference::Regex => "regex",
            Reference::MinValue => "min_value",
            Reference::MaxValue => "max_value",
            Reference::Integer => "integer",
            Reference::PartialCheck => "partial_check",
            Reference::Trim => "trim",
            Reference::ToLowerCase => "to_lower_case",
            Reference::ToUpperCase => "to_upper_case",
            Reference::Description => "description",
        }
    }

    /// Whether nodes with this reference can raise an issue of their own.
    pub fn reports_issues(&self) -> bool {
        !matches!(
            self,
            Reference::Optional
                | Reference::Nullable
                | Reference::Nullish
                | Reference::Trim
                | Reference::ToLowerCase
                | Reference::ToUpperCase
                | Reference::Description
        )
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownReference(s.to_string()))
    }
}

/// What `add_issue` needs to know about the node reporting a failure.
#[derive(Debug, Clone)]
pub struct NodeInfo<'a> {
    pub kind: Kind,
    pub type_name: &'static str,
    pub reference: Reference,
    pub expects: Option<String>,
    pub requirement: Option<Value>,
    pub message: Option<&'a MessageSource>,
}

/// Records one issue on the dataset.
///
/// The message is resolved in priority order: `overrides.message`, the
/// node's own message, the locale entry for the node's reference, the
/// locale's schema message (schema-kind nodes only), the config fallback,
/// and the locale's global message. Without any of those the built-in
/// `Invalid <label>: ...` text is kept.
///
/// Only schema-kind nodes mark the dataset untyped.
pub fn add_issue(
    info: &NodeInfo<'_>,
    label: &'static str,
    dataset: &mut Dataset,
    config: &Config,
    overrides: IssueOverrides,
) {
    let input = if overrides.missing_input {
        None
    } else {
        Some(overrides.input.unwrap_or_else(|| dataset.value.clone()))
    };
    let expected = overrides.expected.or_else(|| info.expects.clone());
    let received = overrides
        .received
        .unwrap_or_else(|| describe_received(input.as_ref()));
    let message = match &expected {
        Some(expected) => format!(
            "Invalid {}: Expected {} but received {}",
            label, expected, received
        ),
        None => format!("Invalid {}: Received {}", label, received),
    };

    let mut issue = Issue {
        kind: info.kind,
        type_name: info.type_name,
        label,
        input,
        expected,
        received,
        message,
        requirement: info.requirement.clone(),
        path: overrides.path,
        issues: overrides.issues,
        lang: config.lang.clone(),
        abort_early: config.abort_early,
        abort_pipe_early: config.abort_pipe_early,
    };

    let is_schema = info.kind == Kind::Schema;
    let lang = config.lang.as_deref();
    let chain = MessageChain {
        overrides: overrides.message.as_ref(),
        node: info.message,
        specific: config.locale.specific_message(info.reference, lang),
        schema: if is_schema {
            config.locale.schema_message(lang)
        } else {
            None
        },
        config: config.message.as_ref(),
        global: config.locale.global_message(lang),
    };
    if let Some(message) = resolve_message(&chain, &issue) {
        issue.message = message;
    }

    tracing::trace!(
        node = info.type_name,
        label,
        message = %issue.message,
        "validation issue"
    );

    if is_schema {
        dataset.typed = false;
    }
    dataset.push_issue(issue);
}

/// A node in a schema tree.
#[derive(Debug, Clone)]
pub enum Node {
    Type(TypeSchema),
    Optional(OptionalSchema),
    Fallback(FallbackSchema),
    Object(ObjectSchema),
    Validation(Validation),
    Transformation(Transformation),
    Metadata(Metadata),
    Pipe(Pipe),
    Check(PartialCheck),
    Forward(Forward),
}

impl Node {
    /// The node's externally visible kind.
    ///
    /// Pipes report their first step's kind and wrappers report their inner
    /// node's kind, so a piped string schema still composes as a schema.
    pub fn kind(&self) -> Kind {
        match self {
            Node::Type(_) | Node::Optional(_) | Node::Object(_) => Kind::Schema,
            Node::Validation(_) | Node::Check(_) => Kind::Validation,
            Node::Transformation(_) => Kind::Transformation,
            Node::Metadata(_) => Kind::Metadata,
            Node::Fallback(node) => node.inner().kind(),
            Node::Pipe(node) => node.first().map_or(Kind::Schema, Node::kind),
            Node::Forward(node) => node.inner().kind(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Type(node) => node.value_type().as_str(),
            Node::Optional(node) => node.presence().as_str(),
            Node::Object(_) => "object",
            Node::Validation(node) => node.rule().type_name(),
            Node::Check(_) => "partial_check",
            Node::Transformation(node) => node.type_name(),
            Node::Metadata(_) => "description",
            Node::Fallback(node) => node.inner().type_name(),
            Node::Pipe(node) => node.first().map_or("pipe", Node::type_name),
            Node::Forward(node) => node.inner().type_name(),
        }
    }

    /// Whether an object may omit this field without a `key` issue.
    pub fn is_optional(&self) -> bool {
        match self {
            Node::Optional(node) => node.presence().allows_missing(),
            Node::Pipe(node) => node.first().is_some_and(Node::is_optional),
            Node::Fallback(node) => node.inner().is_optional(),
            Node::Forward(node) => node.inner().is_optional(),
            _ => false,
        }
    }

    /// Value substituted for a missing field before validation.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Node::Optional(node) => node.default_value().cloned(),
            Node::Pipe(node) => node.first().and_then(Node::default_value),
            Node::Fallback(node) => node.inner().default_value(),
            Node::Forward(node) => node.inner().default_value(),
            _ => None,
        }
    }

    /// Value written for a missing field without running validation.
    pub fn fallback_value(&self) -> Option<Value> {
        match self {
            Node::Fallback(node) => Some(node.value().clone()),
            Node::Pipe(node) => node.first().and_then(Node::fallback_value),
            Node::Forward(node) => node.inner().fallback_value(),
            _ => None,
        }
    }

    /// Attaches a custom message to the node that reports failures.
    ///
    /// Pipes pass the message to their first step and wrappers to their inner
    /// node. Transformations and metadata never report, so the message is
    /// dropped for them.
    pub fn with_message(self, message: impl Into<MessageSource>) -> Self {
        let message = message.into();
        match self {
            Node::Type(node) => Node::Type(node.with_message(message)),
            Node::Object(node) => Node::Object(node.with_message(message)),
            Node::Validation(node) => Node::Validation(node.with_message(message)),
            Node::Check(node) => Node::Check(node.with_message(message)),
            Node::Optional(node) => Node::Optional(node.map_inner(|n| n.with_message(message))),
            Node::Fallback(node) => Node::Fallback(node.map_inner(|n| n.with_message(message))),
            Node::Forward(node) => Node::Forward(node.map_inner(|n| n.with_message(message))),
            Node::Pipe(node) => Node::Pipe(node.map_first(|n| n.with_message(message))),
            node @ (Node::Transformation(_) | Node::Metadata(_)) => node,
        }
    }
}

impl Run for Node {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Node::Type(node) => node.run(dataset, config),
            Node::Optional(node) => node.run(dataset, config),
            Node::Fallback(node) => node.run(dataset, config),
            Node::Object(node) => node.run(dataset, config),
            Node::Validation(node) => node.run(dataset, config),
            Node::Transformation(node) => node.run(dataset, config),
            Node::Metadata(node) => node.run(dataset, config),
            Node::Pipe(node) => node.run(dataset, config),
            Node::Check(node) => node.run(dataset, config),
            Node::Forward(node) => node.run(dataset, config),
        }
    }
}

/// JavaScript-style truthiness used when walking forwarded paths.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
