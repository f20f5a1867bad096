use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{add_issue, Node, NodeInfo, Reference, Run};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::issue::{IssueOverrides, Kind, PathItem};
use crate::message::MessageSource;

/// Schema for a JSON object with a fixed set of named fields.
///
/// Fields are validated in declaration order and the output object keeps
/// that order. Keys in the input that have no entry are dropped.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    entries: IndexMap<String, Node>,
    message: Option<MessageSource>,
}

impl ObjectSchema {
    pub fn new(entries: IndexMap<String, Node>) -> Self {
        Self {
            entries,
            message: None,
        }
    }

    pub fn entries(&self) -> &IndexMap<String, Node> {
        &self.entries
    }

    pub fn with_message(mut self, message: MessageSource) -> Self {
        self.message = Some(message);
        self
    }

    fn info(&self) -> NodeInfo<'_> {
        NodeInfo {
            kind: Kind::Schema,
            type_name: "object",
            reference: Reference::Object,
            expects: Some("Object".to_string()),
            requirement: None,
            message: self.message.as_ref(),
        }
    }
}

impl Run for ObjectSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let input = match &dataset.value {
            Value::Object(map) => map.clone(),
            _ => {
                let info = self.info();
                add_issue(&info, "type", &mut dataset, config, IssueOverrides::default());
                return dataset;
            }
        };

        tracing::debug!(fields = self.entries.len(), "validating object");

        let input_value = Value::Object(input.clone());
        let mut output = Map::new();
        dataset.typed = true;

        for (key, schema) in &self.entries {
            let present = input.get(key).cloned();
            let default = schema.default_value();

            if present.is_some() || (schema.is_optional() && default.is_some()) {
                let value = present.clone().or(default).unwrap_or(Value::Null);
                let field = schema.run(Dataset::new(value.clone()), config);

                if let Some(issues) = field.issues {
                    for mut issue in issues {
                        let item =
                            PathItem::object_value(input_value.clone(), key, Some(value.clone()));
                        issue.unshift_path(item);
                        dataset.push_issue(issue);
                    }
                    if config.abort_early {
                        dataset.typed = false;
                        break;
                    }
                }
                if !field.typed {
                    dataset.typed = false;
                }
                output.insert(key.clone(), field.value);
            } else if let Some(fallback) = schema.fallback_value() {
                output.insert(key.clone(), fallback);
            } else if !schema.is_optional() {
                let info = self.info();
                let overrides = IssueOverrides {
                    missing_input: true,
                    expected: Some(format!("\"{}\"", key)),
                    path: Some(vec![PathItem::object_key(input_value.clone(), key)]),
                    ..Default::default()
                };
                add_issue(&info, "key", &mut dataset, config, overrides);
                if config.abort_early {
                    break;
                }
            }
        }

        dataset.value = Value::Object(output);
        dataset
    }
}

/// Builds an object schema from `(name, schema)` pairs.
///
/// A repeated name replaces the earlier schema but keeps its position.
pub fn object<K, I>(entries: I) -> Node
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Node)>,
{
    let entries = entries
        .into_iter()
        .map(|(key, node)| (key.into(), node))
        .collect();
    Node::Object(ObjectSchema::new(entries))
}
