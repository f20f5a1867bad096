//! Cross-field checks.
//!
//! A [`PartialCheck`] runs a predicate over a whole object once the fields it
//! depends on are known to be valid. [`Forward`] moves the resulting issue
//! onto a specific field so form code can show it next to that input.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::{add_issue, is_truthy, Node, NodeInfo, Reference, Run};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::issue::{Issue, IssueOverrides, Kind, Origin, PathItem, PathType};
use crate::message::MessageSource;

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Matches any array index in a check path.
const ARRAY_WILDCARD: &str = "$";

/// Predicate over an object that depends on a known set of field paths.
#[derive(Clone)]
pub struct PartialCheck {
    paths: Vec<Vec<String>>,
    predicate: Predicate,
    message: Option<MessageSource>,
}

impl PartialCheck {
    pub fn paths(&self) -> &[Vec<String>] {
        &self.paths
    }

    pub fn with_message(mut self, message: MessageSource) -> Self {
        self.message = Some(message);
        self
    }

    /// Whether the dataset is trustworthy enough to evaluate the predicate.
    ///
    /// A fully typed dataset always is. Otherwise every existing issue must
    /// sit on a path that diverges from every dependency path; an issue
    /// without a path touches everything.
    fn is_partially_typed(&self, dataset: &Dataset) -> bool {
        let Some(issues) = dataset.issues.as_ref() else {
            return true;
        };
        self.paths
            .iter()
            .all(|path| issues.iter().all(|issue| diverges(path, issue)))
    }
}

fn diverges(path: &[String], issue: &Issue) -> bool {
    let Some(issue_path) = issue.path.as_ref() else {
        return false;
    };
    path.iter().zip(issue_path).any(|(key, item)| {
        *key != item.key && (key != ARRAY_WILDCARD || item.path_type != PathType::Array)
    })
}

impl fmt::Debug for PartialCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialCheck")
            .field("paths", &self.paths)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Run for PartialCheck {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !(dataset.typed || self.is_partially_typed(&dataset)) {
            tracing::trace!(paths = ?self.paths, "skipping partial check on untrusted fields");
            return dataset;
        }
        if !(self.predicate)(&dataset.value) {
            let info = NodeInfo {
                kind: Kind::Validation,
                type_name: "partial_check",
                reference: Reference::PartialCheck,
                expects: None,
                requirement: None,
                message: self.message.as_ref(),
            };
            add_issue(&info, "input", &mut dataset, config, IssueOverrides::default());
        }
        dataset
    }
}

/// Builds a check over `paths` that fails when `predicate` returns `false`.
pub fn partial_check<P, S, F>(paths: impl IntoIterator<Item = P>, predicate: F) -> Node
where
    P: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let paths = paths
        .into_iter()
        .map(|path| path.into_iter().map(Into::into).collect())
        .collect();
    Node::Check(PartialCheck {
        paths,
        predicate: Arc::new(predicate),
        message: None,
    })
}

/// Runs an inner node and appends `target` to the path of every issue it adds.
#[derive(Debug, Clone)]
pub struct Forward {
    inner: Arc<Node>,
    target: Vec<String>,
}

impl Forward {
    pub fn inner(&self) -> &Node {
        &self.inner
    }

    pub fn target(&self) -> &[String] {
        &self.target
    }

    pub(crate) fn map_inner(mut self, f: impl FnOnce(Node) -> Node) -> Self {
        self.inner = Arc::new(f(Node::clone(&self.inner)));
        self
    }
}

impl Run for Forward {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let before = dataset.issue_count();
        let mut dataset = self.inner.run(dataset, config);
        let value = dataset.value.clone();

        for issue in dataset.issues_since_mut(before) {
            let mut container = value.clone();
            for key in &self.target {
                let found = container.get(key.as_str()).cloned();
                issue.push_path(PathItem {
                    path_type: PathType::Unknown,
                    origin: Origin::Value,
                    input: container.clone(),
                    key: key.clone(),
                    value: found.clone(),
                });
                // Walking stops once the chain runs into an empty value.
                match found {
                    Some(next) if is_truthy(Some(&next)) => container = next,
                    _ => break,
                }
            }
        }
        dataset
    }
}

pub fn forward<S: Into<String>>(inner: Node, target: impl IntoIterator<Item = S>) -> Node {
    Node::Forward(Forward {
        inner: Arc::new(inner),
        target: target.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{min_length, object, pipe, string};
    use serde_json::json;

    fn passwords_match(value: &Value) -> bool {
        value.get("password") == value.get("confirm")
    }

    fn signup() -> Node {
        pipe([
            object([
                ("name", pipe([string(), min_length(3)])),
                ("password", pipe([string(), min_length(4)])),
                ("confirm", string()),
            ]),
            forward(
                partial_check([["password"], ["confirm"]], passwords_match)
                    .with_message("Passwords do not match"),
                ["confirm"],
            ),
        ])
    }

    fn run(node: &Node, value: Value) -> Dataset {
        node.run(Dataset::new(value), &Config::default())
    }

    #[test]
    fn test_mismatch_is_forwarded() {
        let input = json!({"name": "alice", "password": "hunter2", "confirm": "hunter3"});
        let dataset = run(&signup(), input);
        let issues = dataset.issues.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Passwords do not match");
        assert_eq!(issues[0].label, "input");
        assert_eq!(issues[0].dotted_path().as_deref(), Some("confirm"));
        let item = &issues[0].path.as_ref().unwrap()[0];
        assert_eq!(item.path_type, PathType::Unknown);
        assert_eq!(item.value, Some(json!("hunter3")));
    }

    #[test]
    fn test_matching_passwords_pass() {
        let input = json!({"name": "alice", "password": "hunter2", "confirm": "hunter2"});
        let dataset = run(&signup(), input);
        assert!(dataset.issues.is_none());
    }

    #[test]
    fn test_runs_when_unrelated_field_fails() {
        let input = json!({"name": "al", "password": "hunter2", "confirm": "nope"});
        let dataset = run(&signup(), input);
        let types: Vec<&str> = dataset.issues.unwrap().iter().map(|i| i.type_name).collect();
        assert_eq!(types, vec!["min_length", "partial_check"]);
    }

    #[test]
    fn test_runs_when_dependency_only_fails_validation() {
        // A failed length check leaves the object typed.
        let input = json!({"name": "alice", "password": "abc", "confirm": "abcd"});
        let dataset = run(&signup(), input);
        let types: Vec<&str> = dataset.issues.unwrap().iter().map(|i| i.type_name).collect();
        assert_eq!(types, vec!["min_length", "partial_check"]);
    }

    #[test]
    fn test_skipped_when_dependency_fails() {
        let dataset = run(&signup(), json!({"name": "alice", "password": "abcd", "confirm": 1234}));
        assert!(!dataset.typed);
        let types: Vec<&str> = dataset.issues.unwrap().iter().map(|i| i.type_name).collect();
        assert_eq!(types, vec!["string"]);
    }

    #[test]
    fn test_skipped_after_root_issue() {
        let dataset = run(&signup(), json!("not an object"));
        let issues = dataset.issues.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].type_name, "object");
    }

    #[test]
    fn test_skipped_under_abort_pipe_early() {
        let config = Config::default().with_abort_pipe_early(true);
        let input = json!({"name": "al", "password": "hunter2", "confirm": "nope"});
        let dataset = signup().run(Dataset::new(input), &config);
        assert_eq!(dataset.issue_count(), 1);
    }

    fn failed_under(path: Vec<PathItem>) -> Dataset {
        let mut dataset = run(&string(), json!(1));
        if let Some(issues) = dataset.issues.as_mut() {
            issues[0].path = Some(path);
        }
        dataset
    }

    #[test]
    fn test_wildcard_matches_array_index() {
        let input = json!({"items": [{"name": 1}]});
        let items = input["items"].clone();
        let mut index = PathItem {
            path_type: PathType::Array,
            origin: Origin::Value,
            input: items.clone(),
            key: "0".to_string(),
            value: Some(items[0].clone()),
        };
        let path = |index: &PathItem| {
            vec![
                PathItem::object_value(input.clone(), "items", Some(items.clone())),
                index.clone(),
                PathItem::object_value(items[0].clone(), "name", Some(json!(1))),
            ]
        };

        let same_field = partial_check([["items", "$", "name"]], |_| false);
        let dataset = same_field.run(failed_under(path(&index)), &Config::default());
        assert_eq!(dataset.issue_count(), 1);

        let other_field = partial_check([["items", "$", "price"]], |_| false);
        let dataset = other_field.run(failed_under(path(&index)), &Config::default());
        assert_eq!(dataset.issue_count(), 2);

        // The wildcard only stands in for array segments.
        index.path_type = PathType::Object;
        let dataset = same_field.run(failed_under(path(&index)), &Config::default());
        assert_eq!(dataset.issue_count(), 2);
    }

    #[test]
    fn test_forward_stops_at_empty_value() {
        let node = forward(partial_check([["a"]], |_| false), ["a", "b"]);
        let mut dataset = Dataset::new(json!({"a": ""}));
        dataset.typed = true;
        let dataset = node.run(dataset, &Config::default());
        let path = dataset.issues.unwrap()[0].path.clone().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].key, "a");
    }

    #[test]
    fn test_forward_walks_nested_path() {
        let node = forward(partial_check([["a"]], |_| false), ["a", "b"]);
        let mut dataset = Dataset::new(json!({"a": {"b": 1}}));
        dataset.typed = true;
        let dataset = node.run(dataset, &Config::default());
        let issue = &dataset.issues.unwrap()[0];
        assert_eq!(issue.dotted_path().as_deref(), Some("a.b"));
    }

    #[test]
    fn test_forward_leaves_earlier_issues_alone() {
        let node = forward(partial_check([["x"]], |_| false), ["x"]);
        let mut dataset = run(&object([("y", string())]), json!({"y": 1}));
        assert_eq!(dataset.issue_count(), 1);
        dataset.typed = true;
        let dataset = node.run(dataset, &Config::default());
        let issues = dataset.issues.unwrap();
        assert_eq!(issues[0].dotted_path().as_deref(), Some("y"));
        assert_eq!(issues[1].dotted_path().as_deref(), Some("x"));
    }
}
