use serde_json::Value;

use crate::issue::Issue;

/// Working state threaded through one validation run.
///
/// Each node takes the dataset by value and hands it back, so a run owns
/// exactly one accumulator from start to finish.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Current value, possibly rebuilt or transformed by earlier nodes.
    pub value: Value,
    /// Whether the value is known to match the schema's type.
    pub typed: bool,
    /// Issues collected so far, absent until the first one.
    pub issues: Option<Vec<Issue>>,
}

impl Dataset {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            typed: false,
            issues: None,
        }
    }

    pub fn has_issues(&self) -> bool {
        self.issues.is_some()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.as_ref().map_or(0, Vec::len)
    }

    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.get_or_insert_with(Vec::new).push(issue);
    }

    pub fn extend_issues(&mut self, issues: Vec<Issue>) {
        if issues.is_empty() {
            return;
        }
        self.issues.get_or_insert_with(Vec::new).extend(issues);
    }

    /// Issues added after the first `since` entries.
    pub fn issues_since_mut(&mut self, since: usize) -> &mut [Issue] {
        match self.issues.as_mut() {
            Some(issues) if since < issues.len() => &mut issues[since..],
            _ => &mut [],
        }
    }
}
