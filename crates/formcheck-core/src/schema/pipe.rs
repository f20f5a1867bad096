use super::{Node, Run};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::issue::Kind;

/// Runs a schema followed by validations and transformations in order.
#[derive(Debug, Clone)]
pub struct Pipe {
    steps: Vec<Node>,
}

impl Pipe {
    pub fn new(steps: Vec<Node>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Node] {
        &self.steps
    }

    pub fn first(&self) -> Option<&Node> {
        self.steps.first()
    }

    pub(crate) fn map_first(mut self, f: impl FnOnce(Node) -> Node) -> Self {
        if !self.steps.is_empty() {
            let first = self.steps.remove(0);
            self.steps.insert(0, f(first));
        }
        self
    }
}

impl Run for Pipe {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        for step in &self.steps {
            let kind = step.kind();
            if kind == Kind::Metadata {
                continue;
            }
            // A later schema or transformation cannot trust a value that
            // already failed.
            if dataset.has_issues() && matches!(kind, Kind::Schema | Kind::Transformation) {
                dataset.typed = false;
                break;
            }
            if !dataset.has_issues() || !(config.abort_early || config.abort_pipe_early) {
                dataset = step.run(dataset, config);
            }
        }
        dataset
    }
}

pub fn pipe(steps: impl IntoIterator<Item = Node>) -> Node {
    Node::Pipe(Pipe::new(steps.into_iter().collect()))
}
