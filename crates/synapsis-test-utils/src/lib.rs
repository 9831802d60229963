//! Testing utilities for the Synapsis workspace
//!
//! Canned generator responses and stub generators shared by the crates' tests.

#![allow(missing_docs)]

use parking_lot::Mutex;
use synapsis_core::{GenerationError, TextGenerator, TOPIC_MARKER};

/// Smallest valid tree
pub const VALID_SIMPLE: &str = "title: Go\nicon: \"🐹\"\nchildren:\n  - title: Goroutines\n  - title: Channels\n";

/// Four levels with every optional field
pub const VALID_COMPLEX: &str = r##"title: "Machine Learning"
icon: "🧠"
color: "#667eea"
expanded: true
children:
  - title: "Supervised"
    icon: "📊"
    color: "#4CAF50"
    children:
      - title: "Regression"
        color: "#8BC34A"
        children:
          - title: "Linear"
            color: "#AED581"
          - title: "Polynomial"
      - title: "Classification"
        expanded: false
        children:
          - title: "Decision Trees"
          - title: "SVM"
  - title: "Unsupervised"
    icon: "🔍"
    color: "#2196F3"
    children:
      - title: "Clustering"
      - title: "Dimensionality Reduction"
  - title: "Reinforcement"
    icon: "🎮"
    color: "#FF9800"
"##;

/// Root and one child missing `title`
pub const INVALID_NO_TITLE: &str = "icon: x\nchildren:\n  - title: A\n  - icon: y\n";

/// `children` given as a scalar
pub const INVALID_CHILDREN_TYPE: &str = "title: Go\nchildren: not-a-list\n";

/// Valid tree wrapped the way models like to answer
pub const FENCED_TREE: &str = "```yaml\n# Mind map for Go\ntitle: Go\nchildren:\n  # first branch\n  - title: Goroutines\n```";

/// Returns the same response for every prompt
#[derive(Debug, Clone)]
pub struct StubGenerator {
    response: String,
}

impl StubGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl TextGenerator for StubGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }
}

/// Records every prompt and replays responses in order, repeating the last
#[derive(Debug)]
pub struct RecordingGenerator {
    responses: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl TextGenerator for RecordingGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut prompts = self.prompts.lock();
        let index = prompts.len().min(self.responses.len().saturating_sub(1));
        prompts.push(prompt.to_string());
        Ok(self.responses.get(index).cloned().unwrap_or_default())
    }
}

/// Always fails with the given message
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(self.message.clone().into())
    }
}

/// Answers with a one-node tree titled after the prompt's topic
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicEchoGenerator;

impl TextGenerator for TopicEchoGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let topic = prompt
            .lines()
            .find_map(|line| line.strip_prefix(TOPIC_MARKER))
            .ok_or("prompt carries no topic")?;
        Ok(format!("title: \"{}\"\nchildren:\n  - title: Overview\n", topic.replace('"', "'")))
    }
}
