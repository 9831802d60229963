//! Prompt-building agents
//!
//! Two agents share the injected generator:
//! - [`Planner`]: concise 2-3 level outline, short titles
//! - [`Expander`]: detailed 4-5 level tree with icons and a depth color palette,
//!   optionally seeded with a prior plan and a style hint
//!
//! Both ask for bare YAML starting with `title:`. Models ignore that often
//! enough that the output still goes through the sanitizer and validator.

use crate::generator::{GenerationError, TextGenerator};

/// Marker placed before the topic in every prompt
pub const TOPIC_MARKER: &str = "TOPIC: ";

const PLAN_PROMPT: &str = r#"You are a MASTER mind-map planner.

Task: extract the MAIN concepts of the topic and structure a CONCISE mind map.

FORMAT (pure YAML):
title: "Topic"
icon: "🎯"
children:
  - title: "Concept 1"
    children:
      - title: "Detail"

RULES:
- ONLY pure YAML (no ``` fences, no explanations)
- At most 3 words per title
- 2-3 levels deep
- Essential concepts only
- Start with "title:"

{topic_line}

YAML:"#;

const EXPAND_PROMPT: &str = r##"You are an ADVANCED mind-map generator that answers in PURE YAML.
The output is parsed by a YAML parser and rendered as HTML.

CRITICAL - ANSWER WITH VALID YAML ONLY:
- NO code blocks (```)
- NO explanations
- NO comments
- Start DIRECTLY with "title:"

STRUCTURE (every node):
title: "Text"        (at most 5 words)
icon: "🎯"           (relevant emoji)
color: "#HEX"        (hex color)
expanded: true       (optional)
children:            (sub-nodes)

COLOR PALETTE:
Level 0: #667eea
Level 1: #4CAF50, #2196F3, #FF9800, #E91E63
Level 2: #8BC34A, #64B5F6, #FFB74D, #F06292
Level 3+: #AED581, #90CAF9, #FFCC80, #F48FB1

LAYOUT:
- 5-8 children per node
- 4-5 levels deep
- Descriptive titles
- Progressive colors by level

{topic_line}
{plan_section}
{style_section}

GENERATE A DETAILED, EXPANSIVE YAML MIND MAP (starting with "title:"):"##;

fn topic_line(topic: &str) -> String {
    format!("{TOPIC_MARKER}{topic}")
}

/// Concise planning prompt for `topic`
#[must_use]
pub fn plan_prompt(topic: &str) -> String {
    PLAN_PROMPT.replace("{topic_line}", &topic_line(topic))
}

/// Detailed expansion prompt for `topic`
///
/// Empty `plan` or `style` leave their section out.
#[must_use]
pub fn expand_prompt(topic: &str, plan: &str, style: &str) -> String {
    let plan_section = if plan.is_empty() {
        String::new()
    } else {
        format!("BASE PLAN:\n{plan}")
    };
    let style_section = if style.is_empty() {
        String::new()
    } else {
        format!("STYLE: {style}")
    };

    // Topic goes last so user text cannot inject the other placeholders.
    EXPAND_PROMPT
        .replace("{plan_section}", &plan_section)
        .replace("{style_section}", &style_section)
        .replace("{topic_line}", &topic_line(topic))
}

/// Master agent: concise 2-3 level plan
#[derive(Debug)]
pub struct Planner<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> Planner<'a, G> {
    /// Create planner over generator
    #[inline]
    #[must_use]
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    /// Generate the raw plan for `topic`
    ///
    /// # Errors
    /// The generator's error, unchanged.
    pub fn create(&self, topic: &str) -> Result<String, GenerationError> {
        self.generator.generate(&plan_prompt(topic))
    }
}

/// Expansion agent: detailed 4-5 level tree
#[derive(Debug)]
pub struct Expander<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> Expander<'a, G> {
    /// Create expander over generator
    #[inline]
    #[must_use]
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    /// Generate the raw expanded tree for `topic`
    ///
    /// # Errors
    /// The generator's error, unchanged.
    pub fn expand(&self, topic: &str, plan: &str, style: &str) -> Result<String, GenerationError> {
        self.generator.generate(&expand_prompt(topic, plan, style))
    }
}
