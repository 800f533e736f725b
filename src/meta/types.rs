//! Raw serde types matching the template manifest JSON.
//!
//! These mirror the on-disk shape exactly; [`super::loader`] validates
//! them and compiles the expression strings into parsed form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A template manifest as read from `meta.json` (or the embedded
/// default). Prompts are ordered; filters and dependencies are keyed
/// maps whose ordering never matters at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawManifest {
    /// GitHub `owner/repo` slug the post-generation hook queries.
    #[serde(default)]
    pub upstream: Option<String>,

    pub prompts: Vec<RawPrompt>,

    /// Path pattern -> boolean expression gating file inclusion.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,

    /// Fixed package -> version-constraint table for the `deps` helper.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// One interview question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPrompt {
    pub name: String,
    pub kind: PromptKind,
    pub message: String,

    #[serde(default)]
    pub required: bool,

    /// Default value; its JSON type must match `kind` (checked at load).
    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// Required for the choice kinds, rejected otherwise.
    #[serde(default)]
    pub choices: Vec<RawChoice>,

    /// Visibility expression over earlier prompts' answers.
    #[serde(default)]
    pub when: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    Text,
    Boolean,
    SingleChoice,
    MultiChoice,
}

/// A choice either spells out its descriptor or is a bare string that
/// serves as both label and value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChoice {
    Plain(String),
    Full {
        name: String,
        value: String,
        #[serde(default)]
        short: Option<String>,
    },
}

/// Normalized option descriptor: display label, underlying value, and
/// an optional short label for summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub value: String,
    pub short: Option<String>,
}

impl From<RawChoice> for Choice {
    fn from(raw: RawChoice) -> Self {
        match raw {
            RawChoice::Plain(text) => Choice {
                name: text.clone(),
                value: text,
                short: None,
            },
            RawChoice::Full { name, value, short } => Choice { name, value, short },
        }
    }
}
