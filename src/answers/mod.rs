//! The answer model: finalized interview responses keyed by prompt name.
//!
//! Built incrementally while the interview runs, then treated as
//! read-only by every later stage (filtering, rendering, the
//! post-generation hook).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single interview answer.
///
/// Multi-choice answers keep the selection as an ordered list of the
/// chosen option values; derived output (the dependency fragment) follows
/// that order, not the manifest's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl Value {
    /// Truthiness used by bare variable references: booleans directly,
    /// text unless empty, lists unless empty.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// String form used by equality tests. Lists have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Bool(true) => Some("true"),
            Value::Bool(false) => Some("false"),
            Value::Text(s) => Some(s),
            Value::List(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// The finalized set of interview responses, keyed by prompt name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: BTreeMap<String, Value>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answer. Called only while the interview is running;
    /// later stages hold `&Answers` and never mutate.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Truthiness of a named answer; absent answers are falsy.
    pub fn truthy(&self, name: &str) -> bool {
        self.get(name).map(Value::truthy).unwrap_or(false)
    }

    /// Exact, case-sensitive membership test against a list answer.
    /// Absent or non-list answers yield false.
    pub fn member_of(&self, set: &str, member: &str) -> bool {
        match self.get(set) {
            Some(Value::List(items)) => items.iter().any(|item| item == member),
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
