//! The template manifest: prompt schema, filter rules, dependency table.
//!
//! Loaded once per run and never mutated. [`loader`] reads and
//! validates the raw JSON; the compiled [`TemplateMeta`] here carries
//! parsed visibility expressions and the pre-scored filter set.

mod loader;
pub mod types;

pub use loader::{builtin, load};
pub use types::{Choice, PromptKind};

use std::collections::BTreeMap;

use crate::answers::{Answers, Value};
use crate::expr::Expr;
use crate::filters::FilterSet;

/// One compiled prompt definition.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub name: String,
    pub kind: PromptKind,
    pub message: String,
    pub required: bool,
    /// Typed default, checked against `kind` at load.
    pub default: Option<Value>,
    pub choices: Vec<Choice>,
    /// Visibility expression; `None` means always visible.
    pub when: Option<Expr>,
}

impl Prompt {
    /// Whether this prompt should be surfaced given the answers
    /// collected so far. Prompts without a `when` expression are
    /// always visible.
    pub fn visible_given(&self, answers: &Answers) -> bool {
        match &self.when {
            Some(expr) => expr.evaluate(answers),
            None => true,
        }
    }

    /// The value this prompt takes when every default is accepted:
    /// its declared default, or the kind's empty value (empty text,
    /// `false`, the first choice, the empty selection).
    pub fn default_value(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match self.kind {
            PromptKind::Text => Value::Text(String::new()),
            PromptKind::Boolean => Value::Bool(false),
            PromptKind::SingleChoice => Value::Text(
                self.choices
                    .first()
                    .map(|c| c.value.clone())
                    .unwrap_or_default(),
            ),
            PromptKind::MultiChoice => Value::List(Vec::new()),
        }
    }
}

/// A fully validated template manifest.
#[derive(Debug, Clone)]
pub struct TemplateMeta {
    /// GitHub `owner/repo` slug for the post-generation commit stamp.
    pub upstream: Option<String>,
    /// Prompts in interview order.
    pub prompts: Vec<Prompt>,
    pub filters: FilterSet,
    /// Package -> version constraint, consumed by the `deps` helper.
    pub dependencies: BTreeMap<String, String>,
}

impl TemplateMeta {
    /// Prompts currently visible, in declaration order.
    pub fn visible_prompts(&self, answers: &Answers) -> Vec<&Prompt> {
        self.prompts
            .iter()
            .filter(|p| p.visible_given(answers))
            .collect()
    }

    /// Resolve every prompt to its default, walking forward so each
    /// visibility expression sees the defaults chosen before it.
    /// Prompts whose visibility comes out false leave no answer behind.
    pub fn default_answers(&self) -> Answers {
        let mut answers = Answers::new();
        for prompt in &self.prompts {
            if prompt.visible_given(&answers) {
                answers.insert(prompt.name.clone(), prompt.default_value());
            }
        }
        answers
    }

    /// Per-file inclusion decision, delegated to the filter set.
    pub fn should_include(&self, path: &str, answers: &Answers) -> bool {
        self.filters.should_include(path, answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(name: &str, kind: PromptKind, when: Option<&str>) -> Prompt {
        Prompt {
            name: name.to_string(),
            kind,
            message: name.to_string(),
            required: false,
            default: None,
            choices: vec![],
            when: when.map(|w| Expr::parse(w).unwrap()),
        }
    }

    #[test]
    fn test_prompt_without_when_is_always_visible() {
        let p = prompt("unit", PromptKind::Boolean, None);
        assert!(p.visible_given(&Answers::new()));

        let mut answers = Answers::new();
        answers.insert("eslint", false);
        assert!(p.visible_given(&answers));
    }

    #[test]
    fn test_when_expression_gates_visibility() {
        let p = prompt("eslintConfig", PromptKind::SingleChoice, Some("eslint"));
        let mut answers = Answers::new();
        answers.insert("eslint", true);
        assert!(p.visible_given(&answers));

        let mut answers = Answers::new();
        answers.insert("eslint", false);
        assert!(!p.visible_given(&answers));
    }

    #[test]
    fn test_default_value_per_kind() {
        assert_eq!(
            prompt("name", PromptKind::Text, None).default_value(),
            Value::Text(String::new())
        );
        assert_eq!(
            prompt("unit", PromptKind::Boolean, None).default_value(),
            Value::Bool(false)
        );
        assert_eq!(
            prompt("plugins", PromptKind::MultiChoice, None).default_value(),
            Value::List(vec![])
        );
    }

    #[test]
    fn test_single_choice_defaults_to_first_choice() {
        let mut p = prompt("builder", PromptKind::SingleChoice, None);
        p.choices = vec![
            Choice {
                name: "electron-packager".to_string(),
                value: "packager".to_string(),
                short: Some("packager".to_string()),
            },
            Choice {
                name: "electron-builder".to_string(),
                value: "builder".to_string(),
                short: Some("builder".to_string()),
            },
        ];
        assert_eq!(p.default_value(), Value::Text("packager".to_string()));
    }

    #[test]
    fn test_default_answers_honors_visibility() {
        let mut gate = prompt("eslint", PromptKind::Boolean, None);
        gate.default = Some(Value::Bool(false));
        let dependent = prompt("eslintConfig", PromptKind::SingleChoice, Some("eslint"));

        let meta = TemplateMeta {
            upstream: None,
            prompts: vec![gate, dependent],
            filters: FilterSet::default(),
            dependencies: BTreeMap::new(),
        };

        let answers = meta.default_answers();
        assert_eq!(answers.get("eslint"), Some(&Value::Bool(false)));
        // skipped prompt leaves no key at all
        assert!(!answers.contains_key("eslintConfig"));
    }

    #[test]
    fn test_visible_prompts_preserves_order() {
        let meta = TemplateMeta {
            upstream: None,
            prompts: vec![
                prompt("unit", PromptKind::Boolean, None),
                prompt("e2e", PromptKind::Boolean, None),
            ],
            filters: FilterSet::default(),
            dependencies: BTreeMap::new(),
        };
        let visible = meta.visible_prompts(&Answers::new());
        let names: Vec<&str> = visible.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["unit", "e2e"]);
    }
}
