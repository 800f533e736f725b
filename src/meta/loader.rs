//! Manifest loading and fail-fast validation.
//!
//! The electron-vue manifest ships embedded in the binary; a template
//! directory may carry its own `meta.json`, which replaces the built-in
//! wholesale. Every expression is parsed and name-checked here, before
//! any file is written: a malformed rule should abort the run up front,
//! not halfway through generation.

use std::collections::BTreeSet;
use std::path::Path;

use crate::answers::Value;
use crate::error::{Result, ScaffoldError};
use crate::expr::Expr;
use crate::filters::FilterSet;

use super::types::{Choice, PromptKind, RawManifest, RawPrompt};
use super::{Prompt, TemplateMeta};

/// The built-in electron-vue manifest, compiled and validated.
pub fn builtin() -> Result<TemplateMeta> {
    let json = include_str!("../../templates/electron-vue.meta.json");
    compile(serde_json::from_str(json)?)
}

/// Load the manifest for a template directory: its own `meta.json` if
/// present, otherwise the embedded default.
pub fn load(template_dir: &Path) -> Result<TemplateMeta> {
    let manifest_path = template_dir.join("meta.json");
    if manifest_path.exists() {
        tracing::debug!("loading manifest from {}", manifest_path.display());
        let json = std::fs::read_to_string(&manifest_path)?;
        compile(serde_json::from_str(&json)?)
    } else {
        tracing::debug!("no meta.json in template, using built-in manifest");
        builtin()
    }
}

/// Validate a raw manifest and compile its expressions.
fn compile(raw: RawManifest) -> Result<TemplateMeta> {
    let mut prompts = Vec::with_capacity(raw.prompts.len());
    let mut defined: BTreeSet<String> = BTreeSet::new();

    for raw_prompt in raw.prompts {
        let prompt = compile_prompt(raw_prompt, &defined)?;
        if !defined.insert(prompt.name.clone()) {
            return Err(ScaffoldError::Configuration(format!(
                "prompt `{}` is defined twice",
                prompt.name
            )));
        }
        prompts.push(prompt);
    }

    // Every multi-choice option must have a pinned version, so the
    // `deps` helper can never see an unknown plugin at render time.
    if !raw.dependencies.is_empty() {
        for prompt in &prompts {
            if prompt.kind != PromptKind::MultiChoice {
                continue;
            }
            for choice in &prompt.choices {
                if !raw.dependencies.contains_key(&choice.value) {
                    return Err(ScaffoldError::Configuration(format!(
                        "prompt `{}`: plugin `{}` has no entry in the dependency table",
                        prompt.name, choice.value
                    )));
                }
            }
        }
    }

    let mut rules = Vec::with_capacity(raw.filters.len());
    for (pattern, source) in raw.filters {
        let expr = Expr::parse(&source).map_err(|e| {
            ScaffoldError::Configuration(format!("filter rule `{}`: {}", pattern, e))
        })?;
        for name in expr.names() {
            if !defined.contains(name) {
                return Err(ScaffoldError::Configuration(format!(
                    "filter rule `{}`: unknown variable `{}`",
                    pattern, name
                )));
            }
        }
        rules.push((pattern, expr));
    }

    Ok(TemplateMeta {
        upstream: raw.upstream,
        prompts,
        filters: FilterSet::compile(rules)?,
        dependencies: raw.dependencies,
    })
}

fn compile_prompt(raw: RawPrompt, defined: &BTreeSet<String>) -> Result<Prompt> {
    let choices: Vec<Choice> = raw.choices.into_iter().map(Choice::from).collect();

    let is_choice_kind = matches!(
        raw.kind,
        PromptKind::SingleChoice | PromptKind::MultiChoice
    );
    if is_choice_kind && choices.is_empty() {
        return Err(ScaffoldError::Configuration(format!(
            "prompt `{}`: choice prompts need at least one choice",
            raw.name
        )));
    }

    // A `when` expression may only look backwards; forward or unknown
    // references would make visibility depend on answers that do not
    // exist yet.
    let when = match raw.when {
        Some(source) => {
            let expr = Expr::parse(&source).map_err(|e| {
                ScaffoldError::Configuration(format!("prompt `{}`: {}", raw.name, e))
            })?;
            for name in expr.names() {
                if !defined.contains(name) {
                    return Err(ScaffoldError::Visibility(format!(
                        "prompt `{}`: references `{}` before it is defined",
                        raw.name, name
                    )));
                }
            }
            Some(expr)
        }
        None => None,
    };

    let default = raw
        .default
        .map(|value| typed_default(&raw.name, raw.kind, &choices, value))
        .transpose()?;

    Ok(Prompt {
        name: raw.name,
        kind: raw.kind,
        message: raw.message,
        required: raw.required,
        default,
        choices,
        when,
    })
}

/// Check a declared default against the prompt's kind (and its choice
/// values for the choice kinds).
fn typed_default(
    name: &str,
    kind: PromptKind,
    choices: &[Choice],
    value: serde_json::Value,
) -> Result<Value> {
    let mismatch = || {
        ScaffoldError::Configuration(format!(
            "prompt `{}`: default does not match its kind",
            name
        ))
    };

    match kind {
        PromptKind::Text => match value {
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            _ => Err(mismatch()),
        },
        PromptKind::Boolean => match value {
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            _ => Err(mismatch()),
        },
        PromptKind::SingleChoice => match value {
            serde_json::Value::String(s) => {
                if choices.iter().any(|c| c.value == s) {
                    Ok(Value::Text(s))
                } else {
                    Err(ScaffoldError::Configuration(format!(
                        "prompt `{}`: default `{}` is not one of its choices",
                        name, s
                    )))
                }
            }
            _ => Err(mismatch()),
        },
        PromptKind::MultiChoice => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let mut selected = Vec::with_capacity(items.len());
            for item in items {
                let text = item.as_str().ok_or_else(mismatch)?;
                if !choices.iter().any(|c| c.value == text) {
                    return Err(ScaffoldError::Configuration(format!(
                        "prompt `{}`: default `{}` is not one of its choices",
                        name, text
                    )));
                }
                selected.push(text.to_string());
            }
            Ok(Value::List(selected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_json(json: &str) -> Result<TemplateMeta> {
        compile(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_builtin_manifest_loads() {
        let meta = builtin().expect("built-in manifest must validate");
        assert!(meta.prompts.iter().any(|p| p.name == "plugins"));
        assert!(!meta.filters.is_empty());
        assert_eq!(meta.upstream.as_deref(), Some("SimulatedGREG/electron-vue"));
    }

    #[test]
    fn test_builtin_plugins_default_to_all() {
        let meta = builtin().unwrap();
        let plugins = meta.prompts.iter().find(|p| p.name == "plugins").unwrap();
        let default = plugins.default_value();
        let Value::List(selected) = default else {
            panic!("plugins default must be a list");
        };
        assert_eq!(selected.len(), plugins.choices.len());
    }

    #[test]
    fn test_template_meta_json_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("meta.json"),
            r#"{ "prompts": [ { "name": "name", "kind": "text", "message": "Name" } ] }"#,
        )
        .unwrap();
        let meta = load(dir.path()).unwrap();
        assert_eq!(meta.prompts.len(), 1);
        assert!(meta.filters.is_empty());
    }

    #[test]
    fn test_missing_meta_json_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let meta = load(dir.path()).unwrap();
        assert!(meta.prompts.iter().any(|p| p.name == "builder"));
    }

    #[test]
    fn test_unknown_variable_in_filter_names_the_rule() {
        let err = compile_json(
            r#"{
                "prompts": [ { "name": "unit", "kind": "boolean", "message": "Unit tests?" } ],
                "filters": { "test/**/*": "unit || e2e" }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
        assert!(err.to_string().contains("test/**/*"));
        assert!(err.to_string().contains("e2e"));
    }

    #[test]
    fn test_malformed_filter_expression_fails_at_load() {
        let err = compile_json(
            r#"{
                "prompts": [ { "name": "unit", "kind": "boolean", "message": "Unit tests?" } ],
                "filters": { "test/**/*": "unit &&" }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
    }

    #[test]
    fn test_forward_when_reference_is_visibility_error() {
        let err = compile_json(
            r#"{
                "prompts": [
                    { "name": "eslintConfig", "kind": "text", "message": "Config?", "when": "eslint" },
                    { "name": "eslint", "kind": "boolean", "message": "Lint?" }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Visibility(_)));
        assert!(err.to_string().contains("eslintConfig"));
        assert!(err.to_string().contains("eslint"));
    }

    #[test]
    fn test_duplicate_prompt_name_rejected() {
        let err = compile_json(
            r#"{
                "prompts": [
                    { "name": "unit", "kind": "boolean", "message": "Unit?" },
                    { "name": "unit", "kind": "boolean", "message": "Again?" }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
    }

    #[test]
    fn test_plugin_without_dependency_entry_rejected() {
        let err = compile_json(
            r#"{
                "prompts": [
                    {
                        "name": "plugins",
                        "kind": "multi-choice",
                        "message": "Plugins?",
                        "choices": ["axios", "left-pad"]
                    }
                ],
                "dependencies": { "axios": "^0.16.1" }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
        assert!(err.to_string().contains("left-pad"));
    }

    #[test]
    fn test_choice_prompt_without_choices_rejected() {
        let err = compile_json(
            r#"{
                "prompts": [
                    { "name": "builder", "kind": "single-choice", "message": "Builder?" }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
    }

    #[test]
    fn test_default_kind_mismatch_rejected() {
        let err = compile_json(
            r#"{
                "prompts": [
                    { "name": "unit", "kind": "boolean", "message": "Unit?", "default": "yes" }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
    }

    #[test]
    fn test_single_choice_default_must_be_a_choice() {
        let err = compile_json(
            r#"{
                "prompts": [
                    {
                        "name": "builder",
                        "kind": "single-choice",
                        "message": "Builder?",
                        "default": "webpack",
                        "choices": [
                            { "name": "packager", "value": "packager" },
                            { "name": "builder", "value": "builder" }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("webpack"));
    }
}
