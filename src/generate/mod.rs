//! The copy/render engine: walks the template tree, consults the filter
//! rule set per file, and writes included files into the destination.
//!
//! Included UTF-8 files pass through the render engine; binary content
//! (the template trees ship icons) is copied verbatim. Paths are
//! matched root-relative with `/` separators regardless of platform.

use std::fs;
use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

use crate::answers::Answers;
use crate::meta::TemplateMeta;
use crate::render::Engine;

/// Outcome of one generation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
}

/// Generate the project: every file under `template_root` is either
/// excluded by its filter rule, rendered, or copied.
pub fn generate(
    meta: &TemplateMeta,
    template_root: &Path,
    dest: &Path,
    context: &serde_json::Value,
    answers: &Answers,
) -> Result<Summary> {
    if !template_root.is_dir() {
        bail!(
            "template directory {} has no template/ subtree",
            template_root.display()
        );
    }

    let engine = Engine::new(&meta.dependencies);
    let mut summary = Summary::default();

    for entry in WalkDir::new(template_root) {
        let entry = entry.context("failed to walk template tree")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(template_root)
            .context("walked path outside template root")?;
        let rule_path = slash_path(relative);

        if !meta.should_include(&rule_path, answers) {
            if let Some(rule) = meta.filters.matching_rule(&rule_path) {
                tracing::debug!("excluded {} (rule `{}`)", rule_path, rule.pattern_text());
            }
            summary.skipped += 1;
            continue;
        }

        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let bytes = fs::read(entry.path())
            .with_context(|| format!("failed to read {}", entry.path().display()))?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                let rendered = engine
                    .render(&text, context)
                    .with_context(|| format!("failed to render {}", rule_path))?;
                fs::write(&target, rendered)
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }
            Err(raw) => {
                fs::write(&target, raw.into_bytes())
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }
        }

        tracing::debug!("wrote {}", rule_path);
        summary.written += 1;
    }

    Ok(summary)
}

/// Root-relative path with `/` separators, the form the filter rules
/// are written against.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_path_joins_components() {
        let path = Path::new("test").join("unit").join("index.js");
        assert_eq!(slash_path(&path), "test/unit/index.js");
    }

    #[test]
    fn test_missing_template_root_errors() {
        let meta = crate::meta::builtin().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = generate(
            &meta,
            &dir.path().join("template"),
            dir.path(),
            &serde_json::json!({}),
            &Answers::new(),
        );
        assert!(result.is_err());
    }
}
