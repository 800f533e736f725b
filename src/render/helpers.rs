//! Template helpers registered on the render engine.
//!
//! The template family's original helper names are kept verbatim so its
//! template text renders unchanged:
//!
//! - `{{#isEnabled <flags> '<key>'}}…{{else}}…{{/isEnabled}}` gates an
//!   inline fragment on one flag, independent of whole-file inclusion.
//! - `{{deps <plugins>}}` writes the selected plugins' manifest lines
//!   from the dependency table.
//! - `{{#testing <unit> <e2e>}}…{{/testing}}` renders its body iff at
//!   least one flag is set; there is no else branch, only omission.

use std::collections::BTreeMap;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, Renderable,
};
use serde_json::Value as Json;

use crate::error::{Result, ScaffoldError};

/// Produce the manifest fragment for the selected plugins, in selection
/// order: a leading `,\n` separator when anything is selected, one
/// indented `"name": "version"` line per plugin, comma-joined with no
/// trailing comma. An empty selection yields an empty string.
pub fn dependency_fragment(selected: &[String], table: &BTreeMap<String, String>) -> Result<String> {
    if selected.is_empty() {
        return Ok(String::new());
    }

    let mut lines = Vec::with_capacity(selected.len());
    for name in selected {
        let version = table.get(name).ok_or_else(|| {
            ScaffoldError::Configuration(format!(
                "plugin `{}` has no entry in the dependency table",
                name
            ))
        })?;
        lines.push(format!("    \"{}\": \"{}\"", name, version));
    }

    Ok(format!(",\n{}", lines.join(",\n")))
}

/// The testing section appears iff either test harness was requested.
pub fn testing_enabled(unit: bool, e2e: bool) -> bool {
    unit || e2e
}

/// Truthiness of `key` inside a helper parameter: membership for a
/// list, key truthiness for an object, the bool itself otherwise.
fn key_enabled(flags: &Json, key: &str) -> bool {
    match flags {
        Json::Array(items) => items.iter().any(|item| item.as_str() == Some(key)),
        Json::Object(map) => map.get(key).map(json_truthy).unwrap_or(false),
        Json::Bool(b) => *b,
        _ => false,
    }
}

fn json_truthy(value: &Json) -> bool {
    match value {
        Json::Bool(b) => *b,
        Json::String(s) => !s.is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Object(map) => !map.is_empty(),
        Json::Number(n) => n.as_f64() != Some(0.0),
        Json::Null => false,
    }
}

fn missing_param(helper: &'static str, index: usize) -> RenderError {
    RenderErrorReason::ParamNotFoundForIndex(helper, index).into()
}

pub struct IsEnabledHelper;

impl HelperDef for IsEnabledHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let flags = h
            .param(0)
            .map(|p| p.value())
            .ok_or_else(|| missing_param("isEnabled", 0))?;
        let key = h
            .param(1)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| missing_param("isEnabled", 1))?;

        let branch = if key_enabled(flags, key) {
            h.template()
        } else {
            h.inverse()
        };
        if let Some(template) = branch {
            template.render(r, ctx, rc, out)?;
        }
        Ok(())
    }
}

pub struct TestingHelper;

impl HelperDef for TestingHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let unit = h.param(0).map(|p| json_truthy(p.value())).unwrap_or(false);
        let e2e = h.param(1).map(|p| json_truthy(p.value())).unwrap_or(false);

        if testing_enabled(unit, e2e) {
            if let Some(template) = h.template() {
                template.render(r, ctx, rc, out)?;
            }
        }
        Ok(())
    }
}

/// Inline `deps` helper closing over the manifest's dependency table.
pub struct DepsHelper {
    pub table: BTreeMap<String, String>,
}

impl HelperDef for DepsHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let selected: Vec<String> = match h.param(0).map(|p| p.value()) {
            Some(Json::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            // tolerate an absent plugins answer (prompt skipped)
            Some(Json::Null) | None => Vec::new(),
            Some(other) => {
                return Err(RenderErrorReason::Other(format!(
                    "deps expects a list of plugin names, got {}",
                    other
                ))
                .into())
            }
        };

        let fragment = dependency_fragment(&selected, &self.table)
            .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
        out.write(&fragment)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BTreeMap<String, String> {
        [
            ("axios", "^0.16.1"),
            ("vue-electron", "^1.0.6"),
            ("vue-router", "^2.5.3"),
            ("vuex", "^2.3.1"),
            ("vue-spacebro-client", "^1.0.0"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_fragment_follows_input_order() {
        let selected = vec!["vuex".to_string(), "axios".to_string()];
        let fragment = dependency_fragment(&selected, &table()).unwrap();
        assert_eq!(
            fragment,
            ",\n    \"vuex\": \"^2.3.1\",\n    \"axios\": \"^0.16.1\""
        );
    }

    #[test]
    fn test_fragment_has_no_trailing_comma() {
        let selected = vec!["vue-router".to_string()];
        let fragment = dependency_fragment(&selected, &table()).unwrap();
        assert_eq!(fragment, ",\n    \"vue-router\": \"^2.5.3\"");
        assert!(!fragment.ends_with(','));
    }

    #[test]
    fn test_empty_selection_yields_empty_fragment() {
        assert_eq!(dependency_fragment(&[], &table()).unwrap(), "");
    }

    #[test]
    fn test_unknown_plugin_is_configuration_error() {
        let selected = vec!["left-pad".to_string()];
        let err = dependency_fragment(&selected, &table()).unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
        assert!(err.to_string().contains("left-pad"));
    }

    #[test]
    fn test_testing_enabled_truth_table() {
        assert!(testing_enabled(true, false));
        assert!(testing_enabled(false, true));
        assert!(testing_enabled(true, true));
        assert!(!testing_enabled(false, false));
    }

    #[test]
    fn test_key_enabled_on_list_object_and_bool() {
        let list = serde_json::json!(["axios", "vuex"]);
        assert!(key_enabled(&list, "vuex"));
        assert!(!key_enabled(&list, "vue-router"));

        let object = serde_json::json!({ "vuex": true, "vue-router": false });
        assert!(key_enabled(&object, "vuex"));
        assert!(!key_enabled(&object, "vue-router"));
        assert!(!key_enabled(&object, "axios"));

        assert!(key_enabled(&serde_json::json!(true), "anything"));
        assert!(!key_enabled(&serde_json::json!(null), "anything"));
    }
}
