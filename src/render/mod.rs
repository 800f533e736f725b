//! The render engine: Handlebars with the template family's helpers.
//!
//! HTML escaping is disabled because the output is source code, not
//! markup; an apostrophe in a project description must survive
//! rendering. Absent variables render as empty text (non-strict mode),
//! matching how the original templates treat skipped answers.

pub mod helpers;

pub use helpers::{dependency_fragment, testing_enabled};

use std::collections::BTreeMap;

use handlebars::{no_escape, Handlebars};

use crate::answers::Answers;
use crate::error::Result;
use crate::render::helpers::{DepsHelper, IsEnabledHelper, TestingHelper};

/// A configured Handlebars instance with `isEnabled`, `deps`, and
/// `testing` registered. Built once per run from the manifest's
/// dependency table.
pub struct Engine {
    handlebars: Handlebars<'static>,
}

impl Engine {
    pub fn new(dependencies: &BTreeMap<String, String>) -> Engine {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("isEnabled", Box::new(IsEnabledHelper));
        handlebars.register_helper("testing", Box::new(TestingHelper));
        handlebars.register_helper(
            "deps",
            Box::new(DepsHelper {
                table: dependencies.clone(),
            }),
        );
        Engine { handlebars }
    }

    /// Render one template file's text against the run's context.
    pub fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.handlebars.render_template(template, context)?)
    }
}

/// Assemble the render context: every answer by prompt name, plus the
/// `destDirName` and `inPlace` extras the templates reference.
pub fn context(answers: &Answers, dest_dir_name: &str, in_place: bool) -> Result<serde_json::Value> {
    let mut context = serde_json::to_value(answers)?;
    if let Some(map) = context.as_object_mut() {
        map.insert(
            "destDirName".to_string(),
            serde_json::Value::String(dest_dir_name.to_string()),
        );
        map.insert("inPlace".to_string(), serde_json::Value::Bool(in_place));
    }
    Ok(context)
}
