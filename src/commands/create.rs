//! The create command: interview, generation, commit stamp, banner.

use std::env;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use console::style;

use crate::answers::Value;
use crate::generate;
use crate::hooks::{self, CommitLookup};
use crate::interview;
use crate::meta;
use crate::render;

/// Options for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Template directory, optionally suffixed with `#branch`
    pub template: String,
    /// Destination directory; omitted means generate in place
    pub dest: Option<PathBuf>,
    /// Skip the interview and accept every default
    pub yes: bool,
}

/// Execute the create command
pub fn execute_create(options: CreateOptions) -> Result<()> {
    // `#` is the sole signal that a non-default branch was requested
    let (template_source, branch) = match options.template.split_once('#') {
        Some((source, branch)) => (source.to_string(), Some(branch.to_string())),
        None => (options.template.clone(), None),
    };

    let template_dir = PathBuf::from(&template_source);
    ensure!(
        template_dir.is_dir(),
        "template directory {} does not exist",
        template_dir.display()
    );

    let (dest, in_place) = match &options.dest {
        Some(dest) => (dest.clone(), false),
        None => (env::current_dir().context("cannot resolve current directory")?, true),
    };
    let dest_name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "my-project".to_string());

    let mut meta = meta::load(&template_dir)?;

    // the destination name doubles as the project-name default
    if let Some(prompt) = meta.prompts.iter_mut().find(|p| p.name == "name") {
        if prompt.default.is_none() {
            prompt.default = Some(Value::Text(dest_name.clone()));
        }
    }

    let answers = if options.yes {
        meta.default_answers()
    } else {
        interview::run(&meta.prompts)?
    };

    let context = render::context(&answers, &dest_name, in_place)?;
    let template_root = template_dir.join("template");
    let summary = generate::generate(&meta, &template_root, &dest, &context, &answers)?;

    println!(
        "{} Generated {} files ({} excluded)",
        style("✓").green(),
        summary.written,
        summary.skipped
    );

    if let Some(upstream) = &meta.upstream {
        hooks::finalize(&CommitLookup::default(), &dest, upstream, branch.as_deref());
    }

    print_banner(&dest_name, in_place);
    Ok(())
}

fn print_banner(dest_name: &str, in_place: bool) {
    println!("\n---\n");
    println!("All set. Welcome to your new project!");
    println!("\n{}", style("Next steps:").bold());
    if !in_place {
        println!("  {} cd {}", style("$").yellow(), dest_name);
    }
    println!("  {} yarn (or `npm install`)", style("$").yellow());
    println!("  {} yarn run dev (or `npm run dev`)", style("$").yellow());
}
