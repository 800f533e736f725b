#![forbid(unsafe_code)]

//! # lath
//!
//! Interview-driven project scaffolding for conditional file templates.
//!
//! lath asks a template's questions, decides per-file inclusion from a
//! declarative filter rule set, renders conditional fragments through
//! Handlebars helpers, and best-effort-stamps the upstream commit into
//! the generated README.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lath::{generate, meta, render};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let template_dir = Path::new("electron-vue");
//!     let meta = meta::load(template_dir)?;
//!
//!     // resolve every prompt to its default
//!     let answers = meta.default_answers();
//!
//!     let context = render::context(&answers, "my-app", false)?;
//!     generate::generate(
//!         &meta,
//!         &template_dir.join("template"),
//!         Path::new("my-app"),
//!         &context,
//!         &answers,
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod answers;
pub mod commands;
pub mod error;
pub mod expr;
pub mod filters;
pub mod generate;
pub mod hooks;
pub mod interview;
pub mod meta;
pub mod render;

// Re-exports
pub use answers::{Answers, Value};
pub use error::{Result, ScaffoldError};
pub use expr::Expr;
pub use filters::FilterSet;
pub use hooks::{finalize, CommitLookup, LookupError};
pub use meta::{Choice, Prompt, PromptKind, TemplateMeta};
pub use render::Engine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
