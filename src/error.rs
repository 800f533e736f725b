//! Error types for lath.
//!
//! Manifest problems are split into two fatal categories so messages can
//! name the offending rule or prompt: `Configuration` for malformed
//! expressions, unknown variables, unknown plugins, and bad glob
//! patterns; `Visibility` for `when` expressions that reference prompts
//! not yet defined. Both surface at manifest load, before any file is
//! written. The post-generation lookup has its own non-fatal error type
//! in [`crate::hooks`].

use thiserror::Error;

/// Main error type for lath operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Invalid static configuration: expression syntax, unknown variable,
    /// unknown plugin, or malformed glob pattern. Fatal at load time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A visibility expression references a prompt that is not defined
    /// earlier in the schema. Fatal at load time.
    #[error("visibility error: {0}")]
    Visibility(String),

    /// Underlying I/O failure while reading a manifest or template file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Manifest JSON could not be deserialized.
    #[error("manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template text failed to render.
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

/// Result type alias for lath operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
