//! CLI command implementations.

pub mod create;

pub use create::{execute_create, CreateOptions};
