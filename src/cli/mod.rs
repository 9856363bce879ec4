//! CLI support for dotquery
//!
//! Provides programmatic access to the `dotq` commands for embedding in
//! other tools.

mod check;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check, load_defaults};
pub use convert::{json_to_value, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Query error: {0}")]
    Query(#[from] crate::QueryError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// Defaults file parsed, but is not a JSON object
    #[error("Defaults must be a JSON object, got {0}")]
    InvalidDefaults(&'static str),

    #[error("Unknown category: '{0}'\nRun 'dotq docs' to see available categories.")]
    UnknownCategory(String),
}
