//! CLI support for pointer-filter
//!
//! Provides programmatic access to the `pfilter` commands so other tools can
//! embed them without shelling out.

mod check;
mod docs;
mod format;
mod records;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::get_docs_overview;
pub use format::{FormatOptions, execute_format};
pub use records::read_records;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
