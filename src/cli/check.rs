//! Execute filters against JSON input

use serde_json::Value;

use super::{CliError, read_records};
use crate::{Filter, parse};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression
    pub query: String,
    /// JSON input: one document or several separated by whitespace
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed; carries the canonical form
    SyntaxValid(String),
    /// Records that satisfied the filter, in input order
    Matches(Vec<Value>),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let filter: Filter = parse(&options.query)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(filter.to_query_string(false)));
    }

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = read_records(input)?;
    let total = records.len();

    let matches: Vec<Value> = records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();

    tracing::info!(total, matched = matches.len(), filter = %filter, "evaluated records");
    Ok(CheckResult::Matches(matches))
}
