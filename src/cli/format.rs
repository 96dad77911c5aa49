//! Canonical formatting of filter expressions

use super::CliError;
use crate::parse;

/// Options for the format command
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// The filter expression
    pub query: String,
    /// Percent-encode the output for use in a URL
    pub url_encode: bool,
}

/// Parses the query and returns its canonical text.
pub fn execute_format(options: &FormatOptions) -> Result<String, CliError> {
    let filter = parse(&options.query)?;
    Ok(filter.to_query_string(options.url_encode))
}
