//! Reading JSON records from CLI input

use serde_json::{Deserializer, Value};

use super::CliError;

/// Reads every JSON document in `input`.
///
/// Documents may be separated by any whitespace, so both a single document
/// and JSON Lines are accepted. A top-level array is one record, not a list
/// of records.
pub fn read_records(input: &str) -> Result<Vec<Value>, CliError> {
    Deserializer::from_str(input)
        .into_iter::<Value>()
        .map(|record| record.map_err(CliError::Json))
        .collect()
}
