use thiserror::Error;

use crate::ast::{ClauseStage, Operator};

/// Errors raised while building or evaluating predicates programmatically.
///
/// Text input never produces these: the parser reports [`crate::ParseError`]
/// instead, and only ever builds well-shaped clauses.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A clause builder call was made in a stage that does not permit it,
    /// e.g. binding an object before an operator was selected.
    #[error("invalid sequence: cannot {operation} a clause in stage {stage}")]
    InvalidSequence {
        operation: &'static str,
        stage: ClauseStage,
    },

    /// The operand shape does not fit the operator's family.
    #[error("type mismatch: `{operator}` expects {expected}, got {found}")]
    TypeMismatch {
        operator: Operator,
        expected: &'static str,
        found: &'static str,
    },

    /// An operator tag outside the known set.
    #[error("unknown operator `{0}`")]
    MatchKind(String),

    /// A JSON pointer that does not follow RFC 6901.
    #[error("invalid target `{pointer}`: {reason}")]
    InvalidTarget {
        pointer: String,
        reason: &'static str,
    },

    /// The regular expression derived from a wildcard pattern failed to build.
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}
