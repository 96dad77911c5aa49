use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FilterError;

/// The twelve comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (`eq`)
    Eq,
    /// Not equal (`neq`)
    Neq,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`gte`)
    Gte,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`lte`)
    Lte,
    /// Array membership (`in`)
    In,
    /// Array non-membership (`nin`)
    Nin,
    /// Inclusive range (`between`)
    Between,
    /// Outside a range (`nbetween`)
    Nbetween,
    /// Wildcard match (`like`)
    Like,
    /// Wildcard mismatch (`nlike`)
    Nlike,
}

/// Operators grouped by the shape of object they take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    /// eq, neq, gt, gte, lt, lte: a literal or a target
    Comparison,
    /// in, nin: an array of literals
    Membership,
    /// between, nbetween: a range
    Range,
    /// like, nlike: a wildcard pattern
    Pattern,
}

impl OperatorFamily {
    /// Describes the object this family binds, for error messages.
    pub fn object_shape(self) -> &'static str {
        match self {
            OperatorFamily::Comparison => "a literal or target",
            OperatorFamily::Membership => "an array",
            OperatorFamily::Range => "a range",
            OperatorFamily::Pattern => "a pattern",
        }
    }
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::Between,
        Operator::Nbetween,
        Operator::Like,
        Operator::Nlike,
    ];

    /// The lowercase tag used in query text.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Between => "between",
            Operator::Nbetween => "nbetween",
            Operator::Like => "like",
            Operator::Nlike => "nlike",
        }
    }

    /// Looks up an operator by its tag.
    pub fn from_keyword(keyword: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.keyword() == keyword)
    }

    pub fn family(self) -> OperatorFamily {
        match self {
            Operator::Eq
            | Operator::Neq
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte => OperatorFamily::Comparison,
            Operator::In | Operator::Nin => OperatorFamily::Membership,
            Operator::Between | Operator::Nbetween => OperatorFamily::Range,
            Operator::Like | Operator::Nlike => OperatorFamily::Pattern,
        }
    }

    /// Whether this operator is the logical negation of another one.
    pub fn is_negated(self) -> bool {
        matches!(
            self,
            Operator::Neq | Operator::Nin | Operator::Nbetween | Operator::Nlike
        )
    }

    /// The positive operator a negated one is defined against; identity otherwise.
    pub fn base(self) -> Operator {
        match self {
            Operator::Neq => Operator::Eq,
            Operator::Nin => Operator::In,
            Operator::Nbetween => Operator::Between,
            Operator::Nlike => Operator::Like,
            other => other,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_keyword(s).ok_or_else(|| FilterError::MatchKind(s.to_string()))
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keyword = String::deserialize(deserializer)?;
        keyword.parse().map_err(serde::de::Error::custom)
    }
}
