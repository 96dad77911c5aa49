//! Operand values: literals, JSON pointer targets, ranges and wildcard patterns.
//!
//! Records are plain [`serde_json::Value`]s. Literals written in a query are a
//! narrower set (nil, boolean, number, string) and convert losslessly into
//! JSON when an operator needs to compare them against resolved record data.

mod pattern;
mod range;
mod target;

pub use pattern::Pattern;
pub use range::{Bound, Range};
pub use target::Target;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// A scalar written directly in a query.
///
/// # Examples
///
/// ```
/// use pointer_filter::Literal;
///
/// assert_eq!(Literal::from(42), Literal::Number(42.into()));
/// assert_eq!(Literal::from("ok"), Literal::String("ok".to_string()));
/// assert_eq!(Literal::from(None::<bool>), Literal::Nil);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `nil`
    Nil,

    /// `true` / `false`
    Boolean(bool),

    /// Integer or floating point number, as JSON understands it
    Number(Number),

    /// Double-quoted string
    String(String),
}

impl Literal {
    /// Converts into the JSON value used during evaluation.
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Nil => Value::Null,
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(n.clone()),
            Literal::String(s) => Value::String(s.clone()),
        }
    }

    /// Converts a scalar JSON value into a literal. Arrays and objects have no
    /// literal form and yield `None`.
    pub fn from_json(value: &Value) -> Option<Literal> {
        match value {
            Value::Null => Some(Literal::Nil),
            Value::Bool(b) => Some(Literal::Boolean(*b)),
            Value::Number(n) => Some(Literal::Number(n.clone())),
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// A number literal, or `None` for NaN and the infinities.
    pub fn from_f64(value: f64) -> Option<Literal> {
        Number::from_f64(value).map(Literal::Number)
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Nil => "nil",
            Literal::Boolean(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
        }
    }
}

/// Returns a human-readable type name for a JSON value
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::output::CanonicalPrinter::new(false).print_literal(self))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Number(value.into())
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Number(value.into())
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Literal::Number(value.into())
    }
}

/// Non-finite floats have no JSON representation and become `nil`, with a
/// warning. Use [`Literal::from_f64`] to reject them instead.
impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::from_f64(value).unwrap_or_else(|| {
            tracing::warn!(value, "non-finite number has no literal form, using nil");
            Literal::Nil
        })
    }
}

impl From<Number> for Literal {
    fn from(value: Number) -> Self {
        Literal::Number(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Literal::Nil)
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Literal::from_json(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "expected a scalar literal, got {}",
                type_name(&value)
            ))
        })
    }
}
