use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::evaluator::compare_numbers;
use crate::value::Literal;

/// One side of a [`Range`].
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// No constraint on this side (written `nil`)
    Unbounded,
    Number(Number),
    String(String),
}

impl Bound {
    /// Converts a literal into a bound. Booleans cannot bound a range.
    pub fn from_literal(literal: &Literal) -> Option<Bound> {
        match literal {
            Literal::Nil => Some(Bound::Unbounded),
            Literal::Number(n) => Some(Bound::Number(n.clone())),
            Literal::String(s) => Some(Bound::String(s.clone())),
            Literal::Boolean(_) => None,
        }
    }

    pub fn to_literal(&self) -> Literal {
        match self {
            Bound::Unbounded => Literal::Nil,
            Bound::Number(n) => Literal::Number(n.clone()),
            Bound::String(s) => Literal::String(s.clone()),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    /// Total order between two concrete bounds: numbers before strings.
    fn cmp_concrete(&self, other: &Bound) -> Ordering {
        match (self, other) {
            (Bound::Number(a), Bound::Number(b)) => {
                compare_numbers(a, b).unwrap_or(Ordering::Equal)
            }
            (Bound::String(a), Bound::String(b)) => a.cmp(b),
            (Bound::Number(_), Bound::String(_)) => Ordering::Less,
            (Bound::String(_), Bound::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    /// Compares a record value against this bound. `None` when the types are
    /// not comparable.
    fn compare_value(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Number(v), Bound::Number(b)) => compare_numbers(v, b),
            (Value::String(v), Bound::String(b)) => Some(v.as_str().cmp(b.as_str())),
            _ => None,
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Number(value.into())
    }
}

impl From<i32> for Bound {
    fn from(value: i32) -> Self {
        Bound::Number(value.into())
    }
}

/// Non-finite floats cannot bound anything and become [`Bound::Unbounded`],
/// with a warning.
impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map(Bound::Number).unwrap_or_else(|| {
            tracing::warn!(value, "non-finite range bound, leaving that side open");
            Bound::Unbounded
        })
    }
}

impl From<Number> for Bound {
    fn from(value: Number) -> Self {
        Bound::Number(value)
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Bound::String(value.to_string())
    }
}

impl From<String> for Bound {
    fn from(value: String) -> Self {
        Bound::String(value)
    }
}

impl<T: Into<Bound>> From<Option<T>> for Bound {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Bound::Unbounded)
    }
}

/// An inclusive interval used by `between` / `nbetween`.
///
/// Two concrete bounds given out of order are swapped on construction, so
/// `lower <= upper` always holds. An unbounded side stays where it was given:
/// `Range::new(5, None::<i64>)` means "at least 5".
///
/// # Examples
///
/// ```
/// use pointer_filter::{Bound, Range};
/// use serde_json::json;
///
/// let range = Range::new(42, -42);
/// assert_eq!(range.lower(), &Bound::from(-42));
/// assert_eq!(range.upper(), &Bound::from(42));
/// assert!(range.contains(Some(&json!(0))));
/// assert!(!range.contains(Some(&json!("0"))));
/// assert!(!range.contains(None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    lower: Bound,
    upper: Bound,
}

impl Range {
    pub fn new(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        let (lower, upper) = (lower.into(), upper.into());
        if !lower.is_unbounded()
            && !upper.is_unbounded()
            && lower.cmp_concrete(&upper) == Ordering::Greater
        {
            Range {
                lower: upper,
                upper: lower,
            }
        } else {
            Range { lower, upper }
        }
    }

    pub fn lower(&self) -> &Bound {
        &self.lower
    }

    pub fn upper(&self) -> &Bound {
        &self.upper
    }

    /// Inclusive containment. Absent values and values whose type does not
    /// match a concrete bound are never contained.
    pub fn contains(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        if !matches!(value, Value::Number(_) | Value::String(_)) {
            return false;
        }

        let above_lower = match &self.lower {
            Bound::Unbounded => true,
            bound => matches!(
                bound.compare_value(value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        };
        let below_upper = match &self.upper {
            Bound::Unbounded => true,
            bound => matches!(
                bound.compare_value(value),
                Some(Ordering::Less | Ordering::Equal)
            ),
        };

        above_lower && below_upper
    }
}
