use std::borrow::Cow;
use std::cmp::Ordering;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde_json::{Map, Number, Value};

use crate::{
    ast::{Operator, OperatorFamily},
    error::FilterError,
    value::{Literal, Pattern, Range, Target},
};

/// Anything a [`Target`] can be resolved in.
///
/// Resolution follows RFC 6901; `None` means the path does not exist in the
/// record (the *absent* sentinel), which is distinct from a JSON `null`.
pub trait Record {
    fn resolve(&self, target: &Target) -> Option<Cow<'_, Value>>;
}

impl Record for Value {
    fn resolve(&self, target: &Target) -> Option<Cow<'_, Value>> {
        target.resolve(self).map(Cow::Borrowed)
    }
}

impl Record for Map<String, Value> {
    fn resolve(&self, target: &Target) -> Option<Cow<'_, Value>> {
        let Some(first) = target.segments().first() else {
            return Some(Cow::Owned(Value::Object(self.clone())));
        };

        let value = self.get(first)?;
        // The rest of the escaped pointer, after `/<first>`.
        let pointer = target.as_pointer();
        let rest = match pointer[1..].find('/') {
            Some(index) => &pointer[index + 1..],
            None => "",
        };
        value.pointer(rest).map(Cow::Borrowed)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn resolve(&self, target: &Target) -> Option<Cow<'_, Value>> {
        (**self).resolve(target)
    }
}

/// The object of a clause after resolution against a record.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedObject<'a> {
    /// A literal, or a target's value; `None` when the target is absent
    Value(Option<&'a Value>),
    Array(&'a [Literal]),
    Range(&'a Range),
    Pattern(&'a Pattern),
}

impl ResolvedObject<'_> {
    fn shape_name(&self) -> &'static str {
        match self {
            ResolvedObject::Value(Some(value)) => crate::value::type_name(value),
            ResolvedObject::Value(None) => "absent value",
            ResolvedObject::Array(_) => "array",
            ResolvedObject::Range(_) => "range",
            ResolvedObject::Pattern(_) => "pattern",
        }
    }
}

impl Operator {
    /// Applies the operator to a resolved subject and object.
    ///
    /// Absent operands never satisfy a positive operator. Every negated
    /// operator is the exact negation of its base, so it is satisfied by
    /// absent operands.
    ///
    /// # Errors
    ///
    /// [`FilterError::TypeMismatch`] when the object's shape does not belong
    /// to this operator's family.
    ///
    /// # Examples
    ///
    /// ```
    /// use pointer_filter::{Operator, evaluator::ResolvedObject};
    /// use serde_json::json;
    ///
    /// let one = json!(1);
    /// assert!(Operator::Eq.apply(Some(&one), ResolvedObject::Value(Some(&json!(1.0)))).unwrap());
    /// assert!(!Operator::Eq.apply(None, ResolvedObject::Value(Some(&one))).unwrap());
    /// assert!(Operator::Neq.apply(None, ResolvedObject::Value(Some(&one))).unwrap());
    /// ```
    pub fn apply(self, subject: Option<&Value>, object: ResolvedObject<'_>) -> Result<bool, FilterError> {
        let base = self.base().apply_base(subject, object)?;
        Ok(if self.is_negated() { !base } else { base })
    }

    fn apply_base(self, subject: Option<&Value>, object: ResolvedObject<'_>) -> Result<bool, FilterError> {
        match (self.family(), object) {
            (OperatorFamily::Comparison, ResolvedObject::Value(object)) => {
                let (Some(left), Some(right)) = (subject, object) else {
                    return Ok(false);
                };
                Ok(match self {
                    Operator::Eq => values_equal(left, right),
                    Operator::Gt => compare_values(left, right) == Some(Ordering::Greater),
                    Operator::Gte => matches!(
                        compare_values(left, right),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    Operator::Lt => compare_values(left, right) == Some(Ordering::Less),
                    Operator::Lte => matches!(
                        compare_values(left, right),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    other => return Err(FilterError::MatchKind(other.keyword().to_string())),
                })
            }
            (OperatorFamily::Membership, ResolvedObject::Array(items)) => Ok(subject
                .is_some_and(|value| items.iter().any(|item| values_equal(value, &item.to_json())))),
            (OperatorFamily::Range, ResolvedObject::Range(range)) => Ok(range.contains(subject)),
            (OperatorFamily::Pattern, ResolvedObject::Pattern(pattern)) => {
                Ok(subject.is_some_and(|value| pattern.matches(value)))
            }
            (family, object) => Err(FilterError::TypeMismatch {
                operator: self,
                expected: family.object_shape(),
                found: object.shape_name(),
            }),
        }
    }
}

fn to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        Decimal::from_i64(i)
    } else if let Some(u) = n.as_u64() {
        Decimal::from_u64(u)
    } else {
        n.as_f64().and_then(Decimal::from_f64)
    }
}

/// Orders two JSON numbers. Exact through [`Decimal`] where both convert,
/// otherwise by their `f64` value.
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let Some(ad) = to_decimal(a)
        && let Some(bd) = to_decimal(b)
    {
        return Some(ad.cmp(&bd));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Structural equality; numbers compare by value, so `1 == 1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| values_equal(l, r)))
        }
        _ => a == b,
    }
}

/// Ordering within one scalar type; `None` across types and for containers.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_numbers() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert_eq!(compare_values(&json!(-1), &json!(0.5)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(u64::MAX), &json!(1)), Some(Ordering::Greater));
    }

    #[test]
    fn test_cross_type_is_unordered() {
        assert_eq!(compare_values(&json!(1), &json!("1")), None);
        assert_eq!(compare_values(&json!([1]), &json!([1])), None);
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_map_record() {
        let map = json!({"a": {"b/c": 1}}).as_object().cloned().unwrap();
        let target = Target::from_segments(["a", "b/c"]);
        assert_eq!(map.resolve(&target).as_deref(), Some(&json!(1)));
        assert_eq!(map.resolve(&Target::from_segments(["x"])), None);
    }

    #[test]
    fn test_wrong_object_shape() {
        let err = Operator::In
            .apply(Some(&json!(1)), ResolvedObject::Value(Some(&json!(1))))
            .unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { operator: Operator::In, .. }));
    }
}
