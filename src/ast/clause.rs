use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::ast::{Operator, OperatorFamily};
use crate::error::FilterError;
use crate::evaluator::{Record, ResolvedObject};
use crate::output::CanonicalPrinter;
use crate::value::{Bound, Literal, Pattern, Range, Target};

/// A clause subject, or the object of a comparison operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Resolved against the record at evaluation time
    Target(Target),
    /// Used as-is
    Literal(Literal),
}

impl Operand {
    /// Resolves against a record. `None` is the absent sentinel.
    pub fn resolve<'a, R: Record + ?Sized>(&'a self, record: &'a R) -> Option<Cow<'a, Value>> {
        match self {
            Operand::Target(target) => record.resolve(target),
            Operand::Literal(literal) => Some(Cow::Owned(literal.to_json())),
        }
    }
}

impl From<Target> for Operand {
    fn from(value: Target) -> Self {
        Operand::Target(value)
    }
}

impl From<Literal> for Operand {
    fn from(value: Literal) -> Self {
        Operand::Literal(value)
    }
}

/// The right-hand side of a clause; its shape is fixed by the operator family.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// eq, neq, gt, gte, lt, lte
    Operand(Operand),
    /// in, nin
    Array(Vec<Literal>),
    /// between, nbetween
    Range(Range),
    /// like, nlike
    Pattern(Pattern),
}

impl Object {
    pub fn family(&self) -> OperatorFamily {
        match self {
            Object::Operand(_) => OperatorFamily::Comparison,
            Object::Array(_) => OperatorFamily::Membership,
            Object::Range(_) => OperatorFamily::Range,
            Object::Pattern(_) => OperatorFamily::Pattern,
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Object::Operand(Operand::Target(_)) => "target",
            Object::Operand(Operand::Literal(literal)) => literal.type_name(),
            Object::Array(_) => "array",
            Object::Range(_) => "range",
            Object::Pattern(_) => "pattern",
        }
    }
}

/// How far a [`Clause`] has been built. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseStage {
    SubjectSet,
    OperatorSet,
    Valid,
}

impl fmt::Display for ClauseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseStage::SubjectSet => write!(f, "subject-set"),
            ClauseStage::OperatorSet => write!(f, "operator-set"),
            ClauseStage::Valid => write!(f, "valid"),
        }
    }
}

/// A single comparison: `subject operator object`.
///
/// Clauses are built in three steps, each consuming the clause and returning
/// it one stage further along:
///
/// 1. a subject: [`Clause::from_target`] or [`Clause::from_literal`]
/// 2. exactly one operator: [`Clause::eq`], [`Clause::like`], ...
/// 3. exactly one object, through the binder matching the operator family
///
/// Any call out of that order fails with [`FilterError::InvalidSequence`];
/// a binder that does not fit the chosen operator fails with
/// [`FilterError::TypeMismatch`].
///
/// # Examples
///
/// ```
/// use pointer_filter::{Clause, Literal};
/// use serde_json::json;
///
/// let clause = Clause::from_target("/x")?.eq()?.literal(Literal::Nil)?;
/// assert_eq!(clause.to_query_string(false)?, "/x eq nil");
/// assert!(clause.matches(&json!({"x": null})));
///
/// let clause = Clause::from_target("/name")?.like()?.pattern("al*")?;
/// assert!(clause.matches(&json!({"name": "Alice"})));
/// # Ok::<(), pointer_filter::FilterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    subject: Operand,
    operator: Option<Operator>,
    object: Option<Object>,
}

impl Clause {
    /// Starts a clause whose subject is a JSON pointer into the record.
    ///
    /// The root pointer `""` has no query-text form and is rejected.
    pub fn from_target(pointer: &str) -> Result<Self, FilterError> {
        Ok(Clause::from_operand(clause_target(pointer)?))
    }

    /// Starts a clause whose subject is a constant.
    pub fn from_literal(value: impl Into<Literal>) -> Self {
        Clause::from_operand(value.into())
    }

    pub fn from_operand(subject: impl Into<Operand>) -> Self {
        Clause {
            subject: subject.into(),
            operator: None,
            object: None,
        }
    }

    pub fn stage(&self) -> ClauseStage {
        match (&self.operator, &self.object) {
            (None, _) => ClauseStage::SubjectSet,
            (Some(_), None) => ClauseStage::OperatorSet,
            (Some(_), Some(_)) => ClauseStage::Valid,
        }
    }

    /// Whether subject, operator and object are all set.
    pub fn is_valid(&self) -> bool {
        self.stage() == ClauseStage::Valid
    }

    pub fn subject(&self) -> &Operand {
        &self.subject
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn object(&self) -> Option<&Object> {
        self.object.as_ref()
    }

    fn require_stage(&self, expected: ClauseStage, operation: &'static str) -> Result<(), FilterError> {
        let stage = self.stage();
        if stage == expected {
            Ok(())
        } else {
            Err(FilterError::InvalidSequence { operation, stage })
        }
    }

    // Operator selection

    /// Selects the operator. Legal exactly once, right after the subject.
    pub fn with_operator(mut self, operator: Operator) -> Result<Self, FilterError> {
        self.require_stage(ClauseStage::SubjectSet, "select an operator for")?;
        self.operator = Some(operator);
        Ok(self)
    }

    pub fn eq(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Eq)
    }

    pub fn neq(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Neq)
    }

    pub fn gt(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Gt)
    }

    pub fn gte(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Gte)
    }

    pub fn lt(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Lt)
    }

    pub fn lte(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Lte)
    }

    /// Selects `in` (`in` itself is a Rust keyword).
    pub fn is_in(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::In)
    }

    pub fn nin(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Nin)
    }

    pub fn between(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Between)
    }

    pub fn nbetween(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Nbetween)
    }

    pub fn like(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Like)
    }

    pub fn nlike(self) -> Result<Self, FilterError> {
        self.with_operator(Operator::Nlike)
    }

    // Object binding

    /// Binds the object, checking its shape against the operator family.
    pub fn bind(mut self, object: Object) -> Result<Self, FilterError> {
        self.require_stage(ClauseStage::OperatorSet, "bind an object to")?;
        let Some(operator) = self.operator else {
            return Err(FilterError::InvalidSequence {
                operation: "bind an object to",
                stage: self.stage(),
            });
        };

        if object.family() != operator.family() {
            return Err(FilterError::TypeMismatch {
                operator,
                expected: operator.family().object_shape(),
                found: object.shape_name(),
            });
        }

        self.object = Some(object);
        Ok(self)
    }

    /// Binds a literal object to a comparison operator.
    pub fn literal(self, value: impl Into<Literal>) -> Result<Self, FilterError> {
        self.bind(Object::Operand(Operand::Literal(value.into())))
    }

    /// Binds a target object to a comparison operator; it is resolved against
    /// the same record as the subject.
    pub fn target(self, pointer: &str) -> Result<Self, FilterError> {
        self.require_stage(ClauseStage::OperatorSet, "bind an object to")?;
        let target = clause_target(pointer)?;
        self.bind(Object::Operand(Operand::Target(target)))
    }

    /// Binds the element list of `in` / `nin`. An empty list is allowed.
    pub fn array<I, T>(self, values: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        self.bind(Object::Array(values.into_iter().map(Into::into).collect()))
    }

    /// Binds the bounds of `between` / `nbetween`. Bounds given out of order
    /// are swapped.
    pub fn range(self, lower: impl Into<Bound>, upper: impl Into<Bound>) -> Result<Self, FilterError> {
        self.bind(Object::Range(Range::new(lower, upper)))
    }

    /// Binds a range from two parsed literals. Boolean bounds are rejected.
    pub(crate) fn range_literals(self, lower: &Literal, upper: &Literal) -> Result<Self, FilterError> {
        self.require_stage(ClauseStage::OperatorSet, "bind an object to")?;
        let Some(operator) = self.operator else {
            return Err(FilterError::InvalidSequence {
                operation: "bind an object to",
                stage: self.stage(),
            });
        };
        let bound = |literal: &Literal| {
            Bound::from_literal(literal).ok_or(FilterError::TypeMismatch {
                operator,
                expected: "a number, string or nil bound",
                found: literal.type_name(),
            })
        };
        let range = Range::new(bound(lower)?, bound(upper)?);
        self.bind(Object::Range(range))
    }

    /// Binds the wildcard pattern of `like` / `nlike`.
    pub fn pattern(self, pattern: impl Into<Pattern>) -> Result<Self, FilterError> {
        self.bind(Object::Pattern(pattern.into()))
    }

    // Reads

    /// Whether subject or object is the root pointer, which has no text form.
    pub(crate) fn has_root_target(&self) -> bool {
        let is_root = |operand: &Operand| {
            matches!(operand, Operand::Target(target) if target.segments().is_empty())
        };
        is_root(&self.subject)
            || matches!(&self.object, Some(Object::Operand(operand)) if is_root(operand))
    }

    /// Evaluates against a record, reporting shape errors.
    ///
    /// A clause that is not yet valid matches nothing.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> Result<bool, FilterError> {
        let (Some(operator), Some(object)) = (self.operator, self.object.as_ref()) else {
            return Ok(false);
        };

        let subject = self.subject.resolve(record);
        let object_value = match object {
            Object::Operand(operand) => operand.resolve(record),
            _ => None,
        };
        let resolved = match object {
            Object::Operand(_) => ResolvedObject::Value(object_value.as_deref()),
            Object::Array(items) => ResolvedObject::Array(items),
            Object::Range(range) => ResolvedObject::Range(range),
            Object::Pattern(pattern) => ResolvedObject::Pattern(pattern),
        };

        operator.apply(subject.as_deref(), resolved)
    }

    /// Whether the record satisfies this clause.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.evaluate(record).unwrap_or_else(|err| {
            tracing::warn!(clause = %self, error = %err, "clause evaluation failed");
            false
        })
    }

    /// Canonical text. Only a valid clause can be serialized.
    pub fn to_query_string(&self, url_encode: bool) -> Result<String, FilterError> {
        self.require_stage(ClauseStage::Valid, "serialize")?;
        Ok(CanonicalPrinter::new(url_encode).print_clause(self))
    }
}

pub(crate) fn root_target_error() -> FilterError {
    FilterError::InvalidTarget {
        pointer: String::new(),
        reason: "the root pointer cannot be written in a filter",
    }
}

fn clause_target(pointer: &str) -> Result<Target, FilterError> {
    if pointer.is_empty() {
        return Err(root_target_error());
    }
    Target::parse(pointer)
}

/// Canonical non-encoded text; an incomplete clause prints the parts it has.
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CanonicalPrinter::new(false).print_clause(self))
    }
}
