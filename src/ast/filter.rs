use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ast::Clause;
use crate::ast::clause::root_target_error;
use crate::error::FilterError;
use crate::evaluator::Record;
use crate::output::CanonicalPrinter;
use crate::parser::ParseError;

/// Logical combinator between consecutive filter elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn keyword(self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }

    fn combine(self, left: bool, right: impl FnOnce() -> bool) -> bool {
        match self {
            Conjunction::And => left && right(),
            Conjunction::Or => left || right(),
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A filter element: a clause or a parenthesized sub-filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Clause(Clause),
    Group(Filter),
}

impl Node {
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Node::Clause(clause) => clause.matches(record),
            Node::Group(filter) => filter.matches(record),
        }
    }
}

/// One entry of a [`Filter`]. Only the first element has no conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub conjunction: Option<Conjunction>,
    pub node: Node,
}

/// A complete predicate: clauses and groups joined left to right.
///
/// `and` and `or` have no relative precedence. The elements are folded
/// strictly left to right, so `a or b and c` means `(a or b) and c`.
///
/// # Examples
///
/// ```
/// use pointer_filter::{Clause, Filter};
/// use serde_json::json;
///
/// let filter: Filter = "/foo between 0,42 and /bar like \"ba_*\"".parse()?;
/// assert!(filter.matches(&json!({"foo": 10, "bar": "ba2z"})));
/// assert!(!filter.matches(&json!({"foo": 100, "bar": "ba2z"})));
///
/// let built = Filter::from_clause(Clause::from_target("/foo")?.between()?.range(0, 42)?)?
///     .and(Clause::from_target("/bar")?.like()?.pattern("ba_*")?)?;
/// assert_eq!(built, filter);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    elements: Vec<Element>,
}

impl Filter {
    /// Starts a filter with a valid clause. Clauses on the root pointer are
    /// rejected since they could not be printed and parsed back.
    pub fn from_clause(clause: Clause) -> Result<Self, FilterError> {
        Ok(Filter::from_node(Filter::accept(clause)?))
    }

    /// Starts a filter whose first element is a group.
    pub fn from_group(group: Filter) -> Self {
        Filter::from_node(Node::Group(group))
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Filter {
            elements: vec![Element {
                conjunction: None,
                node,
            }],
        }
    }

    fn accept(clause: Clause) -> Result<Node, FilterError> {
        if !clause.is_valid() {
            return Err(FilterError::InvalidSequence {
                operation: "add to a filter",
                stage: clause.stage(),
            });
        }
        if clause.has_root_target() {
            return Err(root_target_error());
        }
        Ok(Node::Clause(clause))
    }

    pub(crate) fn push(&mut self, conjunction: Conjunction, node: Node) {
        self.elements.push(Element {
            conjunction: Some(conjunction),
            node,
        });
    }

    pub fn and(mut self, clause: Clause) -> Result<Self, FilterError> {
        let node = Filter::accept(clause)?;
        self.push(Conjunction::And, node);
        Ok(self)
    }

    pub fn or(mut self, clause: Clause) -> Result<Self, FilterError> {
        let node = Filter::accept(clause)?;
        self.push(Conjunction::Or, node);
        Ok(self)
    }

    pub fn and_group(mut self, group: Filter) -> Self {
        self.push(Conjunction::And, Node::Group(group));
        self
    }

    pub fn or_group(mut self, group: Filter) -> Self {
        self.push(Conjunction::Or, Node::Group(group));
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of top-level elements (a group counts once).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false: a filter holds at least one element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every clause in order, descending into groups.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        for element in &self.elements {
            match &element.node {
                Node::Clause(clause) => out.push(clause),
                Node::Group(group) => group.collect_clauses(out),
            }
        }
    }

    /// Whether the record satisfies the predicate.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let mut elements = self.elements.iter();
        let Some(first) = elements.next() else {
            return false;
        };

        elements.fold(first.node.matches(record), |acc, element| {
            element
                .conjunction
                .unwrap_or(Conjunction::And)
                .combine(acc, || element.node.matches(record))
        })
    }

    /// Canonical text, the inverse of parsing. With `url_encode`, separators,
    /// targets and string contents are percent-encoded.
    pub fn to_query_string(&self, url_encode: bool) -> String {
        CanonicalPrinter::new(url_encode).print_filter(self)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string(false))
    }
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_query_string(false))
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Clause> for Filter {
    type Error = FilterError;

    fn try_from(clause: Clause) -> Result<Self, Self::Error> {
        Filter::from_clause(clause)
    }
}
