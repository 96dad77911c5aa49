//! Canonical text output for filters.
//!
//! The canonical form is the inverse of parsing: feeding it back through
//! [`crate::parse`] rebuilds an equivalent filter.
//!
//! # Features
//!
//! - **Plain output** - single spaces between tokens, as a human would write it
//! - **URL-encoded output** - spaces become `%20`, targets and string contents
//!   are percent-encoded so the result can be dropped into a query string
//! - **Deterministic** - the same tree always prints the same text
//!
//! # Examples
//!
//! ```
//! use pointer_filter::parse;
//!
//! let filter = parse(r#"(/a eq 1 or /a eq 2) and /b neq "x y""#).unwrap();
//! assert_eq!(filter.to_query_string(false), r#"(/a eq 1 or /a eq 2) and /b neq "x y""#);
//! assert_eq!(
//!     filter.to_query_string(true),
//!     r#"(/a%20eq%201%20or%20/a%20eq%202)%20and%20/b%20neq%20"x%20y""#
//! );
//! ```

use crate::ast::{Clause, Filter, Node, Object, Operand};
use crate::value::{Bound, Literal, Target};

pub struct CanonicalPrinter {
    url_encode: bool,
}

impl CanonicalPrinter {
    pub fn new(url_encode: bool) -> Self {
        CanonicalPrinter { url_encode }
    }

    fn separator(&self) -> &'static str {
        if self.url_encode { "%20" } else { " " }
    }

    pub fn print_filter(&self, filter: &Filter) -> String {
        let sep = self.separator();
        let mut out = String::new();
        for element in filter.elements() {
            if let Some(conjunction) = element.conjunction {
                out.push_str(sep);
                out.push_str(conjunction.keyword());
                out.push_str(sep);
            }
            match &element.node {
                Node::Clause(clause) => out.push_str(&self.print_clause(clause)),
                Node::Group(group) => {
                    out.push('(');
                    out.push_str(&self.print_filter(group));
                    out.push(')');
                }
            }
        }
        out
    }

    /// Prints whatever parts of the clause are bound.
    pub fn print_clause(&self, clause: &Clause) -> String {
        let sep = self.separator();
        let mut out = self.print_operand(clause.subject());
        if let Some(operator) = clause.operator() {
            out.push_str(sep);
            out.push_str(operator.keyword());
        }
        if let Some(object) = clause.object() {
            out.push_str(sep);
            out.push_str(&self.print_object(object));
        }
        out
    }

    fn print_object(&self, object: &Object) -> String {
        match object {
            Object::Operand(operand) => self.print_operand(operand),
            Object::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| self.print_literal(v)).collect();
                format!("[{}]", items.join(","))
            }
            Object::Range(range) => format!(
                "{},{}",
                self.print_bound(range.lower()),
                self.print_bound(range.upper())
            ),
            Object::Pattern(pattern) => self.quote(pattern.raw()),
        }
    }

    fn print_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Target(target) => self.print_target(target),
            Operand::Literal(literal) => self.print_literal(literal),
        }
    }

    fn print_bound(&self, bound: &Bound) -> String {
        self.print_literal(&bound.to_literal())
    }

    pub fn print_literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Nil => "nil".to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Number(n) => n.to_string(),
            Literal::String(s) => self.quote(s),
        }
    }

    /// Pointer form. Characters the lexer treats as delimiters (and `%`
    /// itself) are always percent-escaped; with `url_encode` every reserved
    /// character is.
    pub fn print_target(&self, target: &Target) -> String {
        target
            .segments()
            .iter()
            .map(|segment| {
                let escaped = segment.replace('~', "~0").replace('/', "~1");
                if self.url_encode {
                    format!("/{}", urlencoding::encode(&escaped))
                } else {
                    format!("/{}", escape_delimiters(&escaped))
                }
            })
            .collect()
    }

    fn quote(&self, s: &str) -> String {
        let escaped = self.escape_string(s);
        if self.url_encode {
            format!("\"{}\"", urlencoding::encode(&escaped))
        } else {
            format!("\"{}\"", escaped)
        }
    }

    fn escape_string(&self, s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c if c.is_control() => {
                    // Unicode escape for control chars
                    format!("\\u{:04x}", c as u32).chars().collect()
                }
                c => vec![c],
            })
            .collect()
    }
}

fn escape_delimiters(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch == '%' || ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | ',') {
            let mut buf = [0; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        } else {
            out.push(ch);
        }
    }
    out
}
