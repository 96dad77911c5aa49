use serde_json::Number;

use crate::ast::Operator;
use crate::value::{Literal, Target};

/// A lexical token with the character offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Token { kind, position }
    }

    /// The literal carried by a string, number, boolean or `nil` token.
    pub fn value(&self) -> Option<Literal> {
        match &self.kind {
            TokenKind::String(s) => Some(Literal::String(s.clone())),
            TokenKind::Number(n) => Some(Literal::Number(n.clone())),
            TokenKind::Boolean(b) => Some(Literal::Boolean(*b)),
            TokenKind::Nil => Some(Literal::Nil),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// JSON pointer, starting with `/`
    ///
    /// # Examples
    /// ```text
    /// /foo
    /// /items/0/name
    /// /a~1b
    /// ```
    Target(Target),

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "ba_*"
    /// ```
    String(String),

    /// JSON number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1.5
    /// 6.02e23
    /// ```
    Number(Number),

    /// `true` / `false`
    Boolean(bool),

    /// `nil`
    Nil,

    /// Conjunction keyword `and`
    And,

    /// Conjunction keyword `or`
    Or,

    /// `(`
    OpenGroup,

    /// `)`
    CloseGroup,

    /// `[`
    OpenArray,

    /// `]`
    CloseArray,

    /// `,` between array elements and range bounds
    ListDelimiter,

    /// One of the twelve operator tags
    Operator(Operator),

    /// Any other bare word. Never valid in a filter; kept so the parser can
    /// report it as an unknown operator.
    Word(String),
}

impl TokenKind {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Target(t) => format!("target `{}`", t.as_pointer()),
            TokenKind::String(s) => format!("string {:?}", s),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Boolean(b) => format!("boolean {}", b),
            TokenKind::Nil => "`nil`".to_string(),
            TokenKind::And => "`and`".to_string(),
            TokenKind::Or => "`or`".to_string(),
            TokenKind::OpenGroup => "`(`".to_string(),
            TokenKind::CloseGroup => "`)`".to_string(),
            TokenKind::OpenArray => "`[`".to_string(),
            TokenKind::CloseArray => "`]`".to_string(),
            TokenKind::ListDelimiter => "`,`".to_string(),
            TokenKind::Operator(op) => format!("operator `{}`", op),
            TokenKind::Word(w) => format!("word `{}`", w),
        }
    }
}
