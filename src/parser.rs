//! Recursive-descent parser from tokens to a [`Filter`].
//!
//! Grammar:
//!
//! ```text
//! Filter          := Condition
//! Condition       := [Conjunction] (Group | SimpleCondition) [Condition]
//! Conjunction     := 'and' | 'or'              -- required after the first condition
//! Group           := '(' Condition ')'
//! SimpleCondition := Subject Operator Object
//! Subject         := Target | String | Number | Boolean | 'nil'
//! Object          := depends on the operator family
//! ```
//!
//! The parser stops at the first error; there is no recovery.

use thiserror::Error;

use crate::{
    ast::{Clause, Conjunction, Filter, Node, Object, Operand, Operator, OperatorFamily, Token, TokenKind},
    error::FilterError,
    lexer::TokenStream,
    value::Literal,
};

/// Malformed query text. Every variant carries the character offset where
/// the problem was found.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, got {found} at position {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("expected {expected}, got end of input at position {position}")]
    UnexpectedEnd {
        expected: &'static str,
        position: usize,
    },

    #[error("unknown operator `{keyword}` at position {position}")]
    UnknownOperator { keyword: String, position: usize },

    #[error("group opened at position {position} is never closed")]
    UnterminatedGroup { position: usize },

    #[error("array opened at position {position} is never closed")]
    UnterminatedArray { position: usize },

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence '\\{ch}' at position {position}")]
    InvalidEscape { ch: char, position: usize },

    #[error("invalid number `{text}` at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("invalid target `{pointer}` at position {position}: {reason}")]
    InvalidTarget {
        pointer: String,
        reason: String,
        position: usize,
    },

    #[error("invalid clause at position {position}: {reason}")]
    InvalidClause { reason: String, position: usize },

    #[error("groups nested deeper than {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

impl ParseError {
    /// Character offset of the offending token or character.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEnd { position, .. }
            | ParseError::UnknownOperator { position, .. }
            | ParseError::UnterminatedGroup { position }
            | ParseError::UnterminatedArray { position }
            | ParseError::UnexpectedCharacter { position, .. }
            | ParseError::UnterminatedString { position }
            | ParseError::InvalidEscape { position, .. }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::InvalidTarget { position, .. }
            | ParseError::InvalidClause { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Lexes and parses a query.
///
/// # Examples
///
/// ```
/// use pointer_filter::parse;
/// use serde_json::json;
///
/// let filter = parse("/foo eq 42").unwrap();
/// assert!(filter.matches(&json!({"foo": 42})));
/// assert!(!filter.matches(&json!({"foo": 24})));
/// assert_eq!(filter.to_string(), "/foo eq 42");
/// ```
pub fn parse(input: &str) -> Result<Filter, ParseError> {
    let tokens = TokenStream::tokenize(input)?;
    let filter = Parser::new(tokens).parse()?;
    tracing::debug!(query = input, clauses = filter.clauses().len(), "parsed filter");
    Ok(filter)
}

/// How many groups may be open at once.
pub const MAX_DEPTH: usize = 128;

pub struct Parser {
    tokens: TokenStream,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: TokenStream) -> Self {
        Parser { tokens, depth: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.current()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current().is_some_and(|token| &token.kind == kind)
    }

    fn advance(&mut self) {
        self.tokens.advance();
    }

    /// Error for whatever sits under the cursor when `expected` was wanted.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: token.kind.describe(),
                position: token.position,
            },
            None => ParseError::UnexpectedEnd {
                expected,
                position: self.tokens.position(),
            },
        }
    }

    fn invalid_clause(err: FilterError, position: usize) -> ParseError {
        ParseError::InvalidClause {
            reason: err.to_string(),
            position,
        }
    }

    /// Parses the whole stream into a filter.
    pub fn parse(&mut self) -> Result<Filter, ParseError> {
        let filter = self.parse_condition()?;
        if self.current().is_some() {
            return Err(self.unexpected("`and`, `or` or end of input"));
        }
        Ok(filter)
    }

    /// Parses conditions until the end of input or a closing `)`, which is
    /// left for the caller.
    fn parse_condition(&mut self) -> Result<Filter, ParseError> {
        let mut filter = Filter::from_node(self.parse_node()?);

        while let Some(token) = self.current() {
            let conjunction = match token.kind {
                TokenKind::CloseGroup => break,
                TokenKind::And => Conjunction::And,
                TokenKind::Or => Conjunction::Or,
                _ => return Err(self.unexpected("`and` or `or`")),
            };
            self.advance();
            let node = self.parse_node()?;
            filter.push(conjunction, node);
        }

        Ok(filter)
    }

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        if self.check(&TokenKind::OpenGroup) {
            self.parse_group()
        } else {
            Ok(Node::Clause(self.parse_simple_condition()?))
        }
    }

    fn parse_group(&mut self) -> Result<Node, ParseError> {
        let open = self.tokens.position();
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_DEPTH,
                position: open,
            });
        }
        self.advance(); // Consume '('

        self.depth += 1;
        let inner = self.parse_condition();
        self.depth -= 1;
        let inner = inner?;

        if !self.check(&TokenKind::CloseGroup) {
            return Err(ParseError::UnterminatedGroup { position: open });
        }
        self.advance(); // Consume ')'

        Ok(Node::Group(inner))
    }

    fn parse_simple_condition(&mut self) -> Result<Clause, ParseError> {
        let position = self.tokens.position();
        let subject = self.parse_operand("a target or literal subject")?;
        let operator = self.parse_operator()?;

        let clause = Clause::from_operand(subject)
            .with_operator(operator)
            .map_err(|err| Self::invalid_clause(err, position))?;

        let clause = match operator.family() {
            OperatorFamily::Comparison => {
                let object = self.parse_operand("a target or literal")?;
                clause.bind(Object::Operand(object))
            }
            OperatorFamily::Membership => {
                let items = self.parse_array()?;
                clause.array(items)
            }
            OperatorFamily::Range => {
                let lower = self.parse_bound()?;
                if !self.check(&TokenKind::ListDelimiter) {
                    return Err(self.unexpected("`,` between range bounds"));
                }
                self.advance();
                let upper = self.parse_bound()?;
                clause.range_literals(&lower, &upper)
            }
            OperatorFamily::Pattern => match self.current().map(|token| &token.kind) {
                Some(TokenKind::String(raw)) => {
                    let raw = raw.clone();
                    self.advance();
                    clause.pattern(raw)
                }
                _ => return Err(self.unexpected("a string pattern")),
            },
        };

        clause.map_err(|err| Self::invalid_clause(err, position))
    }

    fn parse_operand(&mut self, expected: &'static str) -> Result<Operand, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.unexpected(expected));
        };

        let operand = match &token.kind {
            TokenKind::Target(target) => Operand::Target(target.clone()),
            _ => match token.value() {
                Some(literal) => Operand::Literal(literal),
                None => return Err(self.unexpected(expected)),
            },
        };
        self.advance();
        Ok(operand)
    }

    fn parse_operator(&mut self) -> Result<Operator, ParseError> {
        match self.current() {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => {
                let op = *op;
                self.advance();
                Ok(op)
            }
            Some(Token {
                kind: TokenKind::Word(word),
                position,
            }) => Err(ParseError::UnknownOperator {
                keyword: word.clone(),
                position: *position,
            }),
            _ => Err(self.unexpected("an operator")),
        }
    }

    fn parse_literal(&mut self, expected: &'static str) -> Result<Literal, ParseError> {
        match self.current().and_then(Token::value) {
            Some(literal) => {
                self.advance();
                Ok(literal)
            }
            None => Err(self.unexpected(expected)),
        }
    }

    fn parse_bound(&mut self) -> Result<Literal, ParseError> {
        if matches!(
            self.current().map(|token| &token.kind),
            Some(TokenKind::Boolean(_))
        ) {
            return Err(self.unexpected("a number, string or nil bound"));
        }
        self.parse_literal("a number, string or nil bound")
    }

    fn parse_array(&mut self) -> Result<Vec<Literal>, ParseError> {
        if !self.check(&TokenKind::OpenArray) {
            return Err(self.unexpected("`[`"));
        }
        let open = self.tokens.position();
        self.advance(); // Consume '['

        let mut items = vec![];
        if self.check(&TokenKind::CloseArray) {
            self.advance();
            return Ok(items);
        }

        loop {
            if self.current().is_none() {
                return Err(ParseError::UnterminatedArray { position: open });
            }
            items.push(self.parse_literal("an array element")?);

            match self.current().map(|token| &token.kind) {
                Some(TokenKind::ListDelimiter) => self.advance(),
                Some(TokenKind::CloseArray) => {
                    self.advance();
                    return Ok(items);
                }
                None => return Err(ParseError::UnterminatedArray { position: open }),
                Some(_) => return Err(self.unexpected("`,` or `]`")),
            }
        }
    }
}
