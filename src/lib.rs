pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{
    Clause, ClauseStage, Conjunction, Element, Filter, Node, Object, Operand, Operator,
    OperatorFamily, Token, TokenKind,
};
pub use error::FilterError;
pub use evaluator::Record;
pub use lexer::{Lexer, TokenStream};
pub use output::CanonicalPrinter;
pub use parser::{ParseError, Parser, parse};
pub use value::{Bound, Literal, Pattern, Range, Target};
