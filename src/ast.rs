//! # Pointer Filter - Predicate Tree
//!
//! This module defines the tokens and the predicate tree of the filter
//! language: an infix, human-writable way to say "does this record match".
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - The twelve comparison operators and their families
//! - **[clause]** - Single comparisons and their staged builder
//! - **[filter]** - Clauses and groups joined by conjunctions
//!
//! ## Quick Start
//!
//! ```text
//! /status eq "active" and /price between 10,100
//! ```
//!
//! ## Core Concepts
//!
//! ### Clauses
//!
//! Every clause is `subject operator object`. The subject is a JSON pointer
//! (`/a/b`) or a literal; the object's shape depends on the operator:
//!
//! | Operators | Object |
//! |---|---|
//! | `eq` `neq` `gt` `gte` `lt` `lte` | target, string, number, boolean or `nil` |
//! | `in` `nin` | `[1,"two",false]` |
//! | `between` `nbetween` | `lower,upper` (either may be `nil`) |
//! | `like` `nlike` | `"wild*car_"` |
//!
//! ### Conjunctions
//!
//! `and` / `or` join clauses and parenthesized groups. They have no
//! precedence over each other: evaluation folds strictly left to right.
//!
//! ```text
//! /a eq 1 or /a eq 2 and /b eq 3     // ((a = 1) or (a = 2)) and (b = 3)
//! /a eq 1 or (/a eq 2 and /b eq 3)   // grouping changes the order
//! ```
//!
//! ### Absent Values
//!
//! A pointer that does not resolve in a record is *absent*. Positive
//! operators never match an absent operand; their negations always do:
//!
//! ```text
//! /missing eq 1      // false
//! /missing neq 1     // true
//! ```
pub mod clause;
pub mod filter;
pub mod operators;
pub mod tokens;

pub use clause::{Clause, ClauseStage, Object, Operand};
pub use filter::{Conjunction, Element, Filter, Node};
pub use operators::{Operator, OperatorFamily};
pub use tokens::{Token, TokenKind};
