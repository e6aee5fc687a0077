//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions with
//! binding-power precedence and handles:
//!
//! - The plugin metadata header and the four function declaration forms
//! - Statement parsing (declarations, assignments, control flow)
//! - Expression parsing (binary/unary ops, calls, indexing, special references)
//! - Type parsing for declarations and signatures
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
