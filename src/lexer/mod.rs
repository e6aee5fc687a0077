//! Lexical analysis for RWLZ source files.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, special references, literals, and operators
//! - Line tracking for diagnostics
//! - Line and block comments

pub mod lexer;
pub mod tokens;
