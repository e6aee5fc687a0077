//! Type checking and semantic analysis module.
//!
//! This module validates a parsed `Program` and annotates every expression
//! with its resolved type. It is split into:
//!
//! - `symbol_table`: lexical scopes, symbols and function signatures
//! - `builtins`: the populated global scope the checker starts from
//! - `type_system`: promotion rules, operator tables and constant folding
//! - `type_checker`: the two-pass visitor producing diagnostics
//!
//! Failed resolutions are typed as `Error`, which is compatible with
//! everything, so one mistake produces one diagnostic.

pub mod builtins;
pub mod symbol_table;
pub mod type_checker;
pub mod type_system;

#[cfg(test)]
mod tests;
