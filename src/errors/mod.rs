//! Error types and diagnostic reporting for the front end.
//!
//! This module defines:
//!
//! - `Error`, a problem tied to the source line it was found on
//! - `ErrorImpl`, one variant per lexical, syntax or semantic problem kind
//! - `Diagnostics`, the ordered error/warning list the checker accumulates

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
