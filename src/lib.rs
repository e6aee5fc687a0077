#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::{
    diagnostics::{Diagnostic, Severity},
    errors::ErrorTip,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A source location: the 1-based line and the name of the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn line(&self) -> u32 {
        self.0
    }
}

/// Returns the text of the 1-based `line` in `source`, without its line ending.
pub fn get_source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}

/// Renders a diagnostic against the source text it was produced from.
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str) -> String {
    /*
        error: UndefinedSymbol (`counter` is not declared in this scope)
        -> plugin.rwlz
           |
        20 | counter += 1;
           | ^^^^^^^^^^^^^
    */

    let error = diagnostic.error();
    let position = error.get_position();
    let label = match diagnostic.severity() {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };

    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("{}: {}\n", label, error.get_error_name()),
        tip => format!("{}: {} ({})\n", label, error.get_error_name(), tip),
    };
    rendered.push_str(&format!("-> {}:{}\n", position.1, position.0));

    if let Some(line_text) = get_source_line(source, position.0) {
        let line_string = position.0.to_string();
        let padding = line_string.len() + 2;
        let trimmed = line_text.trim();

        rendered.push_str(&format!("{:>padding$}\n", "|"));
        rendered.push_str(&format!("{} | {}\n", line_string, trimmed));
        rendered.push_str(&format!(
            "{:>padding$} {}\n",
            "|",
            "^".repeat(trimmed.chars().count().max(1))
        ));
    }

    rendered
}
