//! Diagnostic collection.
//!
//! The checker never stops at the first problem: every error and warning it
//! finds is pushed into a [`Diagnostics`] list. Callers decide success solely
//! from [`Diagnostics::error_count`].

use std::fmt::Display;

use super::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One `{severity, message, line}` record.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    error: Error,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn message(&self) -> String {
        self.error.message()
    }

    pub fn line(&self) -> u32 {
        self.error.line()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        let severity = if error.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        };

        Diagnostic { severity, error }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (line {}): {}", self.severity, self.line(), self.message())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Records an error or warning; severity follows the error kind.
    pub fn push(&mut self, error: Error) {
        self.entries.push(Diagnostic::from(error));
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|entry| entry.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|entry| !entry.is_error())
    }

    /// The entries ordered by source line. Entries on the same line keep the
    /// order they were found in.
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut entries: Vec<&Diagnostic> = self.entries.iter().collect();
        entries.sort_by_key(|entry| entry.line());
        entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Extend<Error> for Diagnostics {
    fn extend<T: IntoIterator<Item = Error>>(&mut self, iter: T) {
        for error in iter {
            self.push(error);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
