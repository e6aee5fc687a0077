//! Unit tests for errors and diagnostic collection.

use std::rc::Rc;

use crate::errors::diagnostics::{Diagnostics, Severity};
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;

fn at(line: u32) -> Position {
    Position(line, Rc::new("test.rwlz".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.line(), 10);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.rwlz");
}

#[test]
fn test_type_conflict_names_both_types() {
    let error = Error::new(
        ErrorImpl::TypeConflict {
            name: "x".to_string(),
            existing: "int".to_string(),
            attempted: "float".to_string(),
            scope: "function main".to_string(),
        },
        at(3),
    );

    let message = error.message();
    assert!(message.contains("int"));
    assert!(message.contains("float"));
    assert!(message.contains("function main"));
}

#[test]
fn test_tip_for_unrecognised_token_is_empty() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        at(1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
    assert_eq!(error.get_tip().to_string(), "");
}

#[test]
fn test_tip_for_arity_mismatch() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            function: "add".to_string(),
            expected: 2,
            received: 3,
        },
        at(1),
    );

    assert_eq!(error.get_tip().to_string(), "Expected 2 arguments, received 3");
}

#[test]
fn test_warning_kinds() {
    let warning = Error::new(
        ErrorImpl::MissingReturn {
            function: "f".to_string(),
            return_type: "int".to_string(),
        },
        at(1),
    );
    let error = Error::new(
        ErrorImpl::UndefinedSymbol {
            name: "y".to_string(),
        },
        at(1),
    );

    assert!(warning.is_warning());
    assert!(!error.is_warning());
}

#[test]
fn test_diagnostics_counts() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(Error::new(
        ErrorImpl::UninitializedVariable {
            name: "a".to_string(),
        },
        at(4),
    ));
    diagnostics.push(Error::new(
        ErrorImpl::ConstReassignment {
            name: "b".to_string(),
        },
        at(2),
    ));

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(diagnostics.has_errors());
}

#[test]
fn test_warnings_alone_do_not_fail() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(Error::new(
        ErrorImpl::UncheckedSpecialReference {
            reference: "<prop>".to_string(),
        },
        at(7),
    ));

    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warnings().count(), 1);
    assert_eq!(diagnostics.iter().next().map(|d| d.severity()), Some(Severity::Warning));
}

#[test]
fn test_diagnostics_sorted_by_line() {
    let mut diagnostics = Diagnostics::new();
    for (line, name) in [(9, "c"), (1, "a"), (5, "b"), (1, "a2")] {
        diagnostics.push(Error::new(
            ErrorImpl::UndefinedSymbol {
                name: name.to_string(),
            },
            at(line),
        ));
    }

    let lines: Vec<u32> = diagnostics.sorted().iter().map(|d| d.line()).collect();
    assert_eq!(lines, vec![1, 1, 5, 9]);

    let first_two: Vec<String> = diagnostics
        .sorted()
        .iter()
        .take(2)
        .map(|d| d.message())
        .collect();
    assert!(first_two[0].contains("\"a\""));
    assert!(first_two[1].contains("\"a2\""));
}
