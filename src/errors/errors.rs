use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A single lexical, syntax or semantic problem, tied to the line it was found on.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn line(&self) -> u32 {
        self.position.0
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::MissingReturn { .. }
                | ErrorImpl::UninitializedVariable { .. }
                | ErrorImpl::UncheckedSpecialReference { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::TypeConflict { .. } => "TypeConflict",
            ErrorImpl::UndefinedSymbol { .. } => "UndefinedSymbol",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::InvalidOperator { .. } => "InvalidOperator",
            ErrorImpl::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            ErrorImpl::BreakContinueOutsideLoop { .. } => "BreakContinueOutsideLoop",
            ErrorImpl::ConstReassignment { .. } => "ConstReassignment",
            ErrorImpl::ArrayIndexNotInteger { .. } => "ArrayIndexNotInteger",
            ErrorImpl::ArrayElementTypeMismatch { .. } => "ArrayElementTypeMismatch",
            ErrorImpl::ConstWithoutInitializer { .. } => "ConstWithoutInitializer",
            ErrorImpl::CannotInferType { .. } => "CannotInferType",
            ErrorImpl::ArraySizeNotInteger { .. } => "ArraySizeNotInteger",
            ErrorImpl::InvalidArraySize { .. } => "InvalidArraySize",
            ErrorImpl::InvalidSymbolUse { .. } => "InvalidSymbolUse",
            ErrorImpl::IncompleteMetadata { .. } => "IncompleteMetadata",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::UninitializedVariable { .. } => "UninitializedVariable",
            ErrorImpl::UncheckedSpecialReference { .. } => "UncheckedSpecialReference",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedLiteral { literal } => {
                ErrorTip::Suggestion(format!("{} is missing its closing delimiter", literal))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::UnexpectedEndOfInput => ErrorTip::Suggestion(String::from(
                "The file ended early, is a closing brace missing?",
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::DuplicateDeclaration { name, scope } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in {}, remove one of the declarations",
                name, scope
            )),
            ErrorImpl::TypeConflict {
                name,
                existing,
                attempted,
                ..
            } => ErrorTip::Suggestion(format!(
                "`{}` was declared as `{}`, it cannot be redeclared as `{}`",
                name, existing, attempted
            )),
            ErrorImpl::UndefinedSymbol { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in this scope", name))
            }
            ErrorImpl::TypeMismatch {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArityMismatch {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::InvalidOperator { operator, operands } => ErrorTip::Suggestion(format!(
                "`{}` cannot be applied to {}",
                operator, operands
            )),
            ErrorImpl::ConditionNotBoolean { received, .. } => ErrorTip::Suggestion(format!(
                "Conditions must be `bool`, received `{}`",
                received
            )),
            ErrorImpl::BreakContinueOutsideLoop { statement } => ErrorTip::Suggestion(format!(
                "`{}` can only be used inside a `while` or `for` body",
                statement
            )),
            ErrorImpl::ConstReassignment { name } => ErrorTip::Suggestion(format!(
                "`{}` is constant, declare it without `const` to modify it",
                name
            )),
            ErrorImpl::ArrayIndexNotInteger { received, .. } => ErrorTip::Suggestion(format!(
                "Array indices must be `int`, received `{}`",
                received
            )),
            ErrorImpl::ArrayElementTypeMismatch {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Array elements must be exactly `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ConstWithoutInitializer { name } => {
                ErrorTip::Suggestion(format!("Give `{}` a value where it is declared", name))
            }
            ErrorImpl::CannotInferType { name } => ErrorTip::Suggestion(format!(
                "`auto` needs an initializer, give `{}` a value or an explicit type",
                name
            )),
            ErrorImpl::ArraySizeNotInteger { received, .. } => ErrorTip::Suggestion(format!(
                "Array sizes must be `int`, received `{}`",
                received
            )),
            ErrorImpl::InvalidArraySize { message, .. } => {
                ErrorTip::Suggestion(message.clone())
            }
            ErrorImpl::InvalidSymbolUse { message, .. } => {
                ErrorTip::Suggestion(message.clone())
            }
            ErrorImpl::IncompleteMetadata { missing } => ErrorTip::Suggestion(format!(
                "The plugin header is missing its {}",
                missing
            )),
            ErrorImpl::MissingReturn { function, .. } => ErrorTip::Suggestion(format!(
                "Not every path through `{}` ends in a `return`",
                function
            )),
            ErrorImpl::UninitializedVariable { name } => ErrorTip::Suggestion(format!(
                "Assign `{}` a value before reading it",
                name
            )),
            ErrorImpl::UncheckedSpecialReference { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.0, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated {literal}")]
    UnterminatedLiteral { literal: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    #[error("{name:?} is already declared in {scope}")]
    DuplicateDeclaration { name: String, scope: String },
    #[error("{name:?} redeclared in {scope} with type {attempted}, previously declared as {existing}")]
    TypeConflict {
        name: String,
        existing: String,
        attempted: String,
        scope: String,
    },
    #[error("undefined symbol {name:?}")]
    UndefinedSymbol { name: String },
    #[error("type mismatch in {context}: expected {expected}, received {received}")]
    TypeMismatch {
        expected: String,
        received: String,
        context: String,
    },
    #[error("function {function:?} expects {expected} arguments, received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("invalid operator {operator:?} for {operands}")]
    InvalidOperator { operator: String, operands: String },
    #[error("{statement} condition must be bool, received {received}")]
    ConditionNotBoolean { statement: String, received: String },
    #[error("{statement:?} outside of a loop")]
    BreakContinueOutsideLoop { statement: String },
    #[error("cannot assign to constant {name:?}")]
    ConstReassignment { name: String },
    #[error("index into {name:?} must be int, received {received}")]
    ArrayIndexNotInteger { name: String, received: String },
    #[error("{element} must be {expected}, received {received}")]
    ArrayElementTypeMismatch {
        element: String,
        expected: String,
        received: String,
    },
    #[error("constant {name:?} declared without an initializer")]
    ConstWithoutInitializer { name: String },
    #[error("cannot infer the type of {name:?} without an initializer")]
    CannotInferType { name: String },
    #[error("size of array {name:?} must be int, received {received}")]
    ArraySizeNotInteger { name: String, received: String },
    #[error("invalid size for array {name:?}: {message}")]
    InvalidArraySize { name: String, message: String },
    #[error("invalid use of {name:?}: {message}")]
    InvalidSymbolUse { name: String, message: String },
    #[error("incomplete plugin metadata: missing {missing}")]
    IncompleteMetadata { missing: String },

    #[error("function {function:?} returning {return_type} may not return a value on every path")]
    MissingReturn { function: String, return_type: String },
    #[error("variable {name:?} may not be initialized")]
    UninitializedVariable { name: String },
    #[error("{reference}() expressions are not fully type-checked")]
    UncheckedSpecialReference { reference: String },
}
