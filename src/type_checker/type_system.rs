//! Promotion rules, operator tables and constant folding.
//!
//! Every operator query answers `None` when the combination is invalid; the
//! checker turns that into a diagnostic. `Error` operands always produce
//! `Error` so a failed sub-expression is reported once.

use std::{cmp::Ordering, fmt::Display};

use crate::ast::{
    expressions::{BinaryOperator, Expr, ExprKind, Literal, UnaryOperator},
    types::{BaseType, Type},
};

/// Whether a value of type `value` can be stored where `target` is expected.
pub fn is_compatible(target: Type, value: Type) -> bool {
    if target.is_error() || value.is_error() || target.is_auto() || value.is_auto() {
        return true;
    }

    if target.is_array || value.is_array {
        return target == value;
    }

    if target.base == value.base {
        return true;
    }

    matches!(
        (target.base, value.base),
        (BaseType::Float, BaseType::Int)
            | (BaseType::Int, BaseType::Char)
            | (BaseType::Float, BaseType::Char)
    )
}

/// Exact element match, as required inside array literals and indexed stores.
/// Unresolved element types are not reported again.
pub fn is_exact_element(expected: Type, received: Type) -> bool {
    expected.is_error()
        || received.is_error()
        || expected.is_auto()
        || received.is_auto()
        || expected == received
}

fn promote(left: Type, right: Type) -> Type {
    if left.base == BaseType::Float || right.base == BaseType::Float {
        Type::float()
    } else {
        Type::int()
    }
}

fn is_ordered(left: Type, right: Type) -> bool {
    if left.is_array || right.is_array {
        return false;
    }

    (left.is_numeric() && right.is_numeric())
        || (left.base == BaseType::Char && right.base == BaseType::Char)
        || (left.base == BaseType::String && right.base == BaseType::String)
}

pub fn binary_result(operator: BinaryOperator, left: Type, right: Type) -> Option<Type> {
    if left.is_error() || right.is_error() {
        return Some(Type::error());
    }

    if left.is_auto() || right.is_auto() {
        return if operator.is_arithmetic() {
            Some(Type::auto())
        } else {
            Some(Type::bool())
        };
    }

    if operator.is_arithmetic() {
        if left.is_numeric() && right.is_numeric() {
            return Some(promote(left, right));
        }

        if operator == BinaryOperator::Add
            && left.is_scalar(BaseType::String)
            && right.is_scalar(BaseType::String)
        {
            return Some(Type::string());
        }

        return None;
    }

    if operator.is_ordering() {
        return is_ordered(left, right).then(Type::bool);
    }

    if operator.is_equality() {
        let comparable = is_ordered(left, right)
            || (left.is_scalar(BaseType::Bool) && right.is_scalar(BaseType::Bool));
        return comparable.then(Type::bool);
    }

    // && and ||
    (left.is_scalar(BaseType::Bool) && right.is_scalar(BaseType::Bool)).then(Type::bool)
}

pub fn unary_result(operator: UnaryOperator, operand: Type) -> Option<Type> {
    if operand.is_error() {
        return Some(Type::error());
    }

    if operand.is_auto() {
        return match operator {
            UnaryOperator::Not => Some(Type::bool()),
            _ => Some(Type::auto()),
        };
    }

    match operator {
        UnaryOperator::Plus | UnaryOperator::Minus => {
            operand.is_numeric().then(|| operand.with_const(false))
        }
        UnaryOperator::Not => operand.is_scalar(BaseType::Bool).then(Type::bool),
        UnaryOperator::Complement => operand.is_scalar(BaseType::Int).then(Type::int),
    }
}

/// `++`/`--` keep the operand's numeric type.
pub fn increment_result(operand: Type) -> Option<Type> {
    if operand.is_error() || operand.is_auto() {
        return Some(operand.with_const(false));
    }

    operand.is_numeric().then(|| operand.with_const(false))
}

//--------------------------------------------------------------------------------------------------
// Constant folding
//--------------------------------------------------------------------------------------------------

/// The value of an expression built only from literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    String(String),
}

impl Value {
    pub fn get_type(&self) -> Type {
        match self {
            Value::Int(_) => Type::int(),
            Value::Float(_) => Type::float(),
            Value::Bool(_) => Type::bool(),
            Value::Char(_) => Type::char(),
            Value::String(_) => Type::string(),
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Char(value) => write!(f, "{:?}", value),
            Value::String(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(value) => Value::Int(*value),
            Literal::Float(value) => Value::Float(*value),
            Literal::Bool(value) => Value::Bool(*value),
            Literal::Char(value) => Value::Char(*value),
            Literal::String(value) => Value::String(value.clone()),
        }
    }
}

/// Folds `expr` to a value when every leaf is a literal. Anything that
/// depends on a symbol, overflows or divides by zero yields `None`.
pub fn evaluate(expr: &Expr) -> Option<Value> {
    match &expr.kind {
        ExprKind::Literal(literal) => Some(Value::from(literal)),
        ExprKind::Unary { operator, operand } => evaluate_unary(*operator, evaluate(operand)?),
        ExprKind::Binary {
            operator,
            left,
            right,
        } => evaluate_binary(*operator, evaluate(left)?, evaluate(right)?),
        _ => None,
    }
}

fn evaluate_unary(operator: UnaryOperator, operand: Value) -> Option<Value> {
    match (operator, operand) {
        (UnaryOperator::Plus, value @ (Value::Int(_) | Value::Float(_))) => Some(value),
        (UnaryOperator::Minus, Value::Int(value)) => value.checked_neg().map(Value::Int),
        (UnaryOperator::Minus, Value::Float(value)) => Some(Value::Float(-value)),
        (UnaryOperator::Not, Value::Bool(value)) => Some(Value::Bool(!value)),
        // Ones' complement: x -> -(x + 1)
        (UnaryOperator::Complement, Value::Int(value)) => Some(Value::Int(!value)),
        _ => None,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(left), Value::Int(right)) => Some(left.cmp(right)),
        (Value::Char(left), Value::Char(right)) => Some(left.cmp(right)),
        (Value::String(left), Value::String(right)) => Some(left.chars().cmp(right.chars())),
        (Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
        _ => left.as_float()?.partial_cmp(&right.as_float()?),
    }
}

fn evaluate_arithmetic(operator: BinaryOperator, left: Value, right: Value) -> Option<Value> {
    match (left, right) {
        (Value::Int(left), Value::Int(right)) => {
            let result = match operator {
                BinaryOperator::Add => left.checked_add(right),
                BinaryOperator::Subtract => left.checked_sub(right),
                BinaryOperator::Multiply => left.checked_mul(right),
                BinaryOperator::Divide => left.checked_div(right),
                BinaryOperator::Modulo => left.checked_rem(right),
                _ => None,
            };

            result.map(Value::Int)
        }
        (Value::String(left), Value::String(right)) if operator == BinaryOperator::Add => {
            Some(Value::String(left + &right))
        }
        (left, right) => {
            let (left, right) = (left.as_float()?, right.as_float()?);
            let result = match operator {
                BinaryOperator::Add => left + right,
                BinaryOperator::Subtract => left - right,
                BinaryOperator::Multiply => left * right,
                BinaryOperator::Divide if right != 0.0 => left / right,
                BinaryOperator::Modulo if right != 0.0 => left % right,
                _ => return None,
            };

            Some(Value::Float(result))
        }
    }
}

fn evaluate_binary(operator: BinaryOperator, left: Value, right: Value) -> Option<Value> {
    // Only combinations the checker accepts are folded
    binary_result(operator, left.get_type(), right.get_type())?;

    if operator.is_arithmetic() {
        return evaluate_arithmetic(operator, left, right);
    }

    let result = match operator {
        BinaryOperator::Less => compare(&left, &right)? == Ordering::Less,
        BinaryOperator::LessEquals => compare(&left, &right)? != Ordering::Greater,
        BinaryOperator::Greater => compare(&left, &right)? == Ordering::Greater,
        BinaryOperator::GreaterEquals => compare(&left, &right)? != Ordering::Less,
        BinaryOperator::Equals => compare(&left, &right)? == Ordering::Equal,
        BinaryOperator::NotEquals => compare(&left, &right)? != Ordering::Equal,
        BinaryOperator::And => matches!((left, right), (Value::Bool(true), Value::Bool(true))),
        BinaryOperator::Or => {
            matches!(left, Value::Bool(true)) || matches!(right, Value::Bool(true))
        }
        _ => return None,
    };

    Some(Value::Bool(result))
}
