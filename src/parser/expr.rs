use crate::{
    ast::expressions::{
        BinaryOperator, Expr, ExprKind, IncrementOperator, Literal, ReferenceKind, UnaryOperator,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_token()),
    };

    let mut left = nud(parser)?;

    // While the next token binds tighter than the caller, keep extending lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        let led_bp = parser.current_binding_power();
        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let line = parser.current_line();
    let value = parser.current_token().value.clone();

    let kind = match parser.current_token_kind() {
        TokenKind::IntLiteral => match value.parse::<i64>() {
            Ok(number) => ExprKind::Literal(Literal::Int(number)),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: value },
                    parser.get_position(),
                ))
            }
        },
        TokenKind::FloatLiteral => match value.parse::<f64>() {
            Ok(number) => ExprKind::Literal(Literal::Float(number)),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: value },
                    parser.get_position(),
                ))
            }
        },
        TokenKind::CharLiteral => match value.chars().next() {
            Some(character) => ExprKind::Literal(Literal::Char(character)),
            None => return Err(parser.unexpected_token()),
        },
        TokenKind::StringLiteral => ExprKind::Literal(Literal::String(value)),
        TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
        TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
        TokenKind::Identifier => ExprKind::Variable(value),
        _ => return Err(parser.unexpected_token()),
    };

    parser.advance();
    Ok(Expr::new(kind, line))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Dash => Some(BinaryOperator::Subtract),
        TokenKind::Star => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Modulo),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEquals => Some(BinaryOperator::LessEquals),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEquals),
        TokenKind::Equals => Some(BinaryOperator::Equals),
        TokenKind::NotEquals => Some(BinaryOperator::NotEquals),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

/// Left-associative binary operators: the right operand is parsed at the
/// operator's own binding power so equal-precedence operators fold left.
pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = match binary_operator(parser.current_token_kind()) {
        Some(operator) => operator,
        None => return Err(parser.unexpected_token()),
    };
    let line = parser.advance().line;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::new(
        ExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        line,
    ))
}

/// Relational and equality operators do not chain: `a < b < c` is a syntax error.
pub fn parse_comparison_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let comparison = parse_binary_expr(parser, left, bp)?;

    if parser.current_binding_power() == BindingPower::Relational {
        return Err(parser.unexpected_token_detailed(
            "comparison operators cannot be chained, combine them with `&&`",
        ));
    }

    Ok(comparison)
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOperator::Minus,
        TokenKind::Plus => UnaryOperator::Plus,
        _ => UnaryOperator::Complement,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::new(
        ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        operator_token.line,
    ))
}

/// `!` binds looser than comparisons: `!a == b` negates `a == b`.
pub fn parse_not_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let line = parser.advance().line;
    let operand = parse_expr(parser, BindingPower::LogicalNot)?;

    Ok(Expr::new(
        ExprKind::Unary {
            operator: UnaryOperator::Not,
            operand: Box::new(operand),
        },
        line,
    ))
}

fn increment_operator(kind: TokenKind) -> IncrementOperator {
    if kind == TokenKind::PlusPlus {
        IncrementOperator::Increment
    } else {
        IncrementOperator::Decrement
    }
}

pub fn parse_prefix_increment_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let error = parser.unexpected_token_detailed("`++` and `--` can only be applied to a variable");
    let target = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    Ok(Expr::new(
        ExprKind::IncrementDecrement {
            operator: increment_operator(operator_token.kind),
            is_prefix: true,
            target,
        },
        operator_token.line,
    ))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let target = match left.kind {
        ExprKind::Variable(name) => name,
        _ => {
            return Err(parser.unexpected_token_detailed(
                "`++` and `--` can only be applied to a variable",
            ))
        }
    };

    let operator_token = parser.advance().clone();

    Ok(Expr::new(
        ExprKind::IncrementDecrement {
            operator: increment_operator(operator_token.kind),
            is_prefix: false,
            target,
        },
        left.line,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Comma-separated expressions up to (and including) `closing`.
pub fn parse_expr_list(parser: &mut Parser, closing: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = vec![];

    if parser.current_token_kind() != closing {
        loop {
            items.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(closing)?;
    Ok(items)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let callee = match left.kind {
        ExprKind::Variable(name) => name,
        _ => return Err(parser.unexpected_token_detailed("only named functions can be called")),
    };

    parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::new(ExprKind::Call { callee, arguments }, left.line))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let name = match left.kind {
        ExprKind::Variable(name) => name,
        _ => return Err(parser.unexpected_token_detailed("only named arrays can be indexed")),
    };

    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::new(
        ExprKind::ArrayAccess {
            name,
            index: Box::new(index),
        },
        left.line,
    ))
}

pub fn parse_array_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let line = parser.advance().line;
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::new(ExprKind::ArrayLiteral(elements), line))
}

/// `<base>(expr)`, `<breed>(expr)`, `<prop>(expr)`, `<hook>(expr)`
pub fn parse_special_reference_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let reference_token = parser.advance().clone();
    let kind = match reference_token.kind {
        TokenKind::BaseRef => ReferenceKind::Base,
        TokenKind::BreedRef => ReferenceKind::Breed,
        TokenKind::PropRef => ReferenceKind::Prop,
        _ => ReferenceKind::Hook,
    };

    parser.expect(TokenKind::OpenParen)?;
    let inner = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(
        ExprKind::SpecialReference {
            kind,
            inner: Box::new(inner),
        },
        reference_token.line,
    ))
}
