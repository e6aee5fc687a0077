use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first. Only used to decide where an
/// expression ends; it never changes what an operator means.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    LogicalNot,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Increment,
    Call,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Assignment is statement-level; it stops expression parsing
    parser.binding_power(TokenKind::Assignment, BindingPower::Assignment);
    parser.binding_power(TokenKind::PlusEquals, BindingPower::Assignment);
    parser.binding_power(TokenKind::MinusEquals, BindingPower::Assignment);
    parser.binding_power(TokenKind::StarEquals, BindingPower::Assignment);
    parser.binding_power(TokenKind::SlashEquals, BindingPower::Assignment);

    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Relational, non-associative
    parser.led(TokenKind::Less, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_comparison_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);

    // Postfix increment/decrement
    parser.led(TokenKind::PlusPlus, BindingPower::Increment, parse_postfix_expr);
    parser.led(TokenKind::MinusMinus, BindingPower::Increment, parse_postfix_expr);

    // Call and index
    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Call, parse_index_expr);

    // Literals and symbols
    parser.nud(TokenKind::IntLiteral, parse_primary_expr);
    parser.nud(TokenKind::FloatLiteral, parse_primary_expr);
    parser.nud(TokenKind::CharLiteral, parse_primary_expr);
    parser.nud(TokenKind::StringLiteral, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);

    // Prefix operators
    parser.nud(TokenKind::Not, parse_not_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::Tilde, parse_prefix_expr);
    parser.nud(TokenKind::PlusPlus, parse_prefix_increment_expr);
    parser.nud(TokenKind::MinusMinus, parse_prefix_increment_expr);

    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_literal_expr);

    // Special references
    parser.nud(TokenKind::BaseRef, parse_special_reference_expr);
    parser.nud(TokenKind::BreedRef, parse_special_reference_expr);
    parser.nud(TokenKind::PropRef, parse_special_reference_expr);
    parser.nud(TokenKind::HookRef, parse_special_reference_expr);

    // Statements
    parser.stmt(TokenKind::Int, parse_declaration_stmt);
    parser.stmt(TokenKind::Float, parse_declaration_stmt);
    parser.stmt(TokenKind::Bool, parse_declaration_stmt);
    parser.stmt(TokenKind::Char, parse_declaration_stmt);
    parser.stmt(TokenKind::String, parse_declaration_stmt);
    parser.stmt(TokenKind::Void, parse_declaration_stmt);
    parser.stmt(TokenKind::Auto, parse_declaration_stmt);
    parser.stmt(TokenKind::Array, parse_declaration_stmt);
    parser.stmt(TokenKind::Const, parse_declaration_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Break, parse_break_continue_stmt);
    parser.stmt(TokenKind::Continue, parse_break_continue_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Print, parse_print_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
