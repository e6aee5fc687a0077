//! Type parsing implementation.
//!
//! Handles the type names that start declarations, parameters and function
//! headers:
//!
//! - Primitive types (`int`, `float`, `bool`, `char`, `string`, `void`, `auto`)
//! - Array types (`array int`)
//!
//! Like expressions, types dispatch through a lookup table keyed by the
//! current token.

use std::collections::HashMap;

use crate::{
    ast::types::{BaseType, Type},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for the type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_primitive_type);
    parser.type_nud(TokenKind::Float, parse_primitive_type);
    parser.type_nud(TokenKind::Bool, parse_primitive_type);
    parser.type_nud(TokenKind::Char, parse_primitive_type);
    parser.type_nud(TokenKind::String, parse_primitive_type);
    parser.type_nud(TokenKind::Void, parse_primitive_type);
    parser.type_nud(TokenKind::Auto, parse_primitive_type);
    parser.type_nud(TokenKind::Array, parse_array_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<Type, Error> {
    let base = match parser.current_token_kind() {
        TokenKind::Int => BaseType::Int,
        TokenKind::Float => BaseType::Float,
        TokenKind::Bool => BaseType::Bool,
        TokenKind::Char => BaseType::Char,
        TokenKind::String => BaseType::String,
        TokenKind::Void => BaseType::Void,
        TokenKind::Auto => BaseType::Auto,
        _ => return Err(parser.unexpected_token_detailed("expected a type")),
    };

    parser.advance();
    Ok(Type::new(base))
}

/// `array T`; arrays of arrays are not part of the language.
pub fn parse_array_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Array)?;

    if parser.current_token_kind() == TokenKind::Array {
        return Err(parser.unexpected_token_detailed("arrays cannot be nested"));
    }

    Ok(parse_primitive_type(parser)?.as_array())
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    let handler = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected_token_detailed("expected a type")),
    };

    handler(parser)
}
