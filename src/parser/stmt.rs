use crate::{
    ast::{
        expressions::{Expr, ExprKind},
        statements::{ArrayDecl, AssignOperator, AssignTarget, Assignment, Block, Stmt, StmtKind, VarDecl},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_expr, parse_expr_list},
        lookups::BindingPower,
    },
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        let handler = *handler;
        return handler(parser);
    }

    // An assignment always goes on to consume its terminator
    let stmt = parse_simple_stmt(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(stmt)
}

/// `{ stmt* }`, resynchronizing after statements that fail to parse.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let line = parser.expect(TokenKind::OpenCurly)?.line;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && !parser.at_eof() {
        let start = parser.pos();
        match parse_stmt(parser) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => parser.recover(error, start)?,
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Block { statements, line })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let block = parse_block(parser)?;
    let line = block.line;

    Ok(Stmt::new(StmtKind::Block(block), line))
}

fn assign_operator(kind: TokenKind) -> Option<AssignOperator> {
    match kind {
        TokenKind::Assignment => Some(AssignOperator::Assign),
        TokenKind::PlusEquals => Some(AssignOperator::AddAssign),
        TokenKind::MinusEquals => Some(AssignOperator::SubAssign),
        TokenKind::StarEquals => Some(AssignOperator::MulAssign),
        TokenKind::SlashEquals => Some(AssignOperator::DivAssign),
        _ => None,
    }
}

/// An assignment or a bare expression, without its terminator. Shared by
/// ordinary statements and the `for` header.
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.current_line();
    let expr = parse_expr(parser, BindingPower::Assignment)?;

    let operator = match assign_operator(parser.current_token_kind()) {
        Some(operator) => operator,
        None => return Ok(Stmt::new(StmtKind::Expression(expr), line)),
    };

    let target = match expr.kind {
        ExprKind::Variable(name) => AssignTarget::Variable(name),
        ExprKind::ArrayAccess { name, index } => AssignTarget::Index {
            name,
            index: *index,
        },
        _ => {
            return Err(parser.unexpected_token_detailed(
                "only variables and array elements can be assigned to",
            ))
        }
    };

    parser.advance();
    let value = parse_expr(parser, BindingPower::Assignment)?;

    Ok(Stmt::new(
        StmtKind::Assignment(Assignment {
            target,
            operator,
            value,
        }),
        line,
    ))
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let stmt = parse_declaration(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(stmt)
}

/// `[const] type name [= expr]` or `[const] type name [size?] [= [..]]`,
/// without the terminator.
pub fn parse_declaration(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.current_line();

    let is_const = parser.current_token_kind() == TokenKind::Const;
    if is_const {
        parser.advance();
    }

    let declared_type = parse_type(parser)?.with_const(is_const);

    let error = parser.unexpected_token_detailed("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    if parser.current_token_kind() != TokenKind::OpenBracket {
        let value = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Assignment)?)
        } else {
            None
        };

        return Ok(Stmt::new(
            StmtKind::VarDecl(VarDecl {
                name,
                var_type: declared_type,
                is_const,
                value,
            }),
            line,
        ));
    }

    parser.advance();
    let size = if parser.current_token_kind() != TokenKind::CloseBracket {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::CloseBracket)?;

    let values = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        parser.expect(TokenKind::OpenBracket)?;
        Some(parse_expr_list(parser, TokenKind::CloseBracket)?)
    } else {
        None
    };

    if size.is_none() && values.is_none() {
        return Err(parser.unexpected_token_detailed("an array needs a size or an initializer"));
    }

    Ok(Stmt::new(
        StmtKind::ArrayDecl(ArrayDecl {
            name,
            element_type: declared_type,
            is_const,
            size,
            values,
        }),
        line,
    ))
}

fn parse_parenthesized_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line;

    let condition = parse_parenthesized_expr(parser)?;
    let then_block = parse_block(parser)?;

    let else_block = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            // `else if` is sugar for an else block holding one `if`
            let nested = parse_if_stmt(parser)?;
            let nested_line = nested.line;
            Some(Block {
                statements: vec![nested],
                line: nested_line,
            })
        } else {
            Some(parse_block(parser)?)
        }
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            condition,
            then_block,
            else_block,
        },
        line,
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line;

    let condition = parse_parenthesized_expr(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::new(StmtKind::While { condition, body }, line))
}

/// `for (init; condition; update) { .. }`, every header part optional.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line;
    parser.expect(TokenKind::OpenParen)?;

    let init = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else if parser.current_token_kind().is_type_keyword()
        || parser.current_token_kind() == TokenKind::Const
    {
        Some(Box::new(parse_declaration(parser)?))
    } else {
        Some(Box::new(parse_simple_stmt(parser)?))
    };
    parser.expect(TokenKind::Semicolon)?;

    let condition = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let update = if parser.current_token_kind() == TokenKind::CloseParen {
        None
    } else {
        Some(Box::new(parse_simple_stmt(parser)?))
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::new(
        StmtKind::For {
            init,
            condition,
            update,
            body,
        },
        line,
    ))
}

pub fn parse_break_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    parser.expect(TokenKind::Semicolon)?;

    let kind = if token.kind == TokenKind::Break {
        StmtKind::Break
    } else {
        StmtKind::Continue
    };

    Ok(Stmt::new(kind, token.line))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Return(value), line))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line;

    let value = parse_parenthesized_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Print(value), line))
}
