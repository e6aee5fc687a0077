//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program-level
//! parsing entry points. Expressions use a Pratt parser with NUD/LED
//! handlers; statements and types dispatch through lookup tables keyed
//! by the current token.
//!
//! Syntax errors inside a block are recorded and the parser resynchronizes
//! at the next statement boundary, so one run can report several of them.
//! Any syntax error means no `Program` is returned.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::{Function, FunctionKind, Metadata, Parameter, Program},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler,
        NUDLookup, StmtHandler, StmtLookup,
    },
    stmt::{parse_block, parse_if_stmt},
    types::{create_token_type_lookups, parse_type, TypeNUDHandler, TypeNUDLookup},
};

/// What the parser does after a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Skip to the next statement (or declaration) boundary and keep going.
    #[default]
    Resynchronize,
    /// Report the first syntax error only.
    StopAtFirst,
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    mode: RecoveryMode,
    /// Syntax errors recorded while resynchronizing
    errors: Vec<Error>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: Rc<String>, mode: RecoveryMode) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map(|token| token.line).unwrap_or(1);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                line,
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            mode,
            errors: vec![],
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        // `pos` never moves past the trailing EOF
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    pub fn current_line(&self) -> u32 {
        self.current_token().line
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.current_token_kind() != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    pub fn at_eof(&self) -> bool {
        self.current_token_kind() == TokenKind::EOF
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) if !self.at_eof() => Err(error),
                _ => Err(self.unexpected_token()),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// The error for the current token: "unexpected end of input" at EOF,
    /// otherwise "unexpected token" carrying its lexeme.
    pub fn unexpected_token(&self) -> Error {
        if self.at_eof() {
            Error::new(ErrorImpl::UnexpectedEndOfInput, self.get_position())
        } else {
            Error::new(
                ErrorImpl::UnexpectedToken {
                    token: self.current_token().value.clone(),
                },
                self.get_position(),
            )
        }
    }

    pub fn unexpected_token_detailed(&self, message: &str) -> Error {
        if self.at_eof() {
            return Error::new(ErrorImpl::UnexpectedEndOfInput, self.get_position());
        }

        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Binding power of the current token; tokens that cannot continue an
    /// expression have `Default`.
    pub fn current_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.current_token_kind())
            .unwrap_or(&BindingPower::Default)
    }

    /// Registers a left denotation (infix/postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix handlers do not touch the binding power table, so a token can
    /// be both a prefix and an infix operator (`-`, `++`, `(`, `[`).
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Gives a token a binding power without an expression handler. Used for
    /// the assignment operators, which only the statement parser consumes.
    pub fn binding_power(&mut self, kind: TokenKind, binding_power: BindingPower) {
        self.binding_power_lookup.insert(kind, binding_power);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type handler for a token.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        Position(self.current_line(), Rc::clone(&self.file))
    }

    /// Handles a syntax error from the statement that began at `start`.
    ///
    /// In `StopAtFirst` mode the error is handed back so it propagates.
    /// Otherwise it is recorded and the token stream is skipped to the next
    /// statement boundary, always moving past `start`.
    pub fn recover(&mut self, error: Error, start: usize) -> Result<(), Error> {
        if self.mode == RecoveryMode::StopAtFirst {
            return Err(error);
        }

        self.record(error);

        if self.skip_open_header(start) {
            return self.skip_failed_body();
        }

        loop {
            match self.current_token_kind() {
                TokenKind::EOF => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::CloseCurly if self.pos > start => break,
                kind if kind.starts_statement() && self.pos > start => break,
                _ => {
                    self.advance();
                }
            }
        }

        tracing::debug!(line = self.current_line(), "resynchronized after syntax error");
        Ok(())
    }

    /// When the statement at `start` failed inside the parentheses of an
    /// `if`, `while` or `for` header, skips to the matching `)`. Returns
    /// whether the statement's body is next.
    fn skip_open_header(&mut self, start: usize) -> bool {
        let opens_header = self
            .tokens
            .get(start)
            .is_some_and(|token| matches!(token.kind, TokenKind::If | TokenKind::While | TokenKind::For));
        if !opens_header {
            return false;
        }

        let mut depth = self.tokens[start..self.pos]
            .iter()
            .fold(0i32, |depth, token| match token.kind {
                TokenKind::OpenParen => depth + 1,
                TokenKind::CloseParen => depth - 1,
                _ => depth,
            });
        if depth <= 0 {
            return false;
        }

        while depth > 0 {
            match self.current_token_kind() {
                TokenKind::EOF | TokenKind::OpenCurly | TokenKind::CloseCurly => break,
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }

        self.current_token_kind() == TokenKind::OpenCurly
    }

    /// Consumes the body of a statement whose header failed, along with any
    /// `else` branches, so they are not read as statements of their own.
    /// Errors inside them are still reported.
    fn skip_failed_body(&mut self) -> Result<(), Error> {
        let start = self.pos;
        if let Err(error) = parse_block(self) {
            return self.recover(error, start);
        }

        while self.current_token_kind() == TokenKind::Else {
            self.advance();
            let start = self.pos;

            let branch = if self.current_token_kind() == TokenKind::If {
                parse_if_stmt(self).map(drop)
            } else {
                parse_block(self).map(drop)
            };
            if let Err(error) = branch {
                self.recover(error, start)?;
            }
        }

        tracing::debug!(line = self.current_line(), "skipped statement with malformed header");
        Ok(())
    }

    /// Like [`Parser::recover`], but skips a whole top-level declaration:
    /// everything up to and including the next brace-balanced body.
    pub fn recover_declaration(&mut self, error: Error) -> Result<(), Error> {
        if self.mode == RecoveryMode::StopAtFirst {
            return Err(error);
        }

        self.record(error);

        let mut depth = 0usize;
        while !self.at_eof() {
            match self.advance().kind {
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly if depth <= 1 => break,
                TokenKind::CloseCurly => depth -= 1,
                _ => {}
            }
        }

        tracing::debug!(line = self.current_line(), "skipped malformed declaration");
        Ok(())
    }

    fn record(&mut self, error: Error) {
        // A truncated file fails every enclosing construct at once; keep one report.
        let repeated_end = matches!(error.get_error_impl(), ErrorImpl::UnexpectedEndOfInput)
            && self
                .errors
                .last()
                .is_some_and(|last| matches!(last.get_error_impl(), ErrorImpl::UnexpectedEndOfInput));

        if !repeated_end {
            self.errors.push(error);
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// Parses a stream of tokens into a `Program`, resynchronizing after
/// syntax errors.
///
/// Returns every syntax error found if there was at least one.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Vec<Error>> {
    parse_with(tokens, file, RecoveryMode::default())
}

/// Parses a stream of tokens with an explicit recovery policy.
pub fn parse_with(
    tokens: Vec<Token>,
    file: Rc<String>,
    mode: RecoveryMode,
) -> Result<Program, Vec<Error>> {
    let mut parser = Parser::new(tokens, Rc::clone(&file), mode);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    match parse_program(&mut parser) {
        Ok(program) if parser.errors.is_empty() => Ok(program),
        Ok(_) => Err(parser.errors),
        Err(error) => {
            parser.record(error);
            Err(parser.errors)
        }
    }
}

fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let metadata = if parser.current_token_kind() == TokenKind::OpenBracket {
        match parse_metadata(parser) {
            Ok(metadata) => Some(metadata),
            Err(error) => {
                parser.recover(error, parser.pos())?;
                skip_to_declaration(parser);
                None
            }
        }
    } else {
        None
    };

    let mut functions = vec![];

    if parser.at_eof() {
        return Err(Error::new(
            ErrorImpl::UnexpectedEndOfInput,
            parser.get_position(),
        ));
    }

    while !parser.at_eof() {
        match parse_function(parser) {
            Ok(function) => {
                tracing::trace!(name = %function.name, kind = %function.kind, "parsed function");
                functions.push(function);
            }
            Err(error) => parser.recover_declaration(error)?,
        }
    }

    Ok(Program {
        metadata,
        functions,
        file: Rc::clone(&parser.file),
    })
}

fn skip_to_declaration(parser: &mut Parser) {
    while !parser.at_eof() {
        let kind = parser.current_token_kind();
        if kind.is_type_keyword()
            || matches!(kind, TokenKind::BaseRef | TokenKind::BreedRef | TokenKind::HookRef)
        {
            break;
        }
        parser.advance();
    }
}

/// `[BepInPlugin("id", "version", "name")]`
pub fn parse_metadata(parser: &mut Parser) -> Result<Metadata, Error> {
    let line = parser.expect(TokenKind::OpenBracket)?.line;
    let error = parser.unexpected_token_detailed("expected `BepInPlugin` in the plugin header");
    parser.expect_error(TokenKind::BepInPlugin, Some(error))?;
    parser.expect(TokenKind::OpenParen)?;

    let id = parser.expect(TokenKind::StringLiteral)?.value;
    parser.expect(TokenKind::Comma)?;
    let version = parser.expect(TokenKind::StringLiteral)?.value;
    parser.expect(TokenKind::Comma)?;
    let name = parser.expect(TokenKind::StringLiteral)?.value;

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Metadata {
        id,
        version,
        name,
        line,
    })
}

/// `[<base> | <breed> | <hook>] type name ( params ) { body }`
pub fn parse_function(parser: &mut Parser) -> Result<Function, Error> {
    let line = parser.current_line();

    let kind = match parser.current_token_kind() {
        TokenKind::BaseRef => FunctionKind::Base,
        TokenKind::BreedRef => FunctionKind::Breed,
        TokenKind::HookRef => FunctionKind::Hook,
        _ => FunctionKind::Normal,
    };
    if kind != FunctionKind::Normal {
        parser.advance();
    }

    if !parser.current_token_kind().is_type_keyword() {
        return Err(parser.unexpected_token_detailed("expected a function declaration"));
    }

    let return_type = parse_type(parser)?;

    let error = parser.unexpected_token_detailed("expected a function name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            params.push(parse_parameter(parser)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Function {
        kind,
        name,
        params,
        return_type,
        body,
        line,
    })
}

fn parse_parameter(parser: &mut Parser) -> Result<Parameter, Error> {
    let line = parser.current_line();
    let is_const = parser.current_token_kind() == TokenKind::Const;
    if is_const {
        parser.advance();
    }

    let param_type = parse_type(parser)?.with_const(is_const);

    let error = parser.unexpected_token_detailed("expected a parameter name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    Ok(Parameter {
        name,
        param_type,
        is_const,
        line,
    })
}
