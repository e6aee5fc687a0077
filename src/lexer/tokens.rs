use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("char", TokenKind::Char);
        map.insert("string", TokenKind::String);
        map.insert("void", TokenKind::Void);
        map.insert("auto", TokenKind::Auto);
        map.insert("array", TokenKind::Array);
        map.insert("const", TokenKind::Const);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map.insert("print", TokenKind::Print);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("BepInPlugin", TokenKind::BepInPlugin);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    Semicolon,
    Comma,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=
    Tilde,      // ~

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    PlusPlus,
    MinusMinus,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Special references and function kinds
    BaseRef,  // <base>
    BreedRef, // <breed>
    PropRef,  // <prop>
    HookRef,  // <hook>

    // Reserved
    Int,
    Float,
    Bool,
    Char,
    String,
    Void,
    Auto,
    Array,
    Const,
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    Return,
    Print,
    True,
    False,
    BepInPlugin,
}

impl TokenKind {
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Bool
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::Void
                | TokenKind::Auto
                | TokenKind::Array
        )
    }

    /// Tokens that can only begin a statement; the parser resynchronizes on them.
    pub fn starts_statement(&self) -> bool {
        self.is_type_keyword()
            || matches!(
                self,
                TokenKind::Const
                    | TokenKind::If
                    | TokenKind::While
                    | TokenKind::For
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Return
                    | TokenKind::Print
                    | TokenKind::OpenCurly
            )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[
            TokenKind::Identifier,
            TokenKind::IntLiteral,
            TokenKind::FloatLiteral,
            TokenKind::CharLiteral,
            TokenKind::StringLiteral,
        ]) {
            write!(f, "{:>4}  {} ({:?})", self.line, self.kind, self.value)
        } else {
            write!(f, "{:>4}  {}", self.line, self.kind)
        }
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }
}
