use std::fmt::Display;

use super::{
    expressions::{BinaryOperator, Expr},
    types::Type,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: u32) -> Self {
        Stmt { kind, line }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    VarDecl(VarDecl),
    ArrayDecl(ArrayDecl),
    Assignment(Assignment),
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Block,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Print(Expr),
    Block(Block),
    Expression(Expr),
}

/// `int x = 1;`, `const float y = 2.0;`, `auto z = x;`, `string s;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub var_type: Type,
    pub is_const: bool,
    pub value: Option<Expr>,
}

/// `int xs[4];`, `int xs[] = [1, 2];`, `int xs[3] = [1, 2, 3];`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDecl {
    pub name: String,
    pub element_type: Type,
    pub is_const: bool,
    pub size: Option<Expr>,
    pub values: Option<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: AssignTarget,
    pub operator: AssignOperator,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Variable(String),
    Index { name: String, index: Expr },
}

impl AssignTarget {
    pub fn name(&self) -> &str {
        match self {
            AssignTarget::Variable(name) => name,
            AssignTarget::Index { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOperator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOperator {
    /// The arithmetic operator a compound assignment applies before storing.
    pub fn binary(&self) -> Option<BinaryOperator> {
        match self {
            AssignOperator::Assign => None,
            AssignOperator::AddAssign => Some(BinaryOperator::Add),
            AssignOperator::SubAssign => Some(BinaryOperator::Subtract),
            AssignOperator::MulAssign => Some(BinaryOperator::Multiply),
            AssignOperator::DivAssign => Some(BinaryOperator::Divide),
        }
    }
}

impl Display for AssignOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            AssignOperator::Assign => "=",
            AssignOperator::AddAssign => "+=",
            AssignOperator::SubAssign => "-=",
            AssignOperator::MulAssign => "*=",
            AssignOperator::DivAssign => "/=",
        };

        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub line: u32,
}
