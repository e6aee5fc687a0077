use std::{fmt::Display, rc::Rc};

use super::{statements::Block, types::Type};

/// The root of a parsed `.rwlz` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub metadata: Option<Metadata>,
    pub functions: Vec<Function>,
    pub file: Rc<String>,
}

/// `[BepInPlugin("id", "version", "name")]`
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub id: String,
    pub version: String,
    pub name: String,
    pub line: u32,
}

/// The four declaration forms share one shape and differ only by `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub kind: FunctionKind,
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Type,
    pub body: Block,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Base,
    Breed,
    Hook,
    Normal,
}

impl Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionKind::Base => write!(f, "base"),
            FunctionKind::Breed => write!(f, "breed"),
            FunctionKind::Hook => write!(f, "hook"),
            FunctionKind::Normal => write!(f, "normal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
    pub is_const: bool,
    pub line: u32,
}
