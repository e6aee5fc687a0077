use std::{collections::HashMap, rc::Rc};

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{ast::FunctionKind, types::Type},
    errors::errors::{Error as CompileError, ErrorImpl},
    Position,
};

/// Index of a scope inside [`SymbolTable`]. Scopes are never removed, so an
/// id stays valid for the lifetime of the table.
pub type ScopeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<(String, Type)>,
    pub return_type: Type,
    pub kind: FunctionKind,
    pub is_builtin: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function(FunctionSignature),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Declared type. For functions, the return type.
    pub ty: Type,
    pub is_const: bool,
    pub is_initialized: bool,
    pub is_used: bool,
    pub line: u32,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn variable(name: String, ty: Type, is_const: bool, is_initialized: bool, line: u32) -> Self {
        Symbol {
            name,
            ty: ty.with_const(is_const),
            is_const,
            is_initialized,
            is_used: false,
            line,
            kind: SymbolKind::Variable,
        }
    }

    pub fn parameter(name: String, ty: Type, is_const: bool, line: u32) -> Self {
        Symbol {
            name,
            ty: ty.with_const(is_const),
            is_const,
            is_initialized: true,
            is_used: false,
            line,
            kind: SymbolKind::Parameter,
        }
    }

    pub fn function(name: String, signature: FunctionSignature, line: u32) -> Self {
        Symbol {
            name,
            ty: signature.return_type,
            is_const: true,
            is_initialized: true,
            is_used: false,
            line,
            kind: SymbolKind::Function(signature),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    pub fn signature(&self) -> Option<&FunctionSignature> {
        match &self.kind {
            SymbolKind::Function(signature) => Some(signature),
            _ => None,
        }
    }
}

/// A lexical region: its bindings plus a link to the enclosing scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pub label: String,
    pub parent: Option<ScopeId>,
    pub depth: usize,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn new(label: impl Into<String>, parent: Option<ScopeId>, depth: usize) -> Self {
        Scope {
            label: label.into(),
            parent,
            depth,
            symbols: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Binds `symbol` here, refusing to replace an existing binding.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), SymbolError> {
        if let Some(existing) = self.symbols.get(&symbol.name) {
            let conflicts =
                existing.ty != symbol.ty || existing.is_function() != symbol.is_function();

            return Err(if conflicts {
                SymbolError::TypeConflict {
                    name: symbol.name,
                    line: symbol.line,
                    scope: self.label.clone(),
                    existing: existing.ty,
                    attempted: symbol.ty,
                }
            } else {
                SymbolError::DuplicateDeclaration {
                    name: symbol.name,
                    line: symbol.line,
                    scope: self.label.clone(),
                }
            });
        }

        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("{name:?} is already declared in {scope} (line {line})")]
    DuplicateDeclaration { name: String, line: u32, scope: String },
    #[error("{name:?} redeclared in {scope} as {attempted}, previously {existing} (line {line})")]
    TypeConflict {
        name: String,
        line: u32,
        scope: String,
        existing: Type,
        attempted: Type,
    },
}

impl SymbolError {
    pub fn line(&self) -> u32 {
        match self {
            SymbolError::DuplicateDeclaration { line, .. } => *line,
            SymbolError::TypeConflict { line, .. } => *line,
        }
    }

    /// The diagnostic reported for this failure, located at the redeclaration.
    pub fn into_error(self, file: Rc<String>) -> CompileError {
        let position = Position(self.line(), file);

        let error_impl = match self {
            SymbolError::DuplicateDeclaration { name, scope, .. } => {
                ErrorImpl::DuplicateDeclaration { name, scope }
            }
            SymbolError::TypeConflict {
                name,
                scope,
                existing,
                attempted,
                ..
            } => ErrorImpl::TypeConflict {
                name,
                existing: existing.to_string(),
                attempted: attempted.to_string(),
                scope,
            },
        };

        CompileError::new(error_impl, position)
    }
}

/// Scopes live in one arena; `current` walks up and down it as the checker
/// enters and leaves blocks. Scope 0 is the global scope.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    pub const GLOBAL: ScopeId = 0;

    pub fn new(mut global: Scope) -> Self {
        global.parent = None;
        global.depth = 0;

        SymbolTable {
            scopes: vec![global],
            current: Self::GLOBAL,
        }
    }

    pub fn enter_scope(&mut self, label: impl Into<String>) -> ScopeId {
        let depth = self.scopes[self.current].depth + 1;
        let scope = Scope::new(label, Some(self.current), depth);
        debug!(scope = %scope.label, depth, "entering scope");

        self.scopes.push(scope);
        self.current = self.scopes.len() - 1;
        self.current
    }

    /// Returns to the enclosing scope. The global scope is never left.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            debug!(scope = %self.scopes[self.current].label, "leaving scope");
            self.current = parent;
        }
    }

    pub fn current_id(&self) -> ScopeId {
        self.current
    }

    pub fn current_scope(&self) -> &Scope {
        &self.scopes[self.current]
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn define(&mut self, symbol: Symbol) -> Result<(), SymbolError> {
        self.scopes[self.current].insert(symbol)
    }

    /// Nearest binding of `name`, searching from the current scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let id = self.resolve(name)?;
        self.scopes[id].get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let id = self.resolve(name)?;
        self.scopes[id].get_mut(name)
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current].get(name)
    }

    pub fn define_function(&mut self, symbol: Symbol) -> Result<(), SymbolError> {
        debug!(function = %symbol.name, "registering function");
        self.scopes[Self::GLOBAL].insert(symbol)
    }

    /// Functions are only ever looked up in the global scope, so a local
    /// variable never hides a callable function.
    pub fn lookup_function(&self, name: &str) -> Option<&Symbol> {
        self.scopes[Self::GLOBAL]
            .get(name)
            .filter(|symbol| symbol.is_function())
    }

    pub fn lookup_function_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes[Self::GLOBAL]
            .get_mut(name)
            .filter(|symbol| symbol.is_function())
    }

    fn resolve(&self, name: &str) -> Option<ScopeId> {
        let mut id = Some(self.current);

        while let Some(scope_id) = id {
            let scope = &self.scopes[scope_id];
            if scope.contains(name) {
                return Some(scope_id);
            }
            id = scope.parent;
        }

        None
    }
}
