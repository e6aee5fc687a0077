use crate::ast::{ast::FunctionKind, types::Type};

use super::symbol_table::{FunctionSignature, Scope, Symbol};

/// Functions every plugin can call without declaring them.
fn builtin_functions() -> Vec<(&'static str, Vec<(&'static str, Type)>, Type)> {
    vec![("print", vec![("value", Type::auto())], Type::void())]
}

/// A fresh global scope holding the built-in functions. Handed to
/// [`super::symbol_table::SymbolTable::new`] before any user declaration is seen.
pub fn global_scope() -> Scope {
    let mut scope = Scope::new("global scope", None, 0);

    for (name, params, return_type) in builtin_functions() {
        let signature = FunctionSignature {
            params: params
                .into_iter()
                .map(|(param, ty)| (String::from(param), ty))
                .collect(),
            return_type,
            kind: FunctionKind::Normal,
            is_builtin: true,
        };

        // Built-in names are distinct, so this cannot collide
        let _ = scope.insert(Symbol::function(String::from(name), signature, 0));
    }

    scope
}
