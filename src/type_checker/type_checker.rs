use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Function, Metadata, Program},
        expressions::{Expr, ExprKind, Literal, ReferenceKind},
        statements::{ArrayDecl, AssignTarget, Assignment, Block, Stmt, StmtKind, VarDecl},
        types::{BaseType, Type},
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    Position,
};

use super::{
    builtins::global_scope,
    symbol_table::{FunctionSignature, Scope, Symbol, SymbolTable},
    type_system::{
        binary_result, evaluate, increment_result, is_compatible, is_exact_element, unary_result,
        Value,
    },
};

/// The function whose body is being checked.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    pub loop_depth: usize,
    pub function: Option<FunctionContext>,
    global: Scope,
    file: Rc<String>,
}

impl TypeChecker {
    pub fn new(global: Scope) -> Self {
        TypeChecker {
            symbols: SymbolTable::new(global.clone()),
            diagnostics: Diagnostics::new(),
            loop_depth: 0,
            function: None,
            global,
            file: Rc::new(String::from("<unknown>")),
        }
    }

    /// Checks `program`, annotating every expression with its type.
    ///
    /// State from a previous run is discarded first, so checking the same
    /// program twice reports the same diagnostics.
    pub fn check(&mut self, program: &mut Program) -> Diagnostics {
        self.symbols = SymbolTable::new(self.global.clone());
        self.diagnostics.clear();
        self.loop_depth = 0;
        self.function = None;
        self.file = Rc::clone(&program.file);

        if let Some(metadata) = &program.metadata {
            check_metadata(self, metadata);
        }

        // Pass 1: signatures, so bodies can call functions declared later
        for function in program.functions.iter() {
            register_function(self, function);
        }
        debug!(functions = program.functions.len(), "registered function signatures");

        // Pass 2: bodies
        for function in program.functions.iter_mut() {
            check_function(self, function);
        }

        debug!(
            errors = self.diagnostics.error_count(),
            warnings = self.diagnostics.warning_count(),
            "semantic analysis finished"
        );

        self.diagnostics.clone()
    }

    pub fn position(&self, line: u32) -> Position {
        Position(line, Rc::clone(&self.file))
    }

    pub fn report(&mut self, error: ErrorImpl, line: u32) {
        let error = Error::new(error, self.position(line));
        self.diagnostics.push(error);
    }
}

pub fn type_check(program: &mut Program) -> (TypeChecker, Diagnostics) {
    let mut type_checker = TypeChecker::new(global_scope());
    let diagnostics = type_checker.check(program);

    (type_checker, diagnostics)
}

fn check_metadata(type_checker: &mut TypeChecker, metadata: &Metadata) {
    let fields = [
        ("ID", &metadata.id),
        ("version", &metadata.version),
        ("name", &metadata.name),
    ];

    let missing = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect::<Vec<&str>>();

    if !missing.is_empty() {
        type_checker.report(
            ErrorImpl::IncompleteMetadata {
                missing: missing.join(", "),
            },
            metadata.line,
        );
    }
}

fn register_function(type_checker: &mut TypeChecker, function: &Function) {
    let signature = FunctionSignature {
        params: function
            .params
            .iter()
            .map(|param| (param.name.clone(), param.param_type))
            .collect(),
        return_type: function.return_type,
        kind: function.kind,
        is_builtin: false,
    };

    let symbol = Symbol::function(function.name.clone(), signature, function.line);
    if let Err(error) = type_checker.symbols.define_function(symbol) {
        let file = Rc::clone(&type_checker.file);
        type_checker.diagnostics.push(error.into_error(file));
    }
}

fn check_function(type_checker: &mut TypeChecker, function: &mut Function) {
    trace!(function = %function.name, kind = %function.kind, "checking function body");

    type_checker.function = Some(FunctionContext {
        name: function.name.clone(),
        return_type: function.return_type,
    });
    type_checker.loop_depth = 0;
    type_checker
        .symbols
        .enter_scope(format!("function {}", function.name));

    for param in function.params.iter() {
        let symbol = Symbol::parameter(param.name.clone(), param.param_type, param.is_const, param.line);
        if let Err(error) = type_checker.symbols.define(symbol) {
            let file = Rc::clone(&type_checker.file);
            type_checker.diagnostics.push(error.into_error(file));
        }
    }

    // The body gets its own scope, so locals may shadow parameters
    check_block(type_checker, &mut function.body);

    if !function.return_type.is_void() && !block_returns(&function.body) {
        type_checker.report(
            ErrorImpl::MissingReturn {
                function: function.name.clone(),
                return_type: function.return_type.to_string(),
            },
            function.line,
        );
    }

    type_checker.symbols.exit_scope();
    type_checker.function = None;
}

//--------------------------------------------------------------------------------------------------
// Return analysis
//--------------------------------------------------------------------------------------------------

/// Whether `block` ends in a statement that always returns. Loops are never
/// assumed to run, so a `return` inside one does not count.
pub fn block_returns(block: &Block) -> bool {
    block.statements.last().is_some_and(stmt_returns)
}

fn stmt_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::Block(block) => block_returns(block),
        StmtKind::If {
            then_block,
            else_block: Some(else_block),
            ..
        } => block_returns(then_block) && block_returns(else_block),
        _ => false,
    }
}

//--------------------------------------------------------------------------------------------------
// Statements
//--------------------------------------------------------------------------------------------------

pub fn check_block(type_checker: &mut TypeChecker, block: &mut Block) {
    type_checker.symbols.enter_scope("block");

    for stmt in block.statements.iter_mut() {
        check_stmt(type_checker, stmt);
    }

    type_checker.symbols.exit_scope();
}

pub fn check_stmt(type_checker: &mut TypeChecker, stmt: &mut Stmt) {
    let line = stmt.line;

    match &mut stmt.kind {
        StmtKind::VarDecl(decl) => check_var_decl(type_checker, decl, line),
        StmtKind::ArrayDecl(decl) => check_array_decl(type_checker, decl, line),
        StmtKind::Assignment(assignment) => check_assignment(type_checker, assignment, line),
        StmtKind::If {
            condition,
            then_block,
            else_block,
        } => {
            check_condition(type_checker, condition, "if");
            check_block(type_checker, then_block);

            if let Some(else_block) = else_block {
                check_block(type_checker, else_block);
            }
        }
        StmtKind::While { condition, body } => {
            check_condition(type_checker, condition, "while");

            type_checker.loop_depth += 1;
            check_block(type_checker, body);
            type_checker.loop_depth -= 1;
        }
        StmtKind::For {
            init,
            condition,
            update,
            body,
        } => {
            // The header variable is visible to the condition, update and body
            type_checker.symbols.enter_scope("for");

            if let Some(init) = init {
                check_stmt(type_checker, init);
            }
            if let Some(condition) = condition {
                check_condition(type_checker, condition, "for");
            }
            if let Some(update) = update {
                check_stmt(type_checker, update);
            }

            type_checker.loop_depth += 1;
            check_block(type_checker, body);
            type_checker.loop_depth -= 1;

            type_checker.symbols.exit_scope();
        }
        StmtKind::Break => check_loop_control(type_checker, "break", line),
        StmtKind::Continue => check_loop_control(type_checker, "continue", line),
        StmtKind::Return(value) => check_return(type_checker, value.as_mut(), line),
        StmtKind::Print(value) => check_print(type_checker, value, line),
        StmtKind::Block(block) => check_block(type_checker, block),
        StmtKind::Expression(expr) => {
            check_expr(type_checker, expr);
        }
    }
}

/// `print(..)` is a statement, but its argument is checked against the
/// built-in `print` signature like any call.
fn check_print(type_checker: &mut TypeChecker, value: &mut Expr, line: u32) {
    let value_type = check_expr(type_checker, value);

    let expected = match type_checker.symbols.lookup_function_mut("print") {
        Some(symbol) => {
            symbol.is_used = true;
            symbol.signature().and_then(|signature| signature.params.first().map(|(_, ty)| *ty))
        }
        None => None,
    };

    if let Some(expected) = expected {
        if !is_compatible(expected, value_type) {
            type_checker.report(
                ErrorImpl::TypeMismatch {
                    expected: expected.to_string(),
                    received: value_type.to_string(),
                    context: String::from("argument 1 of \"print\""),
                },
                line,
            );
        }
    }
}

fn check_loop_control(type_checker: &mut TypeChecker, statement: &str, line: u32) {
    if type_checker.loop_depth == 0 {
        type_checker.report(
            ErrorImpl::BreakContinueOutsideLoop {
                statement: String::from(statement),
            },
            line,
        );
    }
}

fn check_condition(type_checker: &mut TypeChecker, condition: &mut Expr, statement: &str) {
    let ty = check_expr(type_checker, condition);

    if !ty.is_error() && !ty.is_auto() && !ty.is_scalar(BaseType::Bool) {
        type_checker.report(
            ErrorImpl::ConditionNotBoolean {
                statement: String::from(statement),
                received: ty.to_string(),
            },
            condition.line,
        );
    }
}

fn is_index_type(ty: Type) -> bool {
    ty.is_error() || ty.is_auto() || ty.is_scalar(BaseType::Int)
}

/// Checks each element of an array literal against `expected`, reporting
/// every mismatching element on its own.
fn check_array_elements(
    type_checker: &mut TypeChecker,
    elements: &mut [Expr],
    expected: Type,
    first_index: usize,
) {
    for (offset, element) in elements.iter_mut().enumerate() {
        let received = check_expr(type_checker, element);

        if !is_exact_element(expected, received) {
            type_checker.report(
                ErrorImpl::ArrayElementTypeMismatch {
                    element: format!("array element {}", first_index + offset),
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                element.line,
            );
        }
    }
}

fn check_var_decl(type_checker: &mut TypeChecker, decl: &mut VarDecl, line: u32) {
    let declared = decl.var_type;
    let mut resolved = declared;

    if declared.base == BaseType::Void {
        if let Some(value) = decl.value.as_mut() {
            check_expr(type_checker, value);
        }
        type_checker.report(
            ErrorImpl::InvalidSymbolUse {
                name: decl.name.clone(),
                message: format!("{} cannot be declared void", decl.name),
            },
            line,
        );

        let symbol = Symbol::variable(decl.name.clone(), Type::error(), decl.is_const, true, line);
        if let Err(error) = type_checker.symbols.define(symbol) {
            let file = Rc::clone(&type_checker.file);
            type_checker.diagnostics.push(error.into_error(file));
        }
        return;
    }

    let value_type = match decl.value.as_mut() {
        // An array literal takes the declared element type instead of its own
        Some(value) if declared.is_array && !declared.is_auto() => {
            if let ExprKind::ArrayLiteral(elements) = &mut value.kind {
                check_array_elements(type_checker, elements, declared.element().with_const(false), 0);
                value.ty = Some(declared.with_const(false));
                Some(declared)
            } else {
                Some(check_expr(type_checker, value))
            }
        }
        Some(value) => Some(check_expr(type_checker, value)),
        None => None,
    };

    match value_type {
        Some(value_type) if declared.is_auto() && !declared.is_array => {
            resolved = value_type;
        }
        Some(value_type) => {
            if !is_compatible(declared, value_type) {
                type_checker.report(
                    ErrorImpl::TypeMismatch {
                        expected: declared.to_string(),
                        received: value_type.to_string(),
                        context: format!("declaration of {:?}", decl.name),
                    },
                    line,
                );
            }
        }
        None if declared.is_auto() => {
            type_checker.report(
                ErrorImpl::CannotInferType {
                    name: decl.name.clone(),
                },
                line,
            );
            resolved = Type::error();
        }
        None => {}
    }

    if decl.is_const && decl.value.is_none() {
        type_checker.report(
            ErrorImpl::ConstWithoutInitializer {
                name: decl.name.clone(),
            },
            line,
        );
    }

    let symbol = Symbol::variable(
        decl.name.clone(),
        resolved,
        decl.is_const,
        decl.value.is_some(),
        line,
    );
    if let Err(error) = type_checker.symbols.define(symbol) {
        let file = Rc::clone(&type_checker.file);
        type_checker.diagnostics.push(error.into_error(file));
    }
}

fn check_array_decl(type_checker: &mut TypeChecker, decl: &mut ArrayDecl, line: u32) {
    let element_type = decl.element_type.element().with_const(false);

    if let Some(size) = decl.size.as_mut() {
        let size_type = check_expr(type_checker, size);

        if !is_index_type(size_type) {
            type_checker.report(
                ErrorImpl::ArraySizeNotInteger {
                    name: decl.name.clone(),
                    received: size_type.to_string(),
                },
                line,
            );
        } else if let Some(Value::Int(size)) = evaluate(size) {
            let count = decl.values.as_ref().map_or(0, Vec::len);

            let message = if size <= 0 {
                Some(format!("the size must be positive, found {}", size))
            } else if count as i64 > size {
                Some(format!("{} initial values do not fit in {} elements", count, size))
            } else {
                None
            };

            if let Some(message) = message {
                type_checker.report(
                    ErrorImpl::InvalidArraySize {
                        name: decl.name.clone(),
                        message,
                    },
                    line,
                );
            }
        }
    }

    if let Some(values) = decl.values.as_mut() {
        check_array_elements(type_checker, values, element_type, 0);
    }

    if decl.is_const && decl.values.is_none() {
        type_checker.report(
            ErrorImpl::ConstWithoutInitializer {
                name: decl.name.clone(),
            },
            line,
        );
    }

    // A sized array owns storage from the start
    let symbol = Symbol::variable(
        decl.name.clone(),
        element_type.as_array(),
        decl.is_const,
        true,
        line,
    );
    if let Err(error) = type_checker.symbols.define(symbol) {
        let file = Rc::clone(&type_checker.file);
        type_checker.diagnostics.push(error.into_error(file));
    }
}

fn check_assignment(type_checker: &mut TypeChecker, assignment: &mut Assignment, line: u32) {
    let name = String::from(assignment.target.name());

    let index_type = match &mut assignment.target {
        AssignTarget::Index { index, .. } => Some(check_expr(type_checker, index)),
        AssignTarget::Variable(_) => None,
    };
    let value_type = check_expr(type_checker, &mut assignment.value);

    let symbol = match type_checker.symbols.lookup(&name) {
        Some(symbol) => symbol.clone(),
        None => {
            type_checker.report(ErrorImpl::UndefinedSymbol { name }, line);
            return;
        }
    };

    if symbol.is_function() {
        type_checker.report(
            ErrorImpl::InvalidSymbolUse {
                name,
                message: String::from("functions cannot be assigned to"),
            },
            line,
        );
        return;
    }

    if symbol.is_const {
        type_checker.report(ErrorImpl::ConstReassignment { name }, line);
        return;
    }

    let target_type = match index_type {
        None => symbol.ty.with_const(false),
        Some(index_type) => {
            if !symbol.ty.is_array && !symbol.ty.is_error() && !symbol.ty.is_auto() {
                type_checker.report(
                    ErrorImpl::InvalidSymbolUse {
                        message: format!("{} is not an array", name),
                        name,
                    },
                    line,
                );
                return;
            }

            if !is_index_type(index_type) {
                type_checker.report(
                    ErrorImpl::ArrayIndexNotInteger {
                        name: name.clone(),
                        received: index_type.to_string(),
                    },
                    line,
                );
            }

            symbol.ty.element().with_const(false)
        }
    };

    match assignment.operator.binary() {
        Some(operator) => match binary_result(operator, target_type, value_type) {
            None => type_checker.report(
                ErrorImpl::InvalidOperator {
                    operator: assignment.operator.to_string(),
                    operands: format!("{} and {}", target_type, value_type),
                },
                line,
            ),
            Some(result) if !is_compatible(target_type, result) => type_checker.report(
                ErrorImpl::TypeMismatch {
                    expected: target_type.to_string(),
                    received: result.to_string(),
                    context: format!("assignment to {:?}", name),
                },
                line,
            ),
            Some(_) => {}
        },
        None if matches!(assignment.target, AssignTarget::Index { .. }) => {
            if !is_exact_element(target_type, value_type) {
                type_checker.report(
                    ErrorImpl::ArrayElementTypeMismatch {
                        element: format!("element of {:?}", name),
                        expected: target_type.to_string(),
                        received: value_type.to_string(),
                    },
                    line,
                );
            }
        }
        None => {
            if !is_compatible(target_type, value_type) {
                type_checker.report(
                    ErrorImpl::TypeMismatch {
                        expected: target_type.to_string(),
                        received: value_type.to_string(),
                        context: format!("assignment to {:?}", name),
                    },
                    line,
                );
            }
        }
    }

    if let Some(symbol) = type_checker.symbols.lookup_mut(&name) {
        symbol.is_initialized = true;
    }
}

fn check_return(type_checker: &mut TypeChecker, value: Option<&mut Expr>, line: u32) {
    let value_type = value.map(|value| check_expr(type_checker, value));

    let function = match type_checker.function.clone() {
        Some(function) => function,
        None => return,
    };

    let context = format!("return from {:?}", function.name);
    let expected = function.return_type;

    let received = match value_type {
        Some(received) if expected.is_void() => received,
        Some(received) if !is_compatible(expected, received) => received,
        None if !expected.is_void() => Type::void(),
        _ => return,
    };

    type_checker.report(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: received.to_string(),
            context,
        },
        line,
    );
}

//--------------------------------------------------------------------------------------------------
// Expressions
//--------------------------------------------------------------------------------------------------

fn literal_type(literal: &Literal) -> Type {
    match literal {
        Literal::Int(_) => Type::int(),
        Literal::Float(_) => Type::float(),
        Literal::Bool(_) => Type::bool(),
        Literal::Char(_) => Type::char(),
        Literal::String(_) => Type::string(),
    }
}

/// Resolves the type of `expr`, records it on the node and returns it.
/// Failures are reported once and typed as `Error`.
pub fn check_expr(type_checker: &mut TypeChecker, expr: &mut Expr) -> Type {
    let line = expr.line;

    let ty = match &mut expr.kind {
        ExprKind::Literal(literal) => literal_type(literal),
        ExprKind::Variable(name) => check_variable(type_checker, name, line),
        ExprKind::ArrayAccess { name, index } => {
            let index_type = check_expr(type_checker, index);
            check_array_access(type_checker, name, index_type, line)
        }
        ExprKind::ArrayLiteral(elements) => match elements.split_first_mut() {
            None => Type::array(BaseType::Auto),
            Some((first, rest)) => {
                let expected = check_expr(type_checker, first);
                check_array_elements(type_checker, rest, expected, 1);

                if expected.is_array {
                    type_checker.report(
                        ErrorImpl::InvalidSymbolUse {
                            name: String::from("array literal"),
                            message: String::from("arrays cannot contain arrays"),
                        },
                        line,
                    );
                    Type::error()
                } else {
                    expected.with_const(false).as_array()
                }
            }
        },
        ExprKind::Call { callee, arguments } => {
            let argument_types = arguments
                .iter_mut()
                .map(|argument| check_expr(type_checker, argument))
                .collect::<Vec<Type>>();

            check_call(type_checker, callee, &argument_types, line)
        }
        ExprKind::Binary {
            operator,
            left,
            right,
        } => {
            let left_type = check_expr(type_checker, left);
            let right_type = check_expr(type_checker, right);

            match binary_result(*operator, left_type, right_type) {
                Some(ty) => ty,
                None => {
                    type_checker.report(
                        ErrorImpl::InvalidOperator {
                            operator: operator.to_string(),
                            operands: format!("{} and {}", left_type, right_type),
                        },
                        line,
                    );
                    Type::error()
                }
            }
        }
        ExprKind::Unary { operator, operand } => {
            let operand_type = check_expr(type_checker, operand);

            match unary_result(*operator, operand_type) {
                Some(ty) => ty,
                None => {
                    type_checker.report(
                        ErrorImpl::InvalidOperator {
                            operator: operator.to_string(),
                            operands: operand_type.to_string(),
                        },
                        line,
                    );
                    Type::error()
                }
            }
        }
        ExprKind::IncrementDecrement {
            operator, target, ..
        } => {
            let operator = operator.to_string();
            check_increment(type_checker, target, operator, line)
        }
        ExprKind::SpecialReference { kind, inner } => {
            let inner_type = check_expr(type_checker, inner);

            type_checker.report(
                ErrorImpl::UncheckedSpecialReference {
                    reference: kind.to_string(),
                },
                line,
            );

            match kind {
                ReferenceKind::Prop => Type::auto(),
                _ => inner_type,
            }
        }
    };

    expr.ty = Some(ty);
    ty
}

fn check_variable(type_checker: &mut TypeChecker, name: &str, line: u32) -> Type {
    let symbol = match type_checker.symbols.lookup_mut(name) {
        Some(symbol) => symbol,
        None => {
            type_checker.report(
                ErrorImpl::UndefinedSymbol {
                    name: String::from(name),
                },
                line,
            );
            return Type::error();
        }
    };

    if symbol.is_function() {
        type_checker.report(
            ErrorImpl::InvalidSymbolUse {
                name: String::from(name),
                message: format!("{} is a function, call it with `{}(..)`", name, name),
            },
            line,
        );
        return Type::error();
    }

    symbol.is_used = true;
    let ty = symbol.ty.with_const(false);

    // Warn once per symbol, not on every read
    if !symbol.is_initialized {
        symbol.is_initialized = true;
        type_checker.report(
            ErrorImpl::UninitializedVariable {
                name: String::from(name),
            },
            line,
        );
    }

    ty
}

fn check_array_access(type_checker: &mut TypeChecker, name: &str, index_type: Type, line: u32) -> Type {
    let symbol = match type_checker.symbols.lookup_mut(name) {
        Some(symbol) => symbol,
        None => {
            type_checker.report(
                ErrorImpl::UndefinedSymbol {
                    name: String::from(name),
                },
                line,
            );
            return Type::error();
        }
    };

    symbol.is_used = true;
    let symbol_type = symbol.ty;
    let is_function = symbol.is_function();

    if symbol_type.is_error() || symbol_type.is_auto() {
        return symbol_type.with_const(false);
    }

    if is_function || !symbol_type.is_array {
        type_checker.report(
            ErrorImpl::InvalidSymbolUse {
                name: String::from(name),
                message: format!("{} is not an array", name),
            },
            line,
        );
        return Type::error();
    }

    if !is_index_type(index_type) {
        type_checker.report(
            ErrorImpl::ArrayIndexNotInteger {
                name: String::from(name),
                received: index_type.to_string(),
            },
            line,
        );
    }

    symbol_type.element().with_const(false)
}

fn check_call(type_checker: &mut TypeChecker, callee: &str, argument_types: &[Type], line: u32) -> Type {
    let signature = match type_checker.symbols.lookup_function_mut(callee) {
        Some(symbol) => {
            symbol.is_used = true;
            symbol.signature().cloned()
        }
        None => None,
    };

    let signature = match signature {
        Some(signature) => signature,
        None => {
            let error = if type_checker.symbols.lookup(callee).is_some() {
                ErrorImpl::InvalidSymbolUse {
                    name: String::from(callee),
                    message: format!("{} is not a function", callee),
                }
            } else {
                ErrorImpl::UndefinedSymbol {
                    name: String::from(callee),
                }
            };

            type_checker.report(error, line);
            return Type::error();
        }
    };

    let arity_matches = signature.params.len() == argument_types.len();
    if !arity_matches {
        type_checker.report(
            ErrorImpl::ArityMismatch {
                function: String::from(callee),
                expected: signature.params.len(),
                received: argument_types.len(),
            },
            line,
        );
    }

    // Arguments past the parameter list have nothing to be checked against
    for (position, ((_, expected), received)) in
        signature.params.iter().zip(argument_types).enumerate()
    {
        if !is_compatible(*expected, *received) {
            type_checker.report(
                ErrorImpl::TypeMismatch {
                    expected: expected.to_string(),
                    received: received.to_string(),
                    context: format!("argument {} of {:?}", position + 1, callee),
                },
                line,
            );
        }
    }

    if arity_matches {
        signature.return_type.with_const(false)
    } else {
        Type::error()
    }
}

fn check_increment(type_checker: &mut TypeChecker, target: &str, operator: String, line: u32) -> Type {
    let symbol = match type_checker.symbols.lookup_mut(target) {
        Some(symbol) => symbol,
        None => {
            type_checker.report(
                ErrorImpl::UndefinedSymbol {
                    name: String::from(target),
                },
                line,
            );
            return Type::error();
        }
    };

    symbol.is_used = true;
    let ty = symbol.ty;
    let is_const = symbol.is_const;
    let is_function = symbol.is_function();
    let was_initialized = symbol.is_initialized;
    symbol.is_initialized = true;

    if is_function {
        type_checker.report(
            ErrorImpl::InvalidSymbolUse {
                name: String::from(target),
                message: format!("{} is a function and cannot be modified", target),
            },
            line,
        );
        return Type::error();
    }

    if is_const {
        type_checker.report(
            ErrorImpl::ConstReassignment {
                name: String::from(target),
            },
            line,
        );
        return ty.with_const(false);
    }

    if !was_initialized {
        type_checker.report(
            ErrorImpl::UninitializedVariable {
                name: String::from(target),
            },
            line,
        );
    }

    match increment_result(ty) {
        Some(result) => result,
        None => {
            type_checker.report(
                ErrorImpl::InvalidOperator {
                    operator,
                    operands: ty.to_string(),
                },
                line,
            );
            Type::error()
        }
    }
}
