//! Unit tests for the symbol table, the type system and the checker.

use std::rc::Rc;

use crate::{
    ast::{
        ast::{FunctionKind, Program},
        expressions::{BinaryOperator, Expr, ExprKind, UnaryOperator},
        statements::StmtKind,
        types::{BaseType, Type},
    },
    errors::diagnostics::{Diagnostics, Severity},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::{
    builtins::global_scope,
    symbol_table::{FunctionSignature, Symbol, SymbolError, SymbolTable},
    type_checker::{type_check, TypeChecker},
    type_system::{binary_result, evaluate, increment_result, is_compatible, unary_result, Value},
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.rwlz".to_string())).unwrap();
    match parse(tokens, Rc::new("test.rwlz".to_string())) {
        Ok(program) => program,
        Err(errors) => panic!("expected a program, got {:?}", errors),
    }
}

fn check(source: &str) -> (Program, Diagnostics) {
    let mut program = parse_source(source);
    let (_, diagnostics) = type_check(&mut program);
    (program, diagnostics)
}

/// Checks `statements` as the body of `void main()`.
fn check_body(statements: &str) -> Diagnostics {
    check(&format!("void main() {{\n{}\n}}", statements)).1
}

fn error_names(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .errors()
        .map(|diagnostic| diagnostic.error().get_error_name().to_string())
        .collect()
}

fn warning_names(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .warnings()
        .map(|diagnostic| diagnostic.error().get_error_name().to_string())
        .collect()
}

/// The initializer of the first statement of `void main()`, after checking.
fn checked_initializer(statement: &str) -> Expr {
    let (program, _) = check(&format!("void main() {{ {} }}", statement));
    match &program.functions[0].body.statements[0].kind {
        StmtKind::VarDecl(decl) => decl.value.clone().unwrap(),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

fn literal_expr(source: &str) -> Expr {
    let program = parse_source(&format!("void main() {{ auto value = {}; }}", source));
    match &program.functions[0].body.statements[0].kind {
        StmtKind::VarDecl(decl) => decl.value.clone().unwrap(),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

//--------------------------------------------------------------------------------------------------
// Symbol table
//--------------------------------------------------------------------------------------------------

fn variable(name: &str, ty: Type, line: u32) -> Symbol {
    Symbol::variable(name.to_string(), ty, false, true, line)
}

#[test]
fn test_symbol_table_lookup_walks_outward() {
    let mut table = SymbolTable::new(global_scope());
    table.enter_scope("function main");
    table.define(variable("x", Type::int(), 1)).unwrap();

    table.enter_scope("block");
    table.define(variable("x", Type::string(), 2)).unwrap();
    assert_eq!(table.lookup("x").unwrap().ty, Type::string());
    assert!(table.lookup_current("x").is_some());

    table.exit_scope();
    assert_eq!(table.lookup("x").unwrap().ty, Type::int());
    assert!(table.lookup("y").is_none());
}

#[test]
fn test_symbol_table_redefinition_results() {
    let mut table = SymbolTable::new(global_scope());
    table.enter_scope("block");
    table.define(variable("x", Type::int(), 1)).unwrap();

    match table.define(variable("x", Type::int(), 2)) {
        Err(SymbolError::DuplicateDeclaration { name, line, scope }) => {
            assert_eq!(name, "x");
            assert_eq!(line, 2);
            assert_eq!(scope, "block");
        }
        other => panic!("expected a duplicate declaration, got {:?}", other),
    }

    match table.define(variable("x", Type::float(), 3)) {
        Err(SymbolError::TypeConflict {
            existing, attempted, ..
        }) => {
            assert_eq!(existing, Type::int());
            assert_eq!(attempted, Type::float());
        }
        other => panic!("expected a type conflict, got {:?}", other),
    }
}

#[test]
fn test_symbol_table_never_leaves_global_scope() {
    let mut table = SymbolTable::new(global_scope());
    table.exit_scope();
    table.exit_scope();

    assert_eq!(table.current_id(), SymbolTable::GLOBAL);
    assert_eq!(table.current_scope().depth, 0);
}

#[test]
fn test_functions_resolve_from_global_scope_only() {
    let mut table = SymbolTable::new(global_scope());
    let signature = FunctionSignature {
        params: vec![],
        return_type: Type::int(),
        kind: FunctionKind::Hook,
        is_builtin: false,
    };
    table
        .define_function(Symbol::function("tick".to_string(), signature, 4))
        .unwrap();

    table.enter_scope("function main");
    table.define(variable("tick", Type::bool(), 5)).unwrap();

    assert!(table.lookup_function("tick").is_some());
    assert!(!table.lookup("tick").unwrap().is_function());
    assert!(table.lookup_function("tock").is_none());
}

#[test]
fn test_builtins_are_preregistered() {
    let table = SymbolTable::new(global_scope());
    let print = table.lookup_function("print").unwrap();
    let signature = print.signature().unwrap();

    assert!(signature.is_builtin);
    assert_eq!(signature.params, vec![(String::from("value"), Type::auto())]);
    assert_eq!(signature.return_type, Type::void());
}

//--------------------------------------------------------------------------------------------------
// Type system
//--------------------------------------------------------------------------------------------------

#[test]
fn test_compatibility_table() {
    assert!(is_compatible(Type::float(), Type::int()));
    assert!(is_compatible(Type::int(), Type::char()));
    assert!(is_compatible(Type::float(), Type::char()));
    assert!(!is_compatible(Type::int(), Type::float()));
    assert!(!is_compatible(Type::string(), Type::char()));

    assert!(is_compatible(Type::array(BaseType::Int), Type::array(BaseType::Int)));
    assert!(!is_compatible(Type::array(BaseType::Float), Type::array(BaseType::Int)));

    assert!(is_compatible(Type::int(), Type::error()));
    assert!(is_compatible(Type::error(), Type::string()));
    assert!(is_compatible(Type::bool(), Type::auto()));

    // const never changes type identity
    assert!(is_compatible(Type::int().with_const(true), Type::int()));
}

#[test]
fn test_binary_operator_table() {
    assert_eq!(
        binary_result(BinaryOperator::Add, Type::int(), Type::float()),
        Some(Type::float())
    );
    assert_eq!(
        binary_result(BinaryOperator::Modulo, Type::int(), Type::int()),
        Some(Type::int())
    );
    assert_eq!(
        binary_result(BinaryOperator::Add, Type::string(), Type::string()),
        Some(Type::string())
    );
    assert_eq!(binary_result(BinaryOperator::Subtract, Type::string(), Type::string()), None);
    assert_eq!(binary_result(BinaryOperator::Add, Type::int(), Type::bool()), None);

    assert_eq!(
        binary_result(BinaryOperator::Less, Type::char(), Type::char()),
        Some(Type::bool())
    );
    assert_eq!(binary_result(BinaryOperator::Less, Type::bool(), Type::bool()), None);
    assert_eq!(
        binary_result(BinaryOperator::Equals, Type::bool(), Type::bool()),
        Some(Type::bool())
    );
    assert_eq!(binary_result(BinaryOperator::Equals, Type::string(), Type::int()), None);
    assert_eq!(binary_result(BinaryOperator::And, Type::bool(), Type::int()), None);
}

#[test]
fn test_error_is_absorbing_in_operator_tables() {
    assert_eq!(
        binary_result(BinaryOperator::Add, Type::error(), Type::bool()),
        Some(Type::error())
    );
    assert_eq!(
        binary_result(BinaryOperator::And, Type::string(), Type::error()),
        Some(Type::error())
    );
    assert_eq!(unary_result(UnaryOperator::Not, Type::error()), Some(Type::error()));
    assert_eq!(increment_result(Type::error()), Some(Type::error()));
}

#[test]
fn test_unary_and_increment_tables() {
    assert_eq!(unary_result(UnaryOperator::Minus, Type::float()), Some(Type::float()));
    assert_eq!(unary_result(UnaryOperator::Minus, Type::bool()), None);
    assert_eq!(unary_result(UnaryOperator::Not, Type::bool()), Some(Type::bool()));
    assert_eq!(unary_result(UnaryOperator::Complement, Type::int()), Some(Type::int()));
    assert_eq!(unary_result(UnaryOperator::Complement, Type::float()), None);

    assert_eq!(increment_result(Type::int()), Some(Type::int()));
    assert_eq!(increment_result(Type::char()), None);
    assert_eq!(increment_result(Type::array(BaseType::Int)), None);
}

#[test]
fn test_auto_operands_produce_auto_or_bool() {
    assert_eq!(
        binary_result(BinaryOperator::Multiply, Type::auto(), Type::int()),
        Some(Type::auto())
    );
    assert_eq!(
        binary_result(BinaryOperator::Less, Type::auto(), Type::string()),
        Some(Type::bool())
    );
    assert_eq!(unary_result(UnaryOperator::Not, Type::auto()), Some(Type::bool()));
}

#[test]
fn test_complement_folds_to_ones_complement() {
    assert_eq!(evaluate(&literal_expr("~5")), Some(Value::Int(-6)));
    assert_eq!(evaluate(&literal_expr("~0")), Some(Value::Int(-1)));
    assert_eq!(evaluate(&literal_expr("~5 == -6")), Some(Value::Bool(true)));
}

#[test]
fn test_char_and_string_comparisons_fold_by_ordinal() {
    assert_eq!(evaluate(&literal_expr("'A' < 'Z'")), Some(Value::Bool(true)));
    assert_eq!(evaluate(&literal_expr("\"abc\" < \"abd\"")), Some(Value::Bool(true)));
    assert_eq!(evaluate(&literal_expr("\"abd\" <= \"abc\"")), Some(Value::Bool(false)));
}

#[test]
fn test_constant_folding_arithmetic() {
    assert_eq!(evaluate(&literal_expr("2 + 3 * 4")), Some(Value::Int(14)));
    assert_eq!(evaluate(&literal_expr("1 + 0.5")), Some(Value::Float(1.5)));
    assert_eq!(
        evaluate(&literal_expr("\"liz\" + \"ard\"")),
        Some(Value::String("lizard".to_string()))
    );
    assert_eq!(evaluate(&literal_expr("10 / 0")), None);
    assert_eq!(evaluate(&literal_expr("1 + true")), None);
    assert_eq!(evaluate(&literal_expr("count + 1")), None);
}

//--------------------------------------------------------------------------------------------------
// Checker
//--------------------------------------------------------------------------------------------------

const WELL_TYPED: &str = "[BepInPlugin(\"com.lizard.mod\", \"1.0.0\", \"Lizard\")]
<base> void Awake() {
    int count = 0;
    float speed = 2.5;
    speed = speed * count;
    string name = \"lizard\" + \"man\";
    bool fast = speed > 1.0 && count < 10;
    int xs[3] = [1, 2, 3];
    xs[0] = count + 1;
    for (int i = 0; i < 3; i++) {
        if (xs[i] == 2) {
            break;
        }
    }
    while (fast) {
        fast = false;
    }
    print(name);
}

int twice(int value) {
    return value * 2;
}
";

#[test]
fn test_well_typed_program_has_no_diagnostics() {
    let (_, diagnostics) = check(WELL_TYPED);

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
}

#[test]
fn test_checking_is_idempotent() {
    let mut program = parse_source(WELL_TYPED);
    let mut type_checker = TypeChecker::new(global_scope());

    let first = type_checker.check(&mut program);
    let second = type_checker.check(&mut program);
    assert_eq!(first.len(), 0);
    assert_eq!(second.len(), 0);

    let mut broken = parse_source("int f() { return true; }\nvoid main() { x = 1; }");
    let first = error_names(&type_checker.check(&mut broken));
    let second = error_names(&type_checker.check(&mut broken));
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_every_expression_is_annotated() {
    let value = checked_initializer("float total = 1 + 2 * 3.0;");
    assert_eq!(value.ty, Some(Type::float()));

    match &value.kind {
        ExprKind::Binary { left, right, .. } => {
            assert_eq!(left.ty, Some(Type::int()));
            assert_eq!(right.ty, Some(Type::float()));
        }
        other => panic!("expected a binary expression, got {:?}", other),
    }
}

#[test]
fn test_error_type_does_not_cascade() {
    let diagnostics = check_body("int a = missing + 1;\nbool b = !missing && true;");

    assert_eq!(error_names(&diagnostics), vec!["UndefinedSymbol", "UndefinedSymbol"]);
}

#[test]
fn test_four_independent_defects_are_all_reported() {
    let (_, diagnostics) = check(
        "int broken(int a) {
    int b = undefined_var;
    int c = a + true;
    missing_fn(a);
    return \"text\";
}",
    );

    assert_eq!(
        error_names(&diagnostics),
        vec!["UndefinedSymbol", "InvalidOperator", "UndefinedSymbol", "TypeMismatch"]
    );
    let lines = diagnostics.sorted().iter().map(|diagnostic| diagnostic.line()).collect::<Vec<u32>>();
    assert_eq!(lines, vec![2, 3, 4, 5]);
}

#[test]
fn test_duplicate_declaration_same_type() {
    let diagnostics = check_body("int x = 1;\nint x = 2;");

    assert_eq!(error_names(&diagnostics), vec!["DuplicateDeclaration"]);
}

#[test]
fn test_type_conflict_names_both_types() {
    let diagnostics = check_body("int x = 1;\nfloat x = 2.0;");

    assert_eq!(error_names(&diagnostics), vec!["TypeConflict"]);
    let message = diagnostics.errors().next().unwrap().message();
    assert!(message.contains("int"), "{}", message);
    assert!(message.contains("float"), "{}", message);
}

#[test]
fn test_shadowing_resolves_nearest_binding() {
    let diagnostics = check_body(
        "int x = 1;
{
    string x = \"inner\";
    string copy = x;
}
int outer = x;",
    );

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
}

#[test]
fn test_locals_may_shadow_parameters() {
    let (_, diagnostics) = check("void f(int a) { float a = 1.0; }");
    assert!(diagnostics.is_empty());

    let (_, diagnostics) = check("void g(int a, int a) { }");
    assert_eq!(error_names(&diagnostics), vec!["DuplicateDeclaration"]);
}

#[test]
fn test_int_widens_to_float_but_not_back() {
    assert!(check_body("float f = 1;\nfloat g = 'c';").is_empty());

    let diagnostics = check_body("int i = 1.5;");
    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);
}

#[test]
fn test_break_outside_loop_reported_once() {
    let diagnostics = check_body("if (true) {\n{\nbreak;\n}\n}");
    assert_eq!(error_names(&diagnostics), vec!["BreakContinueOutsideLoop"]);

    let diagnostics = check_body("while (true) { if (false) { continue; } break; }");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_undefined_call_types_as_error() {
    let (program, diagnostics) = check("void main() { foo(1, 2); }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(error_names(&diagnostics), vec!["UndefinedSymbol"]);

    match &program.functions[0].body.statements[0].kind {
        StmtKind::Expression(call) => assert_eq!(call.ty, Some(Type::error())),
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_arity_mismatch_and_argument_types() {
    let (_, diagnostics) = check(
        "int add(int a, int b) { return a + b; }
void main() { int x = add(1); }",
    );
    assert_eq!(error_names(&diagnostics), vec!["ArityMismatch"]);

    let (_, diagnostics) = check(
        "void take(int a, bool b) { }
void main() { take(\"s\", 1); }",
    );
    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch", "TypeMismatch"]);
}

#[test]
fn test_forward_references_and_mutual_recursion() {
    let (_, diagnostics) = check(
        "bool even(int n) {
    if (n == 0) { return true; }
    return odd(n - 1);
}
bool odd(int n) {
    if (n == 0) { return false; }
    return even(n - 1);
}",
    );

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
}

#[test]
fn test_function_redefinition() {
    let (_, diagnostics) = check("void f() { }\nvoid f() { }\nint f() { return 1; }");

    assert_eq!(error_names(&diagnostics), vec!["DuplicateDeclaration", "TypeConflict"]);
}

#[test]
fn test_function_used_as_value() {
    let (_, diagnostics) = check("int f() { return 1; }\nvoid main() { int x = f; }");

    assert_eq!(error_names(&diagnostics), vec!["InvalidSymbolUse"]);
}

#[test]
fn test_const_rules() {
    let diagnostics = check_body("const int x = 1;\nx = 2;\nx++;\nconst int y;");

    assert_eq!(
        error_names(&diagnostics),
        vec!["ConstReassignment", "ConstReassignment", "ConstWithoutInitializer"]
    );
}

#[test]
fn test_conditions_must_be_bool() {
    let diagnostics = check_body("if (1) { }\nwhile (\"s\") { }\nfor (; 2.0; ) { }");

    assert_eq!(
        error_names(&diagnostics),
        vec!["ConditionNotBoolean", "ConditionNotBoolean", "ConditionNotBoolean"]
    );
}

#[test]
fn test_for_header_variable_is_scoped_to_loop() {
    let diagnostics = check_body("for (int i = 0; i < 3; i++) { }\nint j = i;");

    assert_eq!(error_names(&diagnostics), vec!["UndefinedSymbol"]);
}

#[test]
fn test_array_literal_elements_reported_individually() {
    let diagnostics = check_body("int xs[2] = [1, 2.5, true];");

    let mut names = error_names(&diagnostics);
    names.sort();
    assert_eq!(
        names,
        vec!["ArrayElementTypeMismatch", "ArrayElementTypeMismatch", "InvalidArraySize"]
    );

    let diagnostics = check_body("array int nums = [1, \"x\", 3];");
    assert_eq!(error_names(&diagnostics), vec!["ArrayElementTypeMismatch"]);
}

#[test]
fn test_array_sizes() {
    assert_eq!(error_names(&check_body("int xs[1.5];")), vec!["ArraySizeNotInteger"]);
    assert_eq!(error_names(&check_body("int xs[0];")), vec!["InvalidArraySize"]);
    assert!(check_body("int n = 4;\nint xs[n];").is_empty());
}

#[test]
fn test_indexed_access_and_stores() {
    let diagnostics = check_body("int n = 5;\nn[0] = 1;");
    assert_eq!(error_names(&diagnostics), vec!["InvalidSymbolUse"]);

    let diagnostics = check_body("int ws[3];\nws[true] = 1;\nws[0] = 1.5;\nint v = ws[\"a\"];");
    assert_eq!(
        error_names(&diagnostics),
        vec!["ArrayIndexNotInteger", "ArrayElementTypeMismatch", "ArrayIndexNotInteger"]
    );
}

#[test]
fn test_auto_declarations() {
    assert!(check_body("auto x = 5;\nint y = x;\nauto words = [\"a\", \"b\"];").is_empty());

    let diagnostics = check_body("auto z;");
    assert_eq!(error_names(&diagnostics), vec!["CannotInferType"]);
}

#[test]
fn test_compound_assignment() {
    assert!(check_body("float f = 0.0;\nf += 1;\nstring s = \"a\";\ns += \"b\";").is_empty());

    let diagnostics = check_body("string s = \"a\";\ns -= \"b\";\nint i = 0;\ni += 1.5;");
    assert_eq!(error_names(&diagnostics), vec!["InvalidOperator", "TypeMismatch"]);
}

#[test]
fn test_invalid_operators() {
    let diagnostics = check_body("bool b = true;\nb++;\nbool c = true < false;\nint d = -\"s\";");

    assert_eq!(
        error_names(&diagnostics),
        vec!["InvalidOperator", "InvalidOperator", "InvalidOperator"]
    );
}

#[test]
fn test_return_type_rules() {
    let (_, diagnostics) = check("void f() { return 1; }");
    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);

    let (_, diagnostics) = check("int g() { return; }");
    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);

    let (_, diagnostics) = check("float h() { return 1; }");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_return_is_a_structural_warning() {
    let (_, diagnostics) = check("int f(bool b) { if (b) { return 1; } }");
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(warning_names(&diagnostics), vec!["MissingReturn"]);

    let (_, diagnostics) = check("int g(bool b) { if (b) { return 1; } else { return 2; } }");
    assert!(diagnostics.is_empty());

    let (_, diagnostics) = check("int h() { while (true) { return 1; } }");
    assert_eq!(warning_names(&diagnostics), vec!["MissingReturn"]);

    let (_, diagnostics) = check("int k() { { return 1; } }");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_uninitialized_read_warns_once() {
    let diagnostics = check_body("int x;\nint y = x + 1;\nint z = x;");

    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(warning_names(&diagnostics), vec!["UninitializedVariable"]);

    assert!(check_body("int x;\nx = 3;\nint y = x;").is_empty());
}

#[test]
fn test_special_references_warn() {
    let diagnostics = check_body("float speed = 1.0;\nint x = <prop>(speed);");
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(warning_names(&diagnostics), vec!["UncheckedSpecialReference"]);

    let diagnostics = check_body("string s = <base>(1);");
    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);
    assert_eq!(diagnostics.warning_count(), 1);
}

#[test]
fn test_incomplete_metadata() {
    let (_, diagnostics) = check("[BepInPlugin(\"\", \"1.0\", \"Lizard\")]\nvoid main() { }");

    assert_eq!(error_names(&diagnostics), vec!["IncompleteMetadata"]);
    let diagnostic = diagnostics.errors().next().unwrap();
    assert_eq!(diagnostic.severity(), Severity::Error);
    assert!(diagnostic.message().contains("ID"));
}

#[test]
fn test_resolved_functions_are_marked_used() {
    let mut program = parse_source(
        "int helper() {\n    return 1;\n}\n\nvoid unused() { }\n\nvoid main() {\n    int x = helper();\n    print(x);\n}",
    );
    let (checker, diagnostics) = type_check(&mut program);

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    assert!(checker.symbols.lookup_function("helper").unwrap().is_used);
    assert!(checker.symbols.lookup_function("print").unwrap().is_used);
    assert!(!checker.symbols.lookup_function("unused").unwrap().is_used);
    assert!(!checker.symbols.lookup_function("main").unwrap().is_used);
}

#[test]
fn test_print_accepts_any_value() {
    let diagnostics = check_body("int xs[2] = [1, 2];\nprint(xs);\nprint(1.5);\nprint('c');\nprint(xs[0] > 1);");
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);

    let diagnostics = check_body("print(missing);");
    assert_eq!(error_names(&diagnostics), vec!["UndefinedSymbol"]);
}

#[test]
fn test_void_variables_are_rejected_once() {
    let diagnostics = check_body("void v;\nvoid w = 1;\nint x = v + 1;");

    assert_eq!(error_names(&diagnostics), vec!["InvalidSymbolUse", "InvalidSymbolUse"]);
    assert!(warning_names(&diagnostics).is_empty());
}
