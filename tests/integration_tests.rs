//! Integration tests for the whole front end.
//!
//! These tests run source text through tokenization, parsing and semantic
//! analysis and check the diagnostics and the annotated tree that come out.

use std::rc::Rc;

use rwlz::{
    ast::{
        ast::{FunctionKind, Program},
        expressions::{Expr, ExprKind},
        statements::{AssignTarget, Block, Stmt, StmtKind},
        types::Type,
    },
    errors::{diagnostics::Diagnostics, errors::Error},
    lexer::lexer::tokenize,
    parser::parser::{parse, parse_with, RecoveryMode},
    render_diagnostic,
    type_checker::type_checker::type_check,
};

fn front_end(source: &str) -> Result<(Program, Diagnostics), Vec<Error>> {
    let tokens = tokenize(source.to_string(), Some("plugin.rwlz".to_string())).map_err(|error| vec![error])?;
    let mut program = parse(tokens, Rc::new("plugin.rwlz".to_string()))?;
    let (_, diagnostics) = type_check(&mut program);

    Ok((program, diagnostics))
}

fn diagnostics_of(source: &str) -> Diagnostics {
    match front_end(source) {
        Ok((_, diagnostics)) => diagnostics,
        Err(errors) => panic!("expected the source to parse, got {:?}", errors),
    }
}

const PLUGIN: &str = "[BepInPlugin(\"com.lizard.tweaks\", \"1.4.2\", \"Lizard Tweaks\")]

<base> void Awake() {
    print(\"loaded\");
}

<breed> float Speed(float base_speed, int level) {
    float bonus = level * 0.25;
    return base_speed + bonus;
}

<hook> bool OnBite(int damage, const bool critical) {
    int total = damage;
    if (critical) {
        total *= 2;
    } else if (total > 100) {
        total = 100;
    }
    return total > 0;
}

int sum(array int values, int count) {
    int total = 0;
    for (int i = 0; i < count; i++) {
        total += values[i];
    }
    return total;
}

void Update() {
    int scores[4] = [3, 1, 4, 1];
    int best = sum(scores, 4);
    char grade = 'A';
    bool passed = grade < 'C' && best >= 5;
    while (passed) {
        best--;
        if (best < 0) {
            break;
        }
    }
    float speed = Speed(1.5, best);
}
";

#[test]
fn test_plugin_checks_cleanly() {
    let (program, diagnostics) = front_end(PLUGIN).unwrap();

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);

    let kinds: Vec<FunctionKind> = program.functions.iter().map(|function| function.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FunctionKind::Base,
            FunctionKind::Breed,
            FunctionKind::Hook,
            FunctionKind::Normal,
            FunctionKind::Normal
        ]
    );
}

fn assert_expr_typed(expr: &Expr) {
    assert!(expr.ty.is_some(), "expression on line {} was not annotated: {:?}", expr.line, expr);

    match &expr.kind {
        ExprKind::Binary { left, right, .. } => {
            assert_expr_typed(left);
            assert_expr_typed(right);
        }
        ExprKind::Unary { operand, .. } => assert_expr_typed(operand),
        ExprKind::ArrayAccess { index, .. } => assert_expr_typed(index),
        ExprKind::ArrayLiteral(elements) => elements.iter().for_each(assert_expr_typed),
        ExprKind::Call { arguments, .. } => arguments.iter().for_each(assert_expr_typed),
        ExprKind::SpecialReference { inner, .. } => assert_expr_typed(inner),
        ExprKind::IncrementDecrement { .. } | ExprKind::Literal(_) | ExprKind::Variable(_) => {}
    }
}

fn assert_block_typed(block: &Block) {
    block.statements.iter().for_each(assert_stmt_typed);
}

fn assert_stmt_typed(stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::VarDecl(decl) => decl.value.iter().for_each(assert_expr_typed),
        StmtKind::ArrayDecl(decl) => {
            decl.size.iter().for_each(assert_expr_typed);
            decl.values.iter().flatten().for_each(assert_expr_typed);
        }
        StmtKind::Assignment(assignment) => {
            if let AssignTarget::Index { index, .. } = &assignment.target {
                assert_expr_typed(index);
            }
            assert_expr_typed(&assignment.value);
        }
        StmtKind::If {
            condition,
            then_block,
            else_block,
        } => {
            assert_expr_typed(condition);
            assert_block_typed(then_block);
            else_block.iter().for_each(assert_block_typed);
        }
        StmtKind::While { condition, body } => {
            assert_expr_typed(condition);
            assert_block_typed(body);
        }
        StmtKind::For {
            init,
            condition,
            update,
            body,
        } => {
            init.iter().for_each(|init| assert_stmt_typed(init));
            condition.iter().for_each(assert_expr_typed);
            update.iter().for_each(|update| assert_stmt_typed(update));
            assert_block_typed(body);
        }
        StmtKind::Return(value) => value.iter().for_each(assert_expr_typed),
        StmtKind::Print(value) | StmtKind::Expression(value) => assert_expr_typed(value),
        StmtKind::Block(block) => assert_block_typed(block),
        StmtKind::Break | StmtKind::Continue => {}
    }
}

#[test]
fn test_every_expression_is_annotated_after_checking() {
    let (program, _) = front_end(PLUGIN).unwrap();

    for function in program.functions.iter() {
        assert_block_typed(&function.body);
    }
}

#[test]
fn test_annotated_types_follow_promotion() {
    let (program, _) = front_end(PLUGIN).unwrap();
    let speed = &program.functions[1];

    match &speed.body.statements[0].kind {
        StmtKind::VarDecl(decl) => assert_eq!(decl.value.as_ref().unwrap().ty, Some(Type::float())),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn test_independent_defects_reported_in_line_order() {
    let source = "void helper() { }

int broken(int a) {
    helper(1);
    bool flag = a;
    int b = undefined_var;
    int c = a + true;
    missing_fn(a);
    while (a) { }
    return \"text\";
}

void outside() {
    continue;
}
";

    let diagnostics = diagnostics_of(source);
    let found: Vec<(u32, &str)> = diagnostics
        .sorted()
        .iter()
        .map(|diagnostic| (diagnostic.line(), diagnostic.error().get_error_name()))
        .collect();

    assert_eq!(
        found,
        vec![
            (4, "ArityMismatch"),
            (5, "TypeMismatch"),
            (6, "UndefinedSymbol"),
            (7, "InvalidOperator"),
            (8, "UndefinedSymbol"),
            (9, "ConditionNotBoolean"),
            (10, "TypeMismatch"),
            (14, "BreakContinueOutsideLoop"),
        ]
    );
    assert_eq!(diagnostics.error_count(), 8);
    assert_eq!(diagnostics.warning_count(), 0);
}

#[test]
fn test_warnings_never_fail_a_run() {
    let source = "int maybe(bool flag) {
    if (flag) {
        return 1;
    }
}

void main() {
    float speed = 1.0;
    auto current = <prop>(speed);
    int unset;
    int copy = unset;
}
";

    let diagnostics = diagnostics_of(source);

    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(diagnostics.warning_count(), 3);
}

#[test]
fn test_syntax_errors_resynchronize_at_statements() {
    let source = "void main() {
    int a = ;
    int b = 2;
    b = * 3;
}
";

    let errors = front_end(source).unwrap_err();
    let lines: Vec<u32> = errors.iter().map(Error::line).collect();
    assert_eq!(lines, vec![2, 4]);

    let tokens = tokenize(source.to_string(), None).unwrap();
    let errors = parse_with(tokens, Rc::new("plugin.rwlz".to_string()), RecoveryMode::StopAtFirst)
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line(), 2);
}

#[test]
fn test_lexical_errors_stop_the_pipeline() {
    let errors = front_end("void main() {\n    int a = 1 @ 2;\n}").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnrecognisedToken");
    assert_eq!(errors[0].line(), 2);
}

#[test]
fn test_rendered_diagnostic_points_at_source() {
    let source = "void main() {\n    counter += 1;\n}\n";
    let diagnostics = diagnostics_of(source);
    let diagnostic = diagnostics.sorted()[0];

    let rendered = render_diagnostic(diagnostic, source);

    assert!(rendered.starts_with("error: UndefinedSymbol"));
    assert!(rendered.contains("-> plugin.rwlz:2"));
    assert!(rendered.contains("2 | counter += 1;"));
}
