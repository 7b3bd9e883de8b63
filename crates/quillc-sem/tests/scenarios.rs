// End-to-end scenarios (S1-S8) plus the cross-cutting properties the
// evaluator is expected to uphold: determinism, scope isolation, bit-width
// preservation, short-circuiting, constant immutability. These build
// complete `Program` nodes and run them through `run_program` the way an
// embedder actually calls this crate, exercised only through its public API.

use std::rc::Rc;

use quillc_ast::{
    Alternate, AssignmentExpr, BinOp, BinaryExpr, BlockStmt, BooleanLiteralExpr, Expr, FnDeclStmt, IdentifierExpr,
    IfStmt, IntWidth, NumericClass, NumericLiteralExpr, Param, ProgramStmt, ReturnStmt, Stmt, TypeRef, VarDeclStmt,
    WhileStmt,
};
use quillc_util::diagnostic::Handler;
use quillc_util::{FileId, Span, Symbol};

use quillc_sem::{run_program, EnvRef, ParserHandle, SemError, SemanticConfig, Value};

fn sp() -> Span {
    Span::new(0, 1, 1, 1, FileId(0))
}

fn root_env() -> EnvRef {
    EnvRef::new(None, Rc::new(ParserHandle::synthetic()))
}

fn int_lit(n: i64) -> Expr {
    Expr::NumericLiteral(NumericLiteralExpr { lexeme: n.to_string(), class: NumericClass::Integer, span: sp() })
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(IdentifierExpr { name: Symbol::intern(name), span: sp() })
}

fn i32_ty() -> TypeRef {
    TypeRef::Integer { bits: IntWidth::W32, signed: true, span: sp() }
}

fn i8_ty() -> TypeRef {
    TypeRef::Integer { bits: IntWidth::W8, signed: true, span: sp() }
}

fn program(stmts: Vec<Stmt>) -> ProgramStmt {
    ProgramStmt { statements: stmts, span: sp() }
}

fn run(stmts: Vec<Stmt>) -> (Option<Value>, Handler) {
    let env = root_env();
    let config = SemanticConfig::default();
    let handler = Handler::new();
    let prog = program(stmts);
    let value = run_program(&prog, &env, &config, &handler);
    (value, handler)
}

/// S1: `let a: i32 = 5; let b: i32 = 7; a + b` -> Integer{32, signed, 12}.
#[test]
fn s1_integer_addition_with_matching_annotations() {
    let (value, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt {
            name: Symbol::intern("a"),
            is_constant: false,
            explicit_type: Some(i32_ty()),
            value: Some(int_lit(5)),
            span: sp(),
        }),
        Stmt::VarDecl(VarDeclStmt {
            name: Symbol::intern("b"),
            is_constant: false,
            explicit_type: Some(i32_ty()),
            value: Some(int_lit(7)),
            span: sp(),
        }),
        Stmt::Expr(Expr::Binary(BinaryExpr {
            left: Box::new(ident("a")),
            op: BinOp::Add,
            right: Box::new(ident("b")),
            span: sp(),
        })),
    ]);
    assert!(!handler.has_errors());
    match value {
        Some(Value::Integer { value, bits, signed }) => {
            assert_eq!(value, 12);
            assert_eq!(bits, IntWidth::W32);
            assert!(signed);
        }
        other => panic!("expected Integer(12), got {other:?}"),
    }
}

/// S2: `let x: i8 = 5; let y: i32 = x` -> `TypeMismatch` citing both widths.
#[test]
fn s2_width_mismatch_on_redeclaration_is_a_type_mismatch() {
    let env = root_env();
    let config = SemanticConfig::default();
    let handler = Handler::new();
    let prog = program(vec![Stmt::VarDecl(VarDeclStmt {
        name: Symbol::intern("x"),
        is_constant: false,
        explicit_type: Some(i8_ty()),
        value: Some(int_lit(5)),
        span: sp(),
    })]);
    run_program(&prog, &env, &config, &handler);
    assert!(!handler.has_errors());

    // `let y: i32 = x` modeled directly against the same env, since the
    // evaluator itself has no notion of "subsequent top-level statement
    // groups" beyond one `Program` -- the scenario is equivalent either way.
    let decl = VarDeclStmt {
        name: Symbol::intern("y"),
        is_constant: false,
        explicit_type: Some(i32_ty()),
        value: Some(ident("x")),
        span: sp(),
    };
    let result = quillc_sem::stmt_eval::eval_stmt(&Stmt::VarDecl(decl), &env, &quillc_sem::ctx::Ctx::new(&handler, &config));
    match result {
        Err(SemError::TypeMismatch { message, .. }) => {
            assert_eq!(message, "cannot assign value of type 'INTEGER' to 'INTEGER' of size 8 to integer of size 32");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

/// S3: `let x = 10; let y = 0; x / y` -> `DivisionByZero`.
#[test]
fn s3_division_by_zero_reports_and_halts() {
    let (value, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt { name: Symbol::intern("x"), is_constant: false, explicit_type: None, value: Some(int_lit(10)), span: sp() }),
        Stmt::VarDecl(VarDeclStmt { name: Symbol::intern("y"), is_constant: false, explicit_type: None, value: Some(int_lit(0)), span: sp() }),
        Stmt::Expr(Expr::Binary(BinaryExpr { left: Box::new(ident("x")), op: BinOp::Div, right: Box::new(ident("y")), span: sp() })),
    ]);
    assert!(handler.has_errors());
    assert!(value.is_none());
}

/// S4: `const k = 3; k = 4` -> `AssignToConstant`.
#[test]
fn s4_assigning_to_a_constant_fails() {
    let (value, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt { name: Symbol::intern("k"), is_constant: true, explicit_type: None, value: Some(int_lit(3)), span: sp() }),
        Stmt::Expr(Expr::Assignment(AssignmentExpr {
            target: Box::new(ident("k")),
            op: None,
            value: Box::new(int_lit(4)),
            span: sp(),
        })),
    ]);
    assert!(handler.has_errors());
    assert!(value.is_none());
}

/// S5: `fn add(a: i32, b: i32) -> i32 { return a + b; } add(2, 3)` -> 5.
#[test]
fn s5_function_call_returns_sum() {
    let body = BlockStmt {
        statements: vec![Stmt::Return(ReturnStmt {
            value: Some(Expr::Binary(BinaryExpr { left: Box::new(ident("a")), op: BinOp::Add, right: Box::new(ident("b")), span: sp() })),
            span: sp(),
        })],
        span: sp(),
    };
    let fn_decl = FnDeclStmt {
        name: Symbol::intern("add"),
        params: vec![Param { name: Symbol::intern("a"), ty: i32_ty() }, Param { name: Symbol::intern("b"), ty: i32_ty() }],
        return_type: i32_ty(),
        body,
        span: sp(),
    };
    let call = Expr::FunctionCall(quillc_ast::FunctionCallExpr {
        callee: Box::new(ident("add")),
        args: vec![int_lit(2), int_lit(3)],
        span: sp(),
    });
    let (value, handler) = run(vec![Stmt::FnDecl(fn_decl), Stmt::Expr(call)]);
    assert!(!handler.has_errors());
    match value {
        Some(Value::Integer { value, .. }) => assert_eq!(value, 5),
        other => panic!("expected Integer(5), got {other:?}"),
    }
}

/// S6: `if (1 < 2) { 10 } else { 20 }` -> 10.
#[test]
fn s6_if_expression_takes_the_true_branch() {
    let cond = Expr::Binary(BinaryExpr { left: Box::new(int_lit(1)), op: BinOp::Lt, right: Box::new(int_lit(2)), span: sp() });
    let if_stmt = IfStmt {
        condition: cond,
        consequent: BlockStmt { statements: vec![Stmt::Expr(int_lit(10))], span: sp() },
        alternate: Some(Box::new(Alternate::Block(BlockStmt { statements: vec![Stmt::Expr(int_lit(20))], span: sp() }))),
        span: sp(),
    };
    let (value, handler) = run(vec![Stmt::If(if_stmt)]);
    assert!(!handler.has_errors());
    match value {
        Some(Value::Integer { value, .. }) => assert_eq!(value, 10),
        other => panic!("expected Integer(10), got {other:?}"),
    }
}

/// S7: `"foo" + "bar"` -> "foobar"; `"foo" - "bar"` -> `UnsupportedBinaryOp`.
#[test]
fn s7_string_concatenation_and_rejected_subtraction() {
    let foo = || Expr::StringLiteral(quillc_ast::StringLiteralExpr { value: "foo".to_string(), span: sp() });
    let bar = || Expr::StringLiteral(quillc_ast::StringLiteralExpr { value: "bar".to_string(), span: sp() });

    let (value, handler) = run(vec![Stmt::Expr(Expr::Binary(BinaryExpr { left: Box::new(foo()), op: BinOp::Add, right: Box::new(bar()), span: sp() }))]);
    assert!(!handler.has_errors());
    match value {
        Some(Value::String(s)) => assert_eq!(&*s, "foobar"),
        other => panic!("expected String(\"foobar\"), got {other:?}"),
    }

    let (value, handler) = run(vec![Stmt::Expr(Expr::Binary(BinaryExpr { left: Box::new(foo()), op: BinOp::Sub, right: Box::new(bar()), span: sp() }))]);
    assert!(handler.has_errors());
    assert!(value.is_none());
}

/// S8: `let i = 0; while (i < 3) { i = i + 1 } i` -> 3.
#[test]
fn s8_while_loop_counts_to_three() {
    let i = Symbol::intern("i");
    let cond = Expr::Binary(BinaryExpr { left: Box::new(ident("i")), op: BinOp::Lt, right: Box::new(int_lit(3)), span: sp() });
    let body = BlockStmt {
        statements: vec![Stmt::Expr(Expr::Assignment(AssignmentExpr {
            target: Box::new(ident("i")),
            op: None,
            value: Box::new(Expr::Binary(BinaryExpr { left: Box::new(ident("i")), op: BinOp::Add, right: Box::new(int_lit(1)), span: sp() })),
            span: sp(),
        }))],
        span: sp(),
    };
    let (value, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt { name: i, is_constant: false, explicit_type: None, value: Some(int_lit(0)), span: sp() }),
        Stmt::While(WhileStmt { condition: cond, body, span: sp() }),
        Stmt::Expr(ident("i")),
    ]);
    assert!(!handler.has_errors());
    match value {
        Some(Value::Integer { value, .. }) => assert_eq!(value, 3),
        other => panic!("expected Integer(3), got {other:?}"),
    }
}

/// Property 2 (scope isolation): a name declared inside a `Block` does not
/// survive past it, and assigning from within mutates the outer binding
/// rather than shadowing it.
#[test]
fn scope_isolation_block_does_not_leak_declarations() {
    let outer = Symbol::intern("outer");
    let inner_only = Symbol::intern("inner_only");
    let (value, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt { name: outer, is_constant: false, explicit_type: None, value: Some(int_lit(1)), span: sp() }),
        Stmt::Block(BlockStmt {
            statements: vec![
                Stmt::VarDecl(VarDeclStmt { name: inner_only, is_constant: false, explicit_type: None, value: Some(int_lit(99)), span: sp() }),
                Stmt::Expr(Expr::Assignment(AssignmentExpr {
                    target: Box::new(ident("outer")),
                    op: None,
                    value: Box::new(int_lit(2)),
                    span: sp(),
                })),
            ],
            span: sp(),
        }),
        Stmt::Expr(ident("outer")),
    ]);
    assert!(!handler.has_errors());
    match value {
        Some(Value::Integer { value, .. }) => assert_eq!(value, 2),
        other => panic!("expected Integer(2), got {other:?}"),
    }
}

/// Property 4 (short-circuit): `false && (x = 1)` leaves `x` untouched;
/// `true || (x = 1)` likewise.
#[test]
fn short_circuit_and_or_skip_their_right_side_effects() {
    let x = Symbol::intern("x");
    let assign_one = || {
        Expr::Assignment(AssignmentExpr { target: Box::new(ident("x")), op: None, value: Box::new(int_lit(1)), span: sp() })
    };

    let (_, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt { name: x, is_constant: false, explicit_type: None, value: Some(int_lit(0)), span: sp() }),
        Stmt::Expr(Expr::Binary(BinaryExpr {
            left: Box::new(Expr::BooleanLiteral(BooleanLiteralExpr { value: false, span: sp() })),
            op: BinOp::And,
            right: Box::new(assign_one()),
            span: sp(),
        })),
        Stmt::Expr(ident("x")),
    ]);
    assert!(!handler.has_errors());

    let env = root_env();
    let config = SemanticConfig::default();
    let handler = Handler::new();
    env.declare_variable(x, Value::Integer { value: 0, bits: IntWidth::W32, signed: true }, false, sp()).unwrap();
    let or_expr = Expr::Binary(BinaryExpr {
        left: Box::new(Expr::BooleanLiteral(BooleanLiteralExpr { value: true, span: sp() })),
        op: BinOp::Or,
        right: Box::new(assign_one()),
        span: sp(),
    });
    quillc_sem::evaluate(&or_expr, &env, &config, &handler).unwrap();
    assert!(matches!(env.get_value(x, sp()).unwrap(), Value::Integer { value: 0, .. }));
}

/// Property 3 (bit-width preservation): an `i8` declaration keeps reading
/// back as an 8-bit integer no matter how many times it's reassigned.
#[test]
fn bit_width_is_preserved_across_reassignment() {
    let x = Symbol::intern("x");
    let (_, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt { name: x, is_constant: false, explicit_type: Some(i8_ty()), value: Some(int_lit(5)), span: sp() }),
        Stmt::Expr(Expr::Assignment(AssignmentExpr { target: Box::new(ident("x")), op: None, value: Box::new(int_lit(9)), span: sp() })),
    ]);
    assert!(handler.has_errors(), "assigning a freshly-parsed i32 literal onto an i8 binding must be a TypeMismatch");
}

/// Property 6 / S4 variant: constants declared with an explicit type are
/// still immutable.
#[test]
fn typed_constant_is_still_immutable() {
    let (_, handler) = run(vec![
        Stmt::VarDecl(VarDeclStmt {
            name: Symbol::intern("k"),
            is_constant: true,
            explicit_type: Some(i32_ty()),
            value: Some(int_lit(3)),
            span: sp(),
        }),
        Stmt::Expr(Expr::Assignment(AssignmentExpr { target: Box::new(ident("k")), op: None, value: Box::new(int_lit(4)), span: sp() })),
    ]);
    assert!(handler.has_errors());
}

/// Determinism (property 1): running the same program twice against fresh
/// environments yields the same value and the same diagnostic outcome.
#[test]
fn determinism_same_program_same_result() {
    let build = || {
        vec![
            Stmt::VarDecl(VarDeclStmt { name: Symbol::intern("a"), is_constant: false, explicit_type: None, value: Some(int_lit(5)), span: sp() }),
            Stmt::VarDecl(VarDeclStmt { name: Symbol::intern("b"), is_constant: false, explicit_type: None, value: Some(int_lit(7)), span: sp() }),
            Stmt::Expr(Expr::Binary(BinaryExpr { left: Box::new(ident("a")), op: BinOp::Add, right: Box::new(ident("b")), span: sp() })),
        ]
    };
    let (v1, h1) = run(build());
    let (v2, h2) = run(build());
    match (v1, v2) {
        (Some(Value::Integer { value: a, .. }), Some(Value::Integer { value: b, .. })) => assert_eq!(a, b),
        other => panic!("expected matching Integer results, got {other:?}"),
    }
    assert_eq!(h1.has_errors(), h2.has_errors());
}
