// Confirms the evaluator's tracing instrumentation is wired up end to end:
// installing a subscriber and running a program through it must not panic,
// and the scope/call-resolution events described for the ambient logging
// stack must actually fire.

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use quillc_ast::{BinOp, BinaryExpr, Expr, IdentifierExpr, NumericClass, NumericLiteralExpr, ProgramStmt, Stmt, VarDeclStmt};
use quillc_sem::{run_program, EnvRef, ParserHandle, SemanticConfig};
use quillc_util::diagnostic::Handler;
use quillc_util::{FileId, Span, Symbol};
use tracing_subscriber::fmt::MakeWriter;

fn sp() -> Span {
    Span::new(0, 1, 1, 1, FileId(0))
}

#[derive(Clone, Default)]
struct CapturingWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturingWriter {
    type Writer = Self;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn running_a_program_emits_scope_and_declaration_trace_events() {
    let buffer = CapturingWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);

    let env = EnvRef::new(None, Rc::new(ParserHandle::synthetic()));
    let config = SemanticConfig::default();
    let handler = Handler::new();

    let program = ProgramStmt {
        statements: vec![
            Stmt::VarDecl(VarDeclStmt {
                name: Symbol::intern("a"),
                is_constant: false,
                explicit_type: None,
                value: Some(Expr::NumericLiteral(NumericLiteralExpr { lexeme: "1".into(), class: NumericClass::Integer, span: sp() })),
                span: sp(),
            }),
            Stmt::Block(quillc_ast::BlockStmt {
                statements: vec![Stmt::Expr(Expr::Binary(BinaryExpr {
                    left: Box::new(Expr::Identifier(IdentifierExpr { name: Symbol::intern("a"), span: sp() })),
                    op: BinOp::Add,
                    right: Box::new(Expr::NumericLiteral(NumericLiteralExpr { lexeme: "1".into(), class: NumericClass::Integer, span: sp() })),
                    span: sp(),
                }))],
                span: sp(),
            }),
        ],
        span: sp(),
    };
    run_program(&program, &env, &config, &handler);
    assert!(!handler.has_errors());

    let captured = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(captured.contains("declared variable"), "expected a variable-declaration trace event, got: {captured}");
    assert!(captured.contains("entering scope"), "expected a scope-entry trace event, got: {captured}");
}
