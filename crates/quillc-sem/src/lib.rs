//! quillc-sem — semantic analysis for the quillc language.
//!
//! Walks a parsed [`quillc_ast::ProgramStmt`], resolving identifiers in a
//! lexically scoped [`env::EnvRef`], checking type compatibility via
//! [`type_check`], and producing either a [`value::Value`] or a
//! [`quillc_util::diagnostic::Diagnostic`] recorded on the caller's
//! [`quillc_util::diagnostic::Handler`]. Parsing and lexing are out of
//! scope; callers hand this crate an already-built AST.

pub mod config;
pub mod ctx;
pub mod env;
pub mod error;
pub mod expr_eval;
pub mod stmt_eval;
pub mod type_check;
pub mod value;

pub use config::SemanticConfig;
pub use ctx::Ctx;
pub use env::{EnvRef, ParserHandle, TraitDescriptor, TraitMethodSig};
pub use error::{SemError, SemResult};
pub use stmt_eval::Flow;
pub use value::{FunctionValue, MethodDescriptor, PropertyDescriptor, StructType, TypeTag, Value};

use std::rc::Rc;

use quillc_ast::ProgramStmt;
use quillc_util::diagnostic::Handler;

/// Creates the program's root scope. `parser_handle` supplies the file path
/// and source text diagnostics render excerpts from.
pub fn new_root_environment(parser_handle: Rc<ParserHandle>) -> EnvRef {
    EnvRef::new(None, parser_handle)
}

/// Runs every top-level statement of `program` against `env`, in order.
///
/// On success, returns the value of the program's last bare-expression
/// statement if it has one, or `None` for a program that ends on a
/// declaration/control statement. A `return`/`break`/`continue` that
/// bubbles all the way up with no enclosing function/loop frame to catch it
/// is reported as an error (§7), not treated as a successful result. On the
/// first `SemError`, the error is reported to `handler` and evaluation
/// stops; `handler.has_errors()` tells the caller whether anything went
/// wrong.
pub fn run_program(program: &ProgramStmt, env: &EnvRef, config: &SemanticConfig, handler: &Handler) -> Option<Value> {
    let ctx = Ctx::new(handler, config);
    let outcome = stmt_eval::eval_stmt(&quillc_ast::Stmt::Program(program.clone()), env, &ctx);
    match outcome {
        Ok(Flow::Normal(value)) => value,
        Ok(Flow::Return(_)) => {
            SemError::ReturnOutsideFunction { span: program.span }.report(handler);
            None
        }
        Ok(Flow::Break) => {
            SemError::BreakOutsideLoop { span: program.span }.report(handler);
            None
        }
        Ok(Flow::Continue) => {
            SemError::ContinueOutsideLoop { span: program.span }.report(handler);
            None
        }
        Err(err) => {
            err.report(handler);
            None
        }
    }
}

/// Evaluates a single expression against an existing environment, without
/// the program/statement machinery. Convenient for tests and for an
/// embedder's REPL-style "evaluate this one expression" use case.
pub fn evaluate(expr: &quillc_ast::Expr, env: &EnvRef, config: &SemanticConfig, handler: &Handler) -> SemResult<Value> {
    let ctx = Ctx::new(handler, config);
    expr_eval::eval(expr, env, &ctx).map_err(|e| {
        e.report(handler);
        e
    })
}
