//! The Statement Evaluator (§4.3): executes a `Stmt` against an
//! [`EnvRef`], returning a [`Flow`] signal that threads `return`/`break`/
//! `continue` up through nested blocks without turning them into errors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use quillc_ast::{
    Alternate, BlockStmt, ForEachStmt, ForStmt, IfStmt, ImplementsStmt, Stmt, StructDeclStmt, SwitchStmt, TraitStmt,
    VarDeclStmt, WhileStmt,
};
use quillc_util::Span;

use crate::ctx::Ctx;
use crate::env::{EnvRef, TraitDescriptor, TraitMethodSig};
use crate::error::{SemError, SemResult};
use crate::expr_eval;
use crate::type_check;
use crate::value::{FunctionValue, MethodDescriptor, PropertyDescriptor, StructType, Value};

/// The outcome of executing a statement or block: either it completed
/// normally (optionally producing a value, for a bare-expression statement)
/// or it is carrying a control signal up to the nearest handler (§4.3
/// "control signals are not diagnostics").
#[derive(Debug, Clone)]
pub enum Flow {
    Normal(Option<Value>),
    Return(Value),
    Break,
    Continue,
}

pub fn eval_block(block: &BlockStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    eval_stmts(&block.statements, env, ctx)
}

fn eval_stmts(stmts: &[Stmt], env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let mut last = None;
    for stmt in stmts {
        match eval_stmt(stmt, env, ctx)? {
            Flow::Normal(value) => {
                if value.is_some() {
                    last = value;
                }
            }
            other => return Ok(other),
        }
    }
    Ok(Flow::Normal(last))
}

pub fn eval_stmt(stmt: &Stmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    match stmt {
        Stmt::Program(p) => eval_stmts(&p.statements, env, ctx),
        // Out of scope per §1; recorded but otherwise inert (§2b).
        Stmt::Module(m) => {
            tracing::trace!(name = %m.name, "module declaration (no-op)");
            Ok(Flow::Normal(None))
        }
        Stmt::Import(i) => {
            tracing::trace!(path = %i.path, "import declaration (no-op)");
            Ok(Flow::Normal(None))
        }
        Stmt::Block(b) => {
            let child = env.child();
            eval_stmts(&b.statements, &child, ctx)
        }
        Stmt::VarDecl(v) => eval_var_decl(v, env, ctx),
        Stmt::FnDecl(f) => eval_fn_decl(f, env, ctx),
        Stmt::Return(r) => {
            let value = match &r.value {
                Some(e) => expr_eval::eval(e, env, ctx)?,
                None => Value::Void,
            };
            Ok(Flow::Return(value))
        }
        Stmt::If(s) => eval_if(s, env, ctx),
        Stmt::While(s) => eval_while(s, env, ctx),
        Stmt::For(s) => eval_for(s, env, ctx),
        Stmt::ForEach(s) => eval_for_each(s, env, ctx),
        Stmt::Switch(s) => eval_switch(s, env, ctx),
        Stmt::Break(s) => {
            let _ = s;
            Ok(Flow::Break)
        }
        Stmt::Continue(s) => {
            let _ = s;
            Ok(Flow::Continue)
        }
        Stmt::StructDecl(s) => eval_struct_decl(s, env, ctx),
        Stmt::Trait(t) => eval_trait_decl(t, env),
        Stmt::Implements(i) => eval_implements(i, env),
        Stmt::Expr(e) => {
            let value = expr_eval::eval(e, env, ctx)?;
            Ok(Flow::Normal(Some(value)))
        }
    }
}

fn expect_bool(value: Value, span: Span) -> SemResult<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(SemError::TypeMismatch {
            message: format!("condition must be of type 'BOOL', found '{}'", other.type_tag().describe()),
            span,
        }),
    }
}

fn eval_var_decl(decl: &VarDeclStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let value = match (&decl.value, &decl.explicit_type) {
        (Some(expr), Some(ty)) => {
            // A numeric literal initializer parses against the declared
            // width/sign directly; anything else keeps the width it was
            // produced with and is left for `type_check::check` to accept
            // or reject (§4.4: Integer accepts Integer only at equal bits).
            let value = match expr {
                quillc_ast::Expr::NumericLiteral(lit) => {
                    match expr_eval::eval_numeric_literal_for_type(lit, expr.span(), ty) {
                        Some(result) => result?,
                        None => expr_eval::eval(expr, env, ctx)?,
                    }
                }
                _ => expr_eval::eval(expr, env, ctx)?,
            };
            type_check::check(ty, &value, expr.span())?;
            value
        }
        (Some(expr), None) => expr_eval::eval(expr, env, ctx)?,
        (None, Some(ty)) => Value::default_for(ty),
        (None, None) => {
            return Err(SemError::TypeMismatch {
                message: "variable declaration requires either an initializer or an explicit type".to_string(),
                span: decl.span,
            })
        }
    };
    env.declare_variable(decl.name, value, decl.is_constant, decl.span)?;
    Ok(Flow::Normal(None))
}

fn eval_fn_decl(f: &quillc_ast::FnDeclStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let _ = ctx;
    let func = Rc::new(FunctionValue {
        name: Some(f.name),
        params: f.params.clone(),
        return_type: f.return_type.clone(),
        body: f.body.clone(),
        captured_env: env.clone(),
        receiver: None,
    });
    env.declare_function(f.name, func.clone(), f.span)?;
    // Calling a function through a plain identifier expression resolves via
    // `get_value`, so the declaration is also bound as a constant of type
    // `Value::Function` (§4.1 "functions are first-class values").
    env.declare_variable(f.name, Value::Function(func), true, f.span)?;
    Ok(Flow::Normal(None))
}

fn eval_if(s: &IfStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let cond = expr_eval::eval(&s.condition, env, ctx)?;
    if expect_bool(cond, s.condition.span())? {
        let child = env.child();
        return eval_stmts(&s.consequent.statements, &child, ctx);
    }
    match &s.alternate {
        None => Ok(Flow::Normal(None)),
        Some(alt) => match alt.as_ref() {
            Alternate::If(inner) => eval_if(inner, env, ctx),
            Alternate::Block(block) => {
                let child = env.child();
                eval_stmts(&block.statements, &child, ctx)
            }
        },
    }
}

fn check_loop_budget(iterations: usize, ctx: &Ctx, span: Span) -> SemResult<()> {
    if let Some(limit) = ctx.config.max_loop_iterations {
        if iterations > limit {
            return Err(SemError::LoopIterationLimitExceeded { limit, span });
        }
    }
    Ok(())
}

fn eval_while(s: &WhileStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let mut iterations = 0usize;
    loop {
        let cond = expr_eval::eval(&s.condition, env, ctx)?;
        if !expect_bool(cond, s.condition.span())? {
            break;
        }
        iterations += 1;
        check_loop_budget(iterations, ctx, s.span)?;

        let child = env.child();
        match eval_stmts(&s.body.statements, &child, ctx)? {
            Flow::Break => break,
            Flow::Return(v) => return Ok(Flow::Return(v)),
            Flow::Continue | Flow::Normal(_) => {}
        }
    }
    Ok(Flow::Normal(None))
}

fn eval_for(s: &ForStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let loop_scope = env.child();
    if let Some(init) = &s.init {
        match eval_stmt(init, &loop_scope, ctx)? {
            Flow::Normal(_) => {}
            other => return Ok(other),
        }
    }

    let mut iterations = 0usize;
    loop {
        let cond = expr_eval::eval(&s.condition, &loop_scope, ctx)?;
        if !expect_bool(cond, s.condition.span())? {
            break;
        }
        iterations += 1;
        check_loop_budget(iterations, ctx, s.span)?;

        let body_scope = loop_scope.child();
        match eval_stmts(&s.body.statements, &body_scope, ctx)? {
            Flow::Break => break,
            Flow::Return(v) => return Ok(Flow::Return(v)),
            Flow::Continue | Flow::Normal(_) => {}
        }

        if let Some(post) = &s.post {
            expr_eval::eval(post, &loop_scope, ctx)?;
        }
    }
    Ok(Flow::Normal(None))
}

fn eval_for_each(s: &ForEachStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let iterable = expr_eval::eval(&s.iterable, env, ctx)?;
    let elements = match iterable {
        Value::Array { elements, .. } => elements,
        other => {
            return Err(SemError::TypeMismatch {
                message: format!("cannot iterate over value of type '{}'", other.type_tag().describe()),
                span: s.iterable.span(),
            })
        }
    };

    // Snapshot so mutation of the array from within the loop body doesn't
    // perturb iteration (§4.3 "for-each iterates a fixed snapshot").
    let snapshot = elements.borrow().clone();
    let mut iterations = 0usize;
    for item in snapshot {
        iterations += 1;
        check_loop_budget(iterations, ctx, s.span)?;

        let child = env.child();
        child.declare_variable(s.variable, item, false, s.span)?;
        match eval_stmts(&s.body.statements, &child, ctx)? {
            Flow::Break => break,
            Flow::Return(v) => return Ok(Flow::Return(v)),
            Flow::Continue | Flow::Normal(_) => {}
        }
    }
    Ok(Flow::Normal(None))
}

fn eval_switch(s: &SwitchStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let scrutinee = expr_eval::eval(&s.scrutinee, env, ctx)?;

    for case in &s.cases {
        let case_value = expr_eval::eval(&case.value, env, ctx)?;
        if expr_eval::value_eq(&scrutinee, &case_value) {
            let child = env.child();
            return match eval_stmts(&case.body.statements, &child, ctx)? {
                Flow::Break => Ok(Flow::Normal(None)),
                other => Ok(other),
            };
        }
    }

    if let Some(default) = &s.default {
        let child = env.child();
        return match eval_stmts(&default.statements, &child, ctx)? {
            Flow::Break => Ok(Flow::Normal(None)),
            other => Ok(other),
        };
    }

    Ok(Flow::Normal(None))
}

fn eval_struct_decl(s: &StructDeclStmt, env: &EnvRef, ctx: &Ctx) -> SemResult<Flow> {
    let _ = ctx;
    let mut properties = IndexMap::new();
    for prop in &s.properties {
        if properties
            .insert(
                prop.name,
                PropertyDescriptor { ty: prop.ty.clone(), is_static: prop.is_static, is_public: prop.is_public, read_only: prop.read_only },
            )
            .is_some()
        {
            tracing::warn!(struct_name = %s.name, property = %prop.name, "rejecting struct with duplicate property name");
            return Err(SemError::Redeclared { name: prop.name.as_str().to_string(), span: prop.span });
        }
    }

    let mut methods = IndexMap::new();
    for method in &s.methods {
        if methods
            .insert(
                method.name,
                MethodDescriptor {
                    params: method.params.clone(),
                    return_type: method.return_type.clone(),
                    body: method.body.clone(),
                    is_static: method.is_static,
                    is_public: method.is_public,
                    captured_env: env.clone(),
                },
            )
            .is_some()
        {
            tracing::warn!(struct_name = %s.name, method = %method.name, "rejecting struct with duplicate method name");
            return Err(SemError::Redeclared { name: method.name.as_str().to_string(), span: method.span });
        }
    }

    let struct_type = Rc::new(StructType { name: s.name, properties, methods, statics: RefCell::new(IndexMap::new()) });
    env.declare_struct(s.name, struct_type.clone(), s.span)?;
    env.declare_variable(s.name, Value::StructTypeValue(struct_type), true, s.span)?;
    Ok(Flow::Normal(None))
}

fn eval_trait_decl(t: &TraitStmt, env: &EnvRef) -> SemResult<Flow> {
    let mut methods = HashMap::new();
    for sig in &t.methods {
        methods.insert(sig.name, TraitMethodSig { params: sig.params.clone(), return_type: sig.return_type.clone() });
    }
    env.declare_trait(t.name, Rc::new(TraitDescriptor { name: t.name, methods }), t.span)?;
    Ok(Flow::Normal(None))
}

fn eval_implements(i: &ImplementsStmt, env: &EnvRef) -> SemResult<Flow> {
    let struct_type = env
        .get_struct(i.struct_name)
        .ok_or_else(|| SemError::Undeclared { name: i.struct_name.as_str().to_string(), span: i.span })?;
    let trait_desc = env
        .get_trait(i.trait_name)
        .ok_or_else(|| SemError::Undeclared { name: i.trait_name.as_str().to_string(), span: i.span })?;

    for (method_name, sig) in &trait_desc.methods {
        let method = struct_type.methods.get(method_name).ok_or_else(|| SemError::TraitMethodMismatch {
            struct_name: i.struct_name.as_str().to_string(),
            trait_name: i.trait_name.as_str().to_string(),
            method: method_name.as_str().to_string(),
            reason: "is missing".to_string(),
            span: i.span,
        })?;

        if method.params.len() != sig.params.len() {
            return Err(SemError::TraitMethodMismatch {
                struct_name: i.struct_name.as_str().to_string(),
                trait_name: i.trait_name.as_str().to_string(),
                method: method_name.as_str().to_string(),
                reason: "has a different number of parameters".to_string(),
                span: i.span,
            });
        }
        for (struct_param, trait_param) in method.params.iter().zip(sig.params.iter()) {
            if !type_check::type_refs_equal(&struct_param.ty, &trait_param.ty) {
                return Err(SemError::TraitMethodMismatch {
                    struct_name: i.struct_name.as_str().to_string(),
                    trait_name: i.trait_name.as_str().to_string(),
                    method: method_name.as_str().to_string(),
                    reason: "has a mismatched parameter type".to_string(),
                    span: i.span,
                });
            }
        }
        if !type_check::type_refs_equal(&method.return_type, &sig.return_type) {
            return Err(SemError::TraitMethodMismatch {
                struct_name: i.struct_name.as_str().to_string(),
                trait_name: i.trait_name.as_str().to_string(),
                method: method_name.as_str().to_string(),
                reason: "has a mismatched return type".to_string(),
                span: i.span,
            });
        }
    }

    tracing::debug!(struct_name = %i.struct_name, trait_name = %i.trait_name, "implements check passed");
    Ok(Flow::Normal(None))
}
