//! The expression evaluator: dispatches on `Expr` variant and returns a
//! [`Value`] or a [`SemError`].

use std::cell::RefCell;
use std::rc::Rc;

use quillc_ast::{
    AssignmentExpr, BinOp, BinaryExpr, Expr, FunctionCallExpr, NumericClass, StructPropertyAccessExpr, UnOp, UnaryExpr,
};
use quillc_util::Span;

use crate::ctx::Ctx;
use crate::env::EnvRef;
use crate::error::{SemError, SemResult};
use crate::stmt_eval;
use crate::type_check;
use crate::value::{FunctionValue, TypeTag, Value};

/// A numeric value reduced to its raw payload plus width, so arithmetic and
/// comparison rules can be written once instead of per (Int, Float) pairing.
enum Num {
    Int { value: i64, bits: quillc_ast::IntWidth, signed: bool },
    Float { value: f64, bits: quillc_ast::FloatWidth },
}

fn as_num(value: &Value) -> Option<Num> {
    match value {
        Value::Integer { value, bits, signed } => Some(Num::Int { value: *value, bits: *bits, signed: *signed }),
        Value::Float { value, bits } => Some(Num::Float { value: *value, bits: *bits }),
        _ => None,
    }
}

pub fn eval(expr: &Expr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    match expr {
        Expr::NumericLiteral(lit) => eval_numeric_literal(lit, expr.span()),
        Expr::StringLiteral(lit) => Ok(Value::String(Rc::from(lit.value.as_str()))),
        Expr::CharacterLiteral(lit) => eval_char_literal(lit, expr.span()),
        Expr::BooleanLiteral(lit) => Ok(Value::Boolean(lit.value)),
        Expr::NullLiteral(_) => Ok(Value::Null),
        Expr::VoidLiteral(_) => Ok(Value::Void),
        Expr::ArrayLiteral(lit) => eval_array_literal(lit, env, ctx),
        Expr::StructLiteral(lit) => eval_struct_literal(lit, env, ctx),
        Expr::Identifier(id) => env.get_value(id.name, id.span),
        Expr::Binary(b) => eval_binary(b, env, ctx),
        Expr::Unary(u) => eval_unary(u, env, ctx),
        Expr::Assignment(a) => eval_assignment(a, env, ctx),
        Expr::FunctionCall(call) => eval_call(call, env, ctx),
        Expr::StructPropertyAccess(access) => eval_property_access(access, env, ctx),
    }
}

fn eval_numeric_literal(lit: &quillc_ast::NumericLiteralExpr, span: Span) -> SemResult<Value> {
    match lit.class {
        NumericClass::Integer => eval_integer_literal(lit, span, quillc_ast::IntWidth::W32, true),
        NumericClass::Float => {
            let bits = quillc_ast::FloatWidth::W64;
            let value: f64 = lit.lexeme.parse().map_err(|_| SemError::NumericOverflow {
                lexeme: lit.lexeme.clone(),
                bits: bits.bits(),
                signed: true,
                span,
            })?;
            Ok(Value::Float { value, bits })
        }
    }
}

/// Parses an integer literal's lexeme and range-checks it against `bits`,
/// rather than against the default width — so a literal initializing a
/// wider declared type (e.g. `let x: i64 = 5000000000`) is checked against
/// that width instead of being rejected before the annotation ever applies.
fn eval_integer_literal(
    lit: &quillc_ast::NumericLiteralExpr,
    span: Span,
    bits: quillc_ast::IntWidth,
    signed: bool,
) -> SemResult<Value> {
    let value: i64 = lit.lexeme.parse().map_err(|_| SemError::NumericOverflow {
        lexeme: lit.lexeme.clone(),
        bits: bits.bits(),
        signed,
        span,
    })?;
    if !int_fits_width(value, bits, signed) {
        return Err(SemError::NumericOverflow { lexeme: lit.lexeme.clone(), bits: bits.bits(), signed, span });
    }
    Ok(Value::Integer { value, bits, signed })
}

/// Whether `value` fits within the signed (or unsigned) range of `bits`.
pub(crate) fn int_fits_width(value: i64, bits: quillc_ast::IntWidth, signed: bool) -> bool {
    let width = bits.bits();
    if signed {
        if width >= 64 {
            return true;
        }
        let max = (1i64 << (width - 1)) - 1;
        let min = -(1i64 << (width - 1));
        value >= min && value <= max
    } else {
        if value < 0 {
            return false;
        }
        if width >= 64 {
            return true;
        }
        let max = (1i64 << width) - 1;
        value <= max
    }
}

/// Evaluates a numeric literal directly against an explicitly declared
/// numeric type, used by `stmt_eval::eval_var_decl` so a literal initializer
/// is parsed/range-checked against its final declared width instead of the
/// literal's own parse-time default (§4.2, §4.3). Returns `None` when the
/// literal's class doesn't correspond to a numeric `TypeRef`, leaving the
/// caller to fall back to the default-width evaluation (and let the Type
/// Compatibility Checker report the kind mismatch).
pub(crate) fn eval_numeric_literal_for_type(
    lit: &quillc_ast::NumericLiteralExpr,
    span: Span,
    ty: &quillc_ast::TypeRef,
) -> Option<SemResult<Value>> {
    match (lit.class, ty) {
        (NumericClass::Integer, quillc_ast::TypeRef::Integer { bits, signed, .. }) => {
            Some(eval_integer_literal(lit, span, *bits, *signed))
        }
        (NumericClass::Float, quillc_ast::TypeRef::Float { bits, .. }) => {
            let value: f64 = match lit.lexeme.parse() {
                Ok(v) => v,
                Err(_) => {
                    return Some(Err(SemError::NumericOverflow {
                        lexeme: lit.lexeme.clone(),
                        bits: bits.bits(),
                        signed: true,
                        span,
                    }))
                }
            };
            Some(Ok(Value::Float { value, bits: *bits }))
        }
        _ => None,
    }
}

fn eval_char_literal(lit: &quillc_ast::CharacterLiteralExpr, span: Span) -> SemResult<Value> {
    let mut chars = lit.value.chars();
    let first = chars.next();
    match (first, chars.next()) {
        (Some(c), None) => Ok(Value::Character(c)),
        _ => Err(SemError::MalformedCharLiteral { lexeme: lit.value.clone(), span }),
    }
}

fn eval_array_literal(lit: &quillc_ast::ArrayLiteralExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let mut values = Vec::with_capacity(lit.elements.len());
    for element in &lit.elements {
        values.push(eval(element, env, ctx)?);
    }
    let element_type = values.first().map(|v| v.type_tag()).unwrap_or(TypeTag::Null);
    Ok(Value::Array { element_type: Box::new(element_type), elements: Rc::new(RefCell::new(values)) })
}

fn eval_struct_literal(lit: &quillc_ast::StructLiteralExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let struct_type = env
        .get_struct(lit.struct_name)
        .ok_or_else(|| SemError::Undeclared { name: lit.struct_name.as_str().to_string(), span: lit.span })?;

    let mut fields = indexmap::IndexMap::new();
    let mut provided = rustc_hash::FxHashSet::default();

    for init in &lit.fields {
        provided.insert(init.name);
        let descriptor = struct_type.properties.get(&init.name).ok_or_else(|| SemError::UnknownStructField {
            struct_name: lit.struct_name.as_str().to_string(),
            field: init.name.as_str().to_string(),
            span: init.value.span(),
        })?;
        let value = eval(&init.value, env, ctx)?;
        type_check::check(&descriptor.ty, &value, init.value.span())?;
        if !descriptor.is_static {
            fields.insert(init.name, value);
        }
    }

    for (name, descriptor) in &struct_type.properties {
        if descriptor.is_static {
            continue;
        }
        if !provided.contains(name) {
            return Err(SemError::MissingStructField {
                struct_name: lit.struct_name.as_str().to_string(),
                field: name.as_str().to_string(),
                span: lit.span,
            });
        }
    }

    Ok(Value::StructInstance { struct_type, fields: Rc::new(RefCell::new(fields)) })
}

fn eval_unary(unary: &UnaryExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    match unary.op {
        UnOp::Plus | UnOp::Minus => {
            let operand = eval(&unary.operand, env, ctx)?;
            match as_num(&operand) {
                Some(Num::Int { value, bits, signed }) => {
                    let value = if unary.op == UnOp::Minus { value.wrapping_neg() } else { value };
                    Ok(Value::Integer { value, bits, signed })
                }
                Some(Num::Float { value, bits }) => {
                    let value = if unary.op == UnOp::Minus { -value } else { value };
                    Ok(Value::Float { value, bits })
                }
                None => Err(SemError::InvalidUnaryOperand {
                    operand_type: operand.type_tag().describe(),
                    op: if unary.op == UnOp::Minus { "-" } else { "+" }.to_string(),
                    span: unary.span,
                }),
            }
        }
        UnOp::Not => {
            let operand = eval(&unary.operand, env, ctx)?;
            match operand {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(SemError::InvalidUnaryOperand {
                    operand_type: other.type_tag().describe(),
                    op: "!".to_string(),
                    span: unary.span,
                }),
            }
        }
        UnOp::Increment | UnOp::Decrement => eval_incdec(unary, env, ctx),
    }
}

fn eval_incdec(unary: &UnaryExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let op_str = if unary.op == UnOp::Increment { "++" } else { "--" };
    let ident = match unary.operand.as_ref() {
        Expr::Identifier(id) => id,
        other => {
            let ty = eval(other, env, ctx)?.type_tag().describe();
            return Err(SemError::InvalidUnaryOperand { operand_type: ty, op: op_str.to_string(), span: unary.span });
        }
    };
    let current = env.get_value(ident.name, ident.span)?;
    let delta = if unary.op == UnOp::Increment { 1 } else { -1 };
    let updated = match current {
        Value::Integer { value, bits, signed } => Value::Integer { value: value.wrapping_add(delta), bits, signed },
        other => {
            return Err(SemError::InvalidUnaryOperand {
                operand_type: other.type_tag().describe(),
                op: op_str.to_string(),
                span: unary.span,
            })
        }
    };
    env.assign_variable(ident.name, updated.clone(), unary.span)?;
    Ok(updated)
}

fn eval_binary(binary: &BinaryExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let op = binary.op;
    if op.is_logical() {
        return eval_logical(binary, env, ctx);
    }

    let left = eval(&binary.left, env, ctx)?;
    let right = eval(&binary.right, env, ctx)?;

    if op.is_arithmetic() {
        return eval_arithmetic(op, left, right, binary.span);
    }
    if op.is_comparison() {
        return eval_comparison(op, left, right, binary.span);
    }
    unreachable!("BinOp variants are exhaustively arithmetic, comparison, or logical")
}

fn eval_logical(binary: &BinaryExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let left = eval(&binary.left, env, ctx)?;
    if let Value::Boolean(l) = left {
        let short_circuits = (binary.op == BinOp::And && !l) || (binary.op == BinOp::Or && l);
        if short_circuits {
            return Ok(Value::Boolean(l));
        }
        let right = eval(&binary.right, env, ctx)?;
        return match right {
            Value::Boolean(r) => Ok(Value::Boolean(if binary.op == BinOp::And { l && r } else { l || r })),
            other if !ctx.config.strict_logical_operands => {
                let r = other.is_truthy();
                Ok(Value::Boolean(if binary.op == BinOp::And { l && r } else { l || r }))
            }
            other => Err(SemError::UnsupportedBinaryOp {
                left: TypeTag::Bool.describe(),
                right: other.type_tag().describe(),
                op: binary.op.as_str().to_string(),
                span: binary.span,
            }),
        };
    }

    if ctx.config.strict_logical_operands {
        return Err(SemError::UnsupportedBinaryOp {
            left: left.type_tag().describe(),
            right: "<unevaluated>".to_string(),
            op: binary.op.as_str().to_string(),
            span: binary.span,
        });
    }

    let l = left.is_truthy();
    let short_circuits = (binary.op == BinOp::And && !l) || (binary.op == BinOp::Or && l);
    if short_circuits {
        return Ok(Value::Boolean(l));
    }
    let right = eval(&binary.right, env, ctx)?;
    let r = right.is_truthy();
    Ok(Value::Boolean(if binary.op == BinOp::And { l && r } else { l || r }))
}

fn eval_arithmetic(op: BinOp, left: Value, right: Value, span: Span) -> SemResult<Value> {
    if let (Value::String(l), Value::String(r)) = (&left, &right) {
        if op == BinOp::Add {
            return Ok(Value::String(Rc::from(format!("{l}{r}"))));
        }
        return Err(SemError::UnsupportedBinaryOp {
            left: TypeTag::String.describe(),
            right: TypeTag::String.describe(),
            op: op.as_str().to_string(),
            span,
        });
    }

    let (lnum, rnum) = match (as_num(&left), as_num(&right)) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            return Err(SemError::UnsupportedBinaryOp {
                left: left.type_tag().describe(),
                right: right.type_tag().describe(),
                op: op.as_str().to_string(),
                span,
            })
        }
    };

    match (lnum, rnum) {
        (Num::Int { value: l, bits: lb, signed }, Num::Int { value: r, bits: rb, .. }) => {
            if matches!(op, BinOp::Div | BinOp::Mod) && r == 0 {
                return Err(SemError::DivisionByZero { span });
            }
            let bits = lb.max(rb);
            let value = match op {
                BinOp::Add => l.wrapping_add(r),
                BinOp::Sub => l.wrapping_sub(r),
                BinOp::Mul => l.wrapping_mul(r),
                BinOp::Div => l.wrapping_div(r),
                BinOp::Mod => l.wrapping_rem(r),
                BinOp::Pow => {
                    if r < 0 {
                        return Err(SemError::UnsupportedBinaryOp {
                            left: "INTEGER".to_string(),
                            right: "INTEGER".to_string(),
                            op: "^".to_string(),
                            span,
                        });
                    }
                    l.wrapping_pow(r as u32)
                }
                _ => unreachable!(),
            };
            Ok(Value::Integer { value, bits, signed })
        }
        (Num::Float { value: l, bits: lb }, Num::Float { value: r, bits: rb }) => {
            if matches!(op, BinOp::Div | BinOp::Mod) && r == 0.0 {
                return Err(SemError::DivisionByZero { span });
            }
            let bits = lb.max(rb);
            let value = eval_float_op(op, l, r, span)?;
            Ok(Value::Float { value, bits })
        }
        (Num::Int { value: l, bits: lb, .. }, Num::Float { value: r, bits: rb }) => {
            if matches!(op, BinOp::Div | BinOp::Mod) && r == 0.0 {
                return Err(SemError::DivisionByZero { span });
            }
            let bits = int_bits_as_float_width(lb).max(rb);
            let value = eval_float_op(op, l as f64, r, span)?;
            Ok(Value::Float { value, bits })
        }
        (Num::Float { value: l, bits: lb }, Num::Int { value: r, bits: rb, .. }) => {
            if matches!(op, BinOp::Div | BinOp::Mod) && r == 0 {
                return Err(SemError::DivisionByZero { span });
            }
            let bits = lb.max(int_bits_as_float_width(rb));
            let value = eval_float_op(op, l, r as f64, span)?;
            Ok(Value::Float { value, bits })
        }
    }
}

/// Mixed Int/Float arithmetic widens to Float at `max(Int.bits, Float.bits)`;
/// this maps the integer side's raw bit count to the nearest valid
/// `FloatWidth` so the existing `FloatWidth::max` can pick the wider one.
fn int_bits_as_float_width(bits: quillc_ast::IntWidth) -> quillc_ast::FloatWidth {
    if bits.bits() > 32 {
        quillc_ast::FloatWidth::W64
    } else {
        quillc_ast::FloatWidth::W32
    }
}

fn eval_float_op(op: BinOp, l: f64, r: f64, span: Span) -> SemResult<f64> {
    match op {
        BinOp::Add => Ok(l + r),
        BinOp::Sub => Ok(l - r),
        BinOp::Mul => Ok(l * r),
        BinOp::Div => Ok(l / r),
        BinOp::Mod => Ok(l % r),
        BinOp::Pow => {
            if r.fract() != 0.0 {
                return Err(SemError::UnsupportedBinaryOp {
                    left: "FLOAT".to_string(),
                    right: "FLOAT".to_string(),
                    op: "^".to_string(),
                    span,
                });
            }
            // Repeated squaring with an integer exponent.
            let mut exp = r.abs() as u64;
            let mut base = l;
            let mut result = 1.0_f64;
            while exp > 0 {
                if exp & 1 == 1 {
                    result *= base;
                }
                base *= base;
                exp >>= 1;
            }
            Ok(if r < 0.0 { 1.0 / result } else { result })
        }
        _ => unreachable!(),
    }
}

fn eval_comparison(op: BinOp, left: Value, right: Value, span: Span) -> SemResult<Value> {
    if let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) {
        let (lf, rf) = (num_as_f64(&l), num_as_f64(&r));
        let result = match op {
            BinOp::Eq => lf == rf,
            BinOp::Ne => lf != rf,
            BinOp::Lt => lf < rf,
            BinOp::Le => lf <= rf,
            BinOp::Gt => lf > rf,
            BinOp::Ge => lf >= rf,
            _ => unreachable!(),
        };
        return Ok(Value::Boolean(result));
    }

    match (&left, &right) {
        (Value::String(l), Value::String(r)) => match op {
            BinOp::Eq => Ok(Value::Boolean(l == r)),
            BinOp::Ne => Ok(Value::Boolean(l != r)),
            _ => Err(SemError::IncomparableTypes {
                left: TypeTag::String.describe(),
                right: TypeTag::String.describe(),
                op: op.as_str().to_string(),
                span,
            }),
        },
        (Value::Boolean(l), Value::Boolean(r)) => match op {
            BinOp::Eq => Ok(Value::Boolean(l == r)),
            BinOp::Ne => Ok(Value::Boolean(l != r)),
            _ => Err(SemError::IncomparableTypes {
                left: TypeTag::Bool.describe(),
                right: TypeTag::Bool.describe(),
                op: op.as_str().to_string(),
                span,
            }),
        },
        _ => match op {
            BinOp::Eq => Ok(Value::Boolean(false)),
            BinOp::Ne => Ok(Value::Boolean(true)),
            _ => Err(SemError::IncomparableTypes {
                left: left.type_tag().describe(),
                right: right.type_tag().describe(),
                op: op.as_str().to_string(),
                span,
            }),
        },
    }
}

fn num_as_f64(n: &Num) -> f64 {
    match n {
        Num::Int { value, .. } => *value as f64,
        Num::Float { value, .. } => *value,
    }
}

/// Structural equality used by `switch`/`case` matching: looser than `==`'s
/// `IncomparableTypes` guard since a `case` arm is never itself an operator
/// expression the user wrote.
pub(crate) fn value_eq(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return num_as_f64(&x) == num_as_f64(&y);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Character(x), Value::Character(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Void, Value::Void) => true,
        _ => false,
    }
}

fn eval_assignment(assign: &AssignmentExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let rhs = eval(&assign.value, env, ctx)?;
    let computed = match assign.op {
        None => rhs,
        Some(op) => {
            let current = eval(&assign.target, env, ctx)?;
            eval_arithmetic(op, current, rhs, assign.span)?
        }
    };

    match assign.target.as_ref() {
        Expr::Identifier(id) => env.assign_variable(id.name, computed, assign.span),
        Expr::StructPropertyAccess(access) => assign_struct_property(access, computed, env, ctx),
        _ => Err(SemError::InvalidAssignmentTarget { span: assign.span }),
    }
}

fn assign_struct_property(access: &StructPropertyAccessExpr, value: Value, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let object = eval(&access.object, env, ctx)?;
    match object {
        Value::StructInstance { struct_type, fields } => {
            let descriptor = struct_type.properties.get(&access.property).ok_or_else(|| SemError::UnknownStructField {
                struct_name: struct_type.name.as_str().to_string(),
                field: access.property.as_str().to_string(),
                span: access.span,
            })?;
            if descriptor.read_only {
                return Err(SemError::AssignToReadOnlyField {
                    field: access.property.as_str().to_string(),
                    span: access.span,
                });
            }
            let mut fields_mut = fields.borrow_mut();
            let existing = fields_mut
                .get(&access.property)
                .expect("struct instance field set equals its type's property set");
            if existing.type_tag() != value.type_tag() {
                return Err(SemError::TypeMismatch {
                    message: type_check::format_tag_mismatch(&value.type_tag(), &existing.type_tag()),
                    span: access.span,
                });
            }
            fields_mut.insert(access.property, value.clone());
            Ok(value)
        }
        Value::StructTypeValue(struct_type) => {
            let descriptor = struct_type.properties.get(&access.property).ok_or_else(|| SemError::UnknownStructField {
                struct_name: struct_type.name.as_str().to_string(),
                field: access.property.as_str().to_string(),
                span: access.span,
            })?;
            if descriptor.read_only {
                return Err(SemError::AssignToReadOnlyField {
                    field: access.property.as_str().to_string(),
                    span: access.span,
                });
            }
            struct_type.statics.borrow_mut().insert(access.property, value.clone());
            Ok(value)
        }
        other => Err(SemError::UnknownStructField {
            struct_name: other.type_tag().describe(),
            field: access.property.as_str().to_string(),
            span: access.span,
        }),
    }
}

fn eval_call(call: &FunctionCallExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    let callee = eval(&call.callee, env, ctx)?;
    let func = match callee {
        Value::Function(f) => f,
        other => {
            return Err(SemError::Undeclared { name: other.type_tag().describe(), span: call.span });
        }
    };

    tracing::trace!(name = ?func.name.map(|n| n.as_str()), arity = func.params.len(), "resolving call");

    if call.args.len() != func.params.len() {
        return Err(SemError::ArityMismatch { expected: func.params.len(), found: call.args.len(), span: call.span });
    }

    let mut args = Vec::with_capacity(call.args.len());
    for (index, (arg_expr, param)) in call.args.iter().zip(func.params.iter()).enumerate() {
        let value = eval(arg_expr, env, ctx)?;
        type_check::check(&param.ty, &value, arg_expr.span()).map_err(|e| match e {
            SemError::TypeMismatch { message, span } => SemError::ArgumentTypeMismatch {
                index,
                function: func.name.map(|n| n.as_str().to_string()).unwrap_or_else(|| "<anonymous>".to_string()),
                message,
                span,
            },
            other => other,
        })?;
        args.push(value);
    }

    let _guard = ctx.enter_call(call.span)?;
    let call_env = func.captured_env.child();
    if let Some(receiver) = &func.receiver {
        call_env.declare_variable(quillc_util::Symbol::intern("self"), (**receiver).clone(), false, call.span)?;
    }
    for (param, value) in func.params.iter().zip(args.into_iter()) {
        call_env.declare_variable(param.name, value, false, call.span)?;
    }

    match stmt_eval::eval_block(&func.body, &call_env, ctx)? {
        stmt_eval::Flow::Return(value) => Ok(value),
        stmt_eval::Flow::Normal(_) => {
            if matches!(func.return_type, quillc_ast::TypeRef::Void(_)) {
                Ok(Value::Void)
            } else {
                Err(SemError::MissingReturn {
                    function: func.name.map(|n| n.as_str().to_string()).unwrap_or_else(|| "<anonymous>".to_string()),
                    return_type: func.return_type.describe(),
                    span: func.body.span,
                })
            }
        }
        stmt_eval::Flow::Break => Err(SemError::BreakOutsideLoop { span: func.body.span }),
        stmt_eval::Flow::Continue => Err(SemError::ContinueOutsideLoop { span: func.body.span }),
    }
}

fn eval_property_access(access: &StructPropertyAccessExpr, env: &EnvRef, ctx: &Ctx) -> SemResult<Value> {
    if let Expr::Identifier(id) = access.object.as_ref() {
        if env.get_value(id.name, id.span).is_err() {
            if let Some(struct_type) = env.get_struct(id.name) {
                return resolve_static_member(&struct_type, access.property, access.span);
            }
        }
    }

    let object = eval(&access.object, env, ctx)?;
    match object {
        Value::StructInstance { struct_type, fields } => {
            if let Some(value) = fields.borrow().get(&access.property) {
                return Ok(value.clone());
            }
            if let Some(method) = struct_type.methods.get(&access.property) {
                let receiver = Value::StructInstance { struct_type: struct_type.clone(), fields: fields.clone() };
                return Ok(make_bound_method(access.property, method, Some(receiver)));
            }
            Err(SemError::UnknownStructField {
                struct_name: struct_type.name.as_str().to_string(),
                field: access.property.as_str().to_string(),
                span: access.span,
            })
        }
        Value::StructTypeValue(struct_type) => resolve_static_member(&struct_type, access.property, access.span),
        other => Err(SemError::UnknownStructField {
            struct_name: other.type_tag().describe(),
            field: access.property.as_str().to_string(),
            span: access.span,
        }),
    }
}

fn resolve_static_member(struct_type: &Rc<crate::value::StructType>, property: quillc_util::Symbol, span: Span) -> SemResult<Value> {
    if let Some(method) = struct_type.methods.get(&property) {
        if method.is_static {
            return Ok(make_bound_method(property, method, None));
        }
    }
    if let Some(descriptor) = struct_type.properties.get(&property) {
        if descriptor.is_static {
            return Ok(struct_type
                .statics
                .borrow()
                .get(&property)
                .cloned()
                .unwrap_or_else(|| Value::default_for(&descriptor.ty)));
        }
    }
    Err(SemError::UnknownStructField {
        struct_name: struct_type.name.as_str().to_string(),
        field: property.as_str().to_string(),
        span,
    })
}

fn make_bound_method(
    method_name: quillc_util::Symbol,
    method: &crate::value::MethodDescriptor,
    receiver: Option<Value>,
) -> Value {
    Value::Function(Rc::new(FunctionValue {
        name: Some(method_name),
        params: method.params.clone(),
        return_type: method.return_type.clone(),
        body: method.body.clone(),
        captured_env: method.captured_env.clone(),
        receiver: receiver.map(Box::new),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SemanticConfig;
    use crate::env::{EnvRef, ParserHandle};
    use quillc_ast::{BooleanLiteralExpr, NumericLiteralExpr};
    use quillc_util::diagnostic::Handler;
    use quillc_util::{FileId, Symbol};

    fn span() -> Span {
        Span::new(0, 1, 1, 1, FileId(0))
    }

    fn fresh_env() -> EnvRef {
        EnvRef::new(None, Rc::new(ParserHandle::synthetic()))
    }

    fn num_lit(lexeme: &str) -> Expr {
        Expr::NumericLiteral(NumericLiteralExpr { lexeme: lexeme.to_string(), class: NumericClass::Integer, span: span() })
    }

    #[test]
    fn integer_addition_widens_to_max_bits() {
        let handler = Handler::new();
        let config = SemanticConfig::default();
        let ctx = Ctx::new(&handler, &config);
        let env = fresh_env();
        let expr = Expr::Binary(BinaryExpr {
            left: Box::new(num_lit("5")),
            op: BinOp::Add,
            right: Box::new(num_lit("7")),
            span: span(),
        });
        let v = eval(&expr, &env, &ctx).unwrap();
        match v {
            Value::Integer { value, bits, signed } => {
                assert_eq!(value, 12);
                assert_eq!(bits, quillc_ast::IntWidth::W32);
                assert!(signed);
            }
            _ => panic!("expected integer"),
        }
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let handler = Handler::new();
        let config = SemanticConfig::default();
        let ctx = Ctx::new(&handler, &config);
        let env = fresh_env();
        let expr = Expr::Binary(BinaryExpr {
            left: Box::new(num_lit("10")),
            op: BinOp::Div,
            right: Box::new(num_lit("0")),
            span: span(),
        });
        assert!(matches!(eval(&expr, &env, &ctx), Err(SemError::DivisionByZero { .. })));
    }

    #[test]
    fn string_concatenation() {
        let handler = Handler::new();
        let config = SemanticConfig::default();
        let ctx = Ctx::new(&handler, &config);
        let env = fresh_env();
        let expr = Expr::Binary(BinaryExpr {
            left: Box::new(Expr::StringLiteral(quillc_ast::StringLiteralExpr { value: "foo".to_string(), span: span() })),
            op: BinOp::Add,
            right: Box::new(Expr::StringLiteral(quillc_ast::StringLiteralExpr { value: "bar".to_string(), span: span() })),
            span: span(),
        });
        match eval(&expr, &env, &ctx).unwrap() {
            Value::String(s) => assert_eq!(&*s, "foobar"),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn string_subtraction_is_unsupported() {
        let handler = Handler::new();
        let config = SemanticConfig::default();
        let ctx = Ctx::new(&handler, &config);
        let env = fresh_env();
        let expr = Expr::Binary(BinaryExpr {
            left: Box::new(Expr::StringLiteral(quillc_ast::StringLiteralExpr { value: "foo".to_string(), span: span() })),
            op: BinOp::Sub,
            right: Box::new(Expr::StringLiteral(quillc_ast::StringLiteralExpr { value: "bar".to_string(), span: span() })),
            span: span(),
        });
        assert!(matches!(eval(&expr, &env, &ctx), Err(SemError::UnsupportedBinaryOp { .. })));
    }

    #[test]
    fn short_circuit_and_does_not_evaluate_right_side_effect() {
        let handler = Handler::new();
        let config = SemanticConfig::default();
        let ctx = Ctx::new(&handler, &config);
        let env = fresh_env();
        let counter = Symbol::intern("counter");
        env.declare_variable(counter, Value::Integer { value: 0, bits: quillc_ast::IntWidth::W32, signed: true }, false, span())
            .unwrap();

        // `false && (counter = 1)` must not run the assignment.
        let assign = Expr::Assignment(AssignmentExpr {
            target: Box::new(Expr::Identifier(quillc_ast::IdentifierExpr { name: counter, span: span() })),
            op: None,
            value: Box::new(num_lit("1")),
            span: span(),
        });
        let expr = Expr::Binary(BinaryExpr {
            left: Box::new(Expr::BooleanLiteral(BooleanLiteralExpr { value: false, span: span() })),
            op: BinOp::And,
            right: Box::new(assign),
            span: span(),
        });
        let result = eval(&expr, &env, &ctx).unwrap();
        assert!(matches!(result, Value::Boolean(false)));
        assert!(matches!(env.get_value(counter, span()).unwrap(), Value::Integer { value: 0, .. }));
    }

    #[test]
    fn mismatched_tags_equal_false_not_equal_true() {
        let handler = Handler::new();
        let config = SemanticConfig::default();
        let ctx = Ctx::new(&handler, &config);
        let env = fresh_env();
        let expr_eq = Expr::Binary(BinaryExpr {
            left: Box::new(num_lit("1")),
            op: BinOp::Eq,
            right: Box::new(Expr::BooleanLiteral(BooleanLiteralExpr { value: true, span: span() })),
            span: span(),
        });
        assert!(matches!(eval(&expr_eq, &env, &ctx).unwrap(), Value::Boolean(false)));
    }
}
