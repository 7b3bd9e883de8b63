//! `SemError`: the structured error enum covering every way semantic
//! analysis can fail. Every fallible Environment/Checker/Evaluator operation
//! returns `Result<T, SemError>`; the public entry points additionally
//! report each one to a [`quillc_util::diagnostic::Handler`] before
//! propagating it, so embedders can either inspect `Handler::has_errors` or
//! react to the returned error directly.

use quillc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
use quillc_util::Span;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SemError {
    // -- lexical/parser-supplied --
    #[error("malformed character literal '{lexeme}'")]
    MalformedCharLiteral { lexeme: String, span: Span },

    #[error("numeric literal '{lexeme}' does not fit in a {bits}-bit integer (signed: {signed})")]
    NumericOverflow { lexeme: String, bits: u32, signed: bool, span: Span },

    // -- name resolution --
    #[error("undeclared identifier '{name}'")]
    Undeclared { name: String, span: Span },

    #[error("'{name}' is already declared in this scope")]
    Redeclared { name: String, span: Span },

    #[error("'{name}' is a reserved identifier")]
    ReservedIdentifier { name: String, span: Span },

    // -- mutability --
    #[error("cannot assign to constant '{name}'")]
    AssignToConstant { name: String, span: Span },

    #[error("invalid assignment target")]
    InvalidAssignmentTarget { span: Span },

    #[error("cannot assign to read-only field '{field}'")]
    AssignToReadOnlyField { field: String, span: Span },

    // -- type --
    #[error("{message}")]
    TypeMismatch { message: String, span: Span },

    #[error("argument {index} to '{function}': {message}")]
    ArgumentTypeMismatch { index: usize, function: String, message: String, span: Span },

    #[error("unknown field '{field}' on struct '{struct_name}'")]
    UnknownStructField { struct_name: String, field: String, span: Span },

    #[error("missing field '{field}' for struct '{struct_name}'")]
    MissingStructField { struct_name: String, field: String, span: Span },

    #[error("cannot compare values of type '{left}' and '{right}' with '{op}'")]
    IncomparableTypes { left: String, right: String, op: String, span: Span },

    #[error("invalid operand of type '{operand_type}' for unary '{op}'")]
    InvalidUnaryOperand { operand_type: String, op: String, span: Span },

    #[error("unsupported binary operator '{op}' for types '{left}' and '{right}'")]
    UnsupportedBinaryOp { left: String, right: String, op: String, span: Span },

    #[error("struct '{struct_name}' does not implement trait '{trait_name}': method '{method}' {reason}")]
    TraitMethodMismatch { struct_name: String, trait_name: String, method: String, reason: String, span: Span },

    // -- arithmetic --
    #[error("division by zero")]
    DivisionByZero { span: Span },

    // -- control --
    #[error("expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize, span: Span },

    #[error("function '{function}' declared to return '{return_type}' but its body completes without a return")]
    MissingReturn { function: String, return_type: String, span: Span },

    #[error("'break' outside of a loop or switch")]
    BreakOutsideLoop { span: Span },

    #[error("'continue' outside of a loop")]
    ContinueOutsideLoop { span: Span },

    #[error("'return' outside of a function")]
    ReturnOutsideFunction { span: Span },

    // -- resource limits --
    #[error("call depth exceeded maximum of {limit}")]
    CallDepthExceeded { limit: usize, span: Span },

    #[error("loop exceeded maximum of {limit} iterations")]
    LoopIterationLimitExceeded { limit: usize, span: Span },

    // -- internal --
    #[error("unimplemented AST variant: {what}")]
    Unimplemented { what: String, span: Span },
}

impl SemError {
    pub fn span(&self) -> Span {
        match self {
            SemError::MalformedCharLiteral { span, .. }
            | SemError::NumericOverflow { span, .. }
            | SemError::Undeclared { span, .. }
            | SemError::Redeclared { span, .. }
            | SemError::ReservedIdentifier { span, .. }
            | SemError::AssignToConstant { span, .. }
            | SemError::InvalidAssignmentTarget { span, .. }
            | SemError::AssignToReadOnlyField { span, .. }
            | SemError::TypeMismatch { span, .. }
            | SemError::ArgumentTypeMismatch { span, .. }
            | SemError::UnknownStructField { span, .. }
            | SemError::MissingStructField { span, .. }
            | SemError::IncomparableTypes { span, .. }
            | SemError::InvalidUnaryOperand { span, .. }
            | SemError::UnsupportedBinaryOp { span, .. }
            | SemError::TraitMethodMismatch { span, .. }
            | SemError::DivisionByZero { span }
            | SemError::ArityMismatch { span, .. }
            | SemError::MissingReturn { span, .. }
            | SemError::BreakOutsideLoop { span }
            | SemError::ContinueOutsideLoop { span }
            | SemError::ReturnOutsideFunction { span }
            | SemError::CallDepthExceeded { span, .. }
            | SemError::LoopIterationLimitExceeded { span, .. }
            | SemError::Unimplemented { span, .. } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            SemError::MalformedCharLiteral { .. } => DiagnosticCode::E_MALFORMED_CHAR_LITERAL,
            SemError::NumericOverflow { .. } => DiagnosticCode::E_NUMERIC_OVERFLOW,
            SemError::Undeclared { .. } => DiagnosticCode::E_UNDECLARED,
            SemError::Redeclared { .. } => DiagnosticCode::E_REDECLARED,
            SemError::ReservedIdentifier { .. } => DiagnosticCode::E_RESERVED_IDENTIFIER,
            SemError::AssignToConstant { .. } => DiagnosticCode::E_ASSIGN_TO_CONSTANT,
            SemError::InvalidAssignmentTarget { .. } => DiagnosticCode::E_INVALID_ASSIGNMENT_TARGET,
            SemError::AssignToReadOnlyField { .. } => DiagnosticCode::E_ASSIGN_TO_READONLY_FIELD,
            SemError::TypeMismatch { .. } => DiagnosticCode::E_TYPE_MISMATCH,
            SemError::ArgumentTypeMismatch { .. } => DiagnosticCode::E_ARGUMENT_TYPE_MISMATCH,
            SemError::UnknownStructField { .. } => DiagnosticCode::E_UNKNOWN_STRUCT_FIELD,
            SemError::MissingStructField { .. } => DiagnosticCode::E_MISSING_STRUCT_FIELD,
            SemError::IncomparableTypes { .. } => DiagnosticCode::E_INCOMPARABLE_TYPES,
            SemError::InvalidUnaryOperand { .. } => DiagnosticCode::E_INVALID_UNARY_OPERAND,
            SemError::UnsupportedBinaryOp { .. } => DiagnosticCode::E_UNSUPPORTED_BINARY_OP,
            SemError::TraitMethodMismatch { .. } => DiagnosticCode::E_TRAIT_METHOD_MISMATCH,
            SemError::DivisionByZero { .. } => DiagnosticCode::E_DIVISION_BY_ZERO,
            SemError::ArityMismatch { .. } => DiagnosticCode::E_ARITY_MISMATCH,
            SemError::MissingReturn { .. } => DiagnosticCode::E_MISSING_RETURN,
            SemError::BreakOutsideLoop { .. } => DiagnosticCode::E_BREAK_OUTSIDE_LOOP,
            SemError::ContinueOutsideLoop { .. } => DiagnosticCode::E_CONTINUE_OUTSIDE_LOOP,
            SemError::ReturnOutsideFunction { .. } => DiagnosticCode::E_RETURN_OUTSIDE_FUNCTION,
            SemError::CallDepthExceeded { .. } => DiagnosticCode::E_CALL_DEPTH_EXCEEDED,
            SemError::LoopIterationLimitExceeded { .. } => DiagnosticCode::E_LOOP_ITERATION_LIMIT_EXCEEDED,
            SemError::Unimplemented { .. } => DiagnosticCode::E_UNIMPLEMENTED,
        }
    }

    /// Reports this error to `handler` at its span. Every diagnostic is
    /// reported immediately at the most specific source span available.
    pub fn report(&self, handler: &Handler) {
        DiagnosticBuilder::error(self.to_string())
            .code(self.code())
            .span(self.span())
            .emit(handler);
        tracing::debug!(code = %self.code(), span = ?self.span(), "reported diagnostic");
    }
}

pub type SemResult<T> = std::result::Result<T, SemError>;
