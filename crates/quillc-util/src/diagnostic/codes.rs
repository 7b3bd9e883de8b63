//! Stable diagnostic codes (`E0001`, `W0001`, ...) so tooling and tests can
//! key off a code rather than matching on message text.

/// A diagnostic code: a short prefix plus a number, e.g. `E0002`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    prefix: &'static str,
    number: u32,
}

impl DiagnosticCode {
    pub const fn new(number: u32, _slug: &'static str) -> Self {
        Self { prefix: "E", number }
    }

    pub const fn with_prefix(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // Name resolution
    pub const E_UNDECLARED: DiagnosticCode = DiagnosticCode::with_prefix("E", 1001);
    pub const E_REDECLARED: DiagnosticCode = DiagnosticCode::with_prefix("E", 1002);
    pub const E_RESERVED_IDENTIFIER: DiagnosticCode = DiagnosticCode::with_prefix("E", 1003);

    // Mutability
    pub const E_ASSIGN_TO_CONSTANT: DiagnosticCode = DiagnosticCode::with_prefix("E", 1101);
    pub const E_INVALID_ASSIGNMENT_TARGET: DiagnosticCode = DiagnosticCode::with_prefix("E", 1102);
    pub const E_ASSIGN_TO_READONLY_FIELD: DiagnosticCode = DiagnosticCode::with_prefix("E", 1103);

    // Type
    pub const E_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::with_prefix("E", 1201);
    pub const E_ARGUMENT_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::with_prefix("E", 1202);
    pub const E_UNKNOWN_STRUCT_FIELD: DiagnosticCode = DiagnosticCode::with_prefix("E", 1203);
    pub const E_MISSING_STRUCT_FIELD: DiagnosticCode = DiagnosticCode::with_prefix("E", 1204);
    pub const E_INCOMPARABLE_TYPES: DiagnosticCode = DiagnosticCode::with_prefix("E", 1205);
    pub const E_INVALID_UNARY_OPERAND: DiagnosticCode = DiagnosticCode::with_prefix("E", 1206);
    pub const E_UNSUPPORTED_BINARY_OP: DiagnosticCode = DiagnosticCode::with_prefix("E", 1207);
    pub const E_TRAIT_METHOD_MISMATCH: DiagnosticCode = DiagnosticCode::with_prefix("E", 1208);

    // Arithmetic
    pub const E_DIVISION_BY_ZERO: DiagnosticCode = DiagnosticCode::with_prefix("E", 1301);

    // Control
    pub const E_ARITY_MISMATCH: DiagnosticCode = DiagnosticCode::with_prefix("E", 1401);
    pub const E_MISSING_RETURN: DiagnosticCode = DiagnosticCode::with_prefix("E", 1402);
    pub const E_BREAK_OUTSIDE_LOOP: DiagnosticCode = DiagnosticCode::with_prefix("E", 1403);
    pub const E_CONTINUE_OUTSIDE_LOOP: DiagnosticCode = DiagnosticCode::with_prefix("E", 1404);
    pub const E_RETURN_OUTSIDE_FUNCTION: DiagnosticCode = DiagnosticCode::with_prefix("E", 1405);

    // Resource limits
    pub const E_CALL_DEPTH_EXCEEDED: DiagnosticCode = DiagnosticCode::with_prefix("E", 1501);
    pub const E_LOOP_ITERATION_LIMIT_EXCEEDED: DiagnosticCode = DiagnosticCode::with_prefix("E", 1502);

    // Lexical/parser-supplied
    pub const E_MALFORMED_CHAR_LITERAL: DiagnosticCode = DiagnosticCode::with_prefix("E", 1601);
    pub const E_NUMERIC_OVERFLOW: DiagnosticCode = DiagnosticCode::with_prefix("E", 1602);

    // Internal
    pub const E_UNIMPLEMENTED: DiagnosticCode = DiagnosticCode::with_prefix("E", 1901);
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
