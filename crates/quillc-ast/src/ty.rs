//! Type references: the annotations that appear in source (`i32`, `f64[]`,
//! `Point`, ...) as opposed to the runtime [`Value`](quillc_sem::Value)
//! those annotations are checked against.

use quillc_util::{Span, Symbol};

/// Declared bit-width of an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Maps a raw bit count to a width, for parsers/tests constructing a
    /// `TypeRef` from a lexeme like `i32`. Returns `None` for any width
    /// outside `{8,16,32,64}`.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            _ => None,
        }
    }

    pub fn max(self, other: Self) -> Self {
        if self.bits() >= other.bits() {
            self
        } else {
            other
        }
    }
}

impl std::fmt::Display for IntWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Declared bit-width of a floating-point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::W32 => 32,
            FloatWidth::W64 => 64,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(FloatWidth::W32),
            64 => Some(FloatWidth::W64),
            _ => None,
        }
    }

    pub fn max(self, other: Self) -> Self {
        if self.bits() >= other.bits() {
            self
        } else {
            other
        }
    }
}

impl std::fmt::Display for FloatWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// A type annotation as written in source (or synthesized by the parser for
/// a declaration without one).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Integer { bits: IntWidth, signed: bool, span: Span },
    Float { bits: FloatWidth, span: Span },
    Bool(Span),
    String(Span),
    Char(Span),
    Null(Span),
    Void(Span),
    /// `size == 0` means "any length"; see the crate-level design notes on
    /// why that convention from the source is preserved.
    Array { element: Box<TypeRef>, size: u32, span: Span },
    UserDefined { name: Symbol, span: Span },
}

impl TypeRef {
    pub fn span(&self) -> Span {
        match self {
            TypeRef::Integer { span, .. }
            | TypeRef::Float { span, .. }
            | TypeRef::Bool(span)
            | TypeRef::String(span)
            | TypeRef::Char(span)
            | TypeRef::Null(span)
            | TypeRef::Void(span)
            | TypeRef::Array { span, .. }
            | TypeRef::UserDefined { span, .. } => *span,
        }
    }

    /// A human-readable rendering used in diagnostic messages (`'INTEGER'`,
    /// `'Point'`...).
    pub fn describe(&self) -> String {
        match self {
            TypeRef::Integer { .. } => "INTEGER".to_string(),
            TypeRef::Float { .. } => "FLOAT".to_string(),
            TypeRef::Bool(_) => "BOOL".to_string(),
            TypeRef::String(_) => "STRING".to_string(),
            TypeRef::Char(_) => "CHAR".to_string(),
            TypeRef::Null(_) => "NULL".to_string(),
            TypeRef::Void(_) => "VOID".to_string(),
            TypeRef::Array { element, size, .. } => {
                format!("{}[{}]", element.describe(), size)
            }
            TypeRef::UserDefined { name, .. } => name.as_str().to_string(),
        }
    }

    /// The declared bit-width, for types that carry one.
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            TypeRef::Integer { bits, .. } => Some(bits.bits()),
            TypeRef::Float { bits, .. } => Some(bits.bits()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_util::FileId;

    fn dummy_span() -> Span {
        Span::new(0, 1, 1, 1, FileId(0))
    }

    #[test]
    fn int_width_round_trips_bits() {
        assert_eq!(IntWidth::from_bits(32), Some(IntWidth::W32));
        assert_eq!(IntWidth::from_bits(7), None);
        assert_eq!(IntWidth::W8.bits(), 8);
    }

    #[test]
    fn max_picks_wider() {
        assert_eq!(IntWidth::W8.max(IntWidth::W32), IntWidth::W32);
        assert_eq!(FloatWidth::W64.max(FloatWidth::W32), FloatWidth::W64);
    }

    #[test]
    fn describe_integer_matches_spec_format() {
        let ty = TypeRef::Integer { bits: IntWidth::W32, signed: true, span: dummy_span() };
        assert_eq!(ty.describe(), "INTEGER");
    }

    #[test]
    fn describe_array_is_recursive() {
        let ty = TypeRef::Array {
            element: Box::new(TypeRef::Bool(dummy_span())),
            size: 3,
            span: dummy_span(),
        };
        assert_eq!(ty.describe(), "BOOL[3]");
    }
}
