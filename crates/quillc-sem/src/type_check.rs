//! The Type Compatibility Checker (§4.4): compares an annotated
//! [`TypeRef`] against a produced [`Value`], including integer/float
//! bit-width.

use quillc_ast::TypeRef;
use quillc_util::Span;

use crate::error::{SemError, SemResult};
use crate::value::{TypeTag, Value};

fn format_core(actual_desc: &str, declared_desc: &str, actual_bits: Option<u32>, declared_bits: Option<u32>) -> String {
    let base = format!("cannot assign value of type '{actual_desc}' to '{declared_desc}'");
    match (actual_bits, declared_bits) {
        (Some(a), Some(d)) if actual_desc == declared_desc && a != d => {
            format!("{base} of size {a} to {} of size {d}", declared_desc.to_lowercase())
        }
        _ => base,
    }
}

/// Used when both sides are already runtime [`TypeTag`]s (e.g.
/// `Environment::assign_variable` comparing the new value's tag against the
/// existing binding's tag).
pub fn format_tag_mismatch(actual: &TypeTag, declared: &TypeTag) -> String {
    format_core(&actual.describe(), &declared.describe(), actual.bit_width(), declared.bit_width())
}

fn format_type_mismatch(actual: &TypeTag, declared: &TypeRef) -> String {
    format_core(&actual.describe(), &declared.describe(), actual.bit_width(), declared.bit_width())
}

/// Whether a value's array element type matches a declared element type
/// reference. Array elements carry a [`TypeTag`] (the runtime tag), not
/// another `TypeRef`, so this recurses on tags/refs rather than values.
fn element_type_matches(declared: &TypeRef, actual: &TypeTag) -> bool {
    match (declared, actual) {
        (TypeRef::Integer { bits, signed, .. }, TypeTag::Integer { bits: ab, signed: asig }) => {
            bits == ab && signed == asig
        }
        (TypeRef::Float { bits, .. }, TypeTag::Float { bits: ab }) => bits == ab,
        (TypeRef::Bool(_), TypeTag::Bool) => true,
        (TypeRef::String(_), TypeTag::String) => true,
        (TypeRef::Char(_), TypeTag::Char) => true,
        (TypeRef::Null(_), TypeTag::Null) => true,
        (TypeRef::Void(_), TypeTag::Void) => true,
        (TypeRef::UserDefined { name, .. }, TypeTag::StructInstance { name: actual_name }) => name == actual_name,
        (TypeRef::Array { element, size }, TypeTag::Array { element: actual_elem, size: actual_size }) => {
            element_type_matches(element, actual_elem) && array_len_ok(*size, *actual_size)
        }
        _ => false,
    }
}

/// `size == 0` means "any length"; otherwise the lengths must match exactly
/// (§4.4 rule table, §9 Open Question (c)).
fn array_len_ok(declared_size: u32, actual_len: u32) -> bool {
    declared_size == 0 || declared_size == actual_len
}

/// Structural equality of two declared types, ignoring span. Used by
/// `Implements` well-formedness checking (§2b) to compare a struct method's
/// signature against its trait's.
pub fn type_refs_equal(a: &TypeRef, b: &TypeRef) -> bool {
    match (a, b) {
        (TypeRef::Integer { bits: ab, signed: asig, .. }, TypeRef::Integer { bits: bb, signed: bsig, .. }) => {
            ab == bb && asig == bsig
        }
        (TypeRef::Float { bits: ab, .. }, TypeRef::Float { bits: bb, .. }) => ab == bb,
        (TypeRef::Bool(_), TypeRef::Bool(_)) => true,
        (TypeRef::String(_), TypeRef::String(_)) => true,
        (TypeRef::Char(_), TypeRef::Char(_)) => true,
        (TypeRef::Null(_), TypeRef::Null(_)) => true,
        (TypeRef::Void(_), TypeRef::Void(_)) => true,
        (TypeRef::UserDefined { name: an, .. }, TypeRef::UserDefined { name: bn, .. }) => an == bn,
        (TypeRef::Array { element: ae, size: asz }, TypeRef::Array { element: be, size: bsz }) => {
            asz == bsz && type_refs_equal(ae, be)
        }
        _ => false,
    }
}

/// Checks `value` against the annotated type `declared`, reporting
/// `TypeMismatch` (with the §4.4 message format) on failure.
pub fn check(declared: &TypeRef, value: &Value, span: Span) -> SemResult<()> {
    let ok = match (declared, value) {
        (TypeRef::Integer { bits, signed, .. }, Value::Integer { bits: vb, signed: vs, .. }) => {
            bits == vb && signed == vs
        }
        (TypeRef::Float { bits, .. }, Value::Float { bits: vb, .. }) => bits == vb,
        (TypeRef::Bool(_), Value::Boolean(_)) => true,
        (TypeRef::String(_), Value::String(_)) => true,
        (TypeRef::Char(_), Value::Character(_)) => true,
        (TypeRef::Null(_), Value::Null) => true,
        (TypeRef::Void(_), Value::Void) => true,
        (TypeRef::Array { element, size }, Value::Array { element_type, elements }) => {
            element_type_matches(element, element_type) && array_len_ok(*size, elements.borrow().len() as u32)
        }
        (TypeRef::UserDefined { name, .. }, Value::StructInstance { struct_type, .. }) => {
            *name == struct_type.name
        }
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(SemError::TypeMismatch {
            message: format_type_mismatch(&value.type_tag(), declared),
            span,
        })
    }
}
