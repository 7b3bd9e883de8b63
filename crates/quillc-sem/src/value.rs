//! The typed runtime value model (§3 "Typed Values"): the algebra of values
//! the evaluator produces, paired with a [`TypeTag`] used for compatibility
//! and equality checks that must ignore everything but the type identity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use quillc_ast::{BlockStmt, FloatWidth, IntWidth, Param, TypeRef};
use quillc_util::Symbol;

use crate::env::EnvRef;

/// A declared property on a [`StructType`], carrying its `static`/`public`/
/// `readonly` qualifiers.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_public: bool,
    pub read_only: bool,
}

/// A declared method on a [`StructType`].
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: BlockStmt,
    pub is_static: bool,
    pub is_public: bool,
    /// The scope the struct was declared in; a bound method call's captured
    /// environment descends from this one (plus the instance receiver).
    pub captured_env: EnvRef,
}

/// The struct-level type, shared by every instance of that struct.
#[derive(Debug)]
pub struct StructType {
    pub name: Symbol,
    pub properties: IndexMap<Symbol, PropertyDescriptor>,
    pub methods: IndexMap<Symbol, MethodDescriptor>,
    /// Values of `static` properties, stored once on the type rather than
    /// per-instance (§2b).
    pub statics: RefCell<IndexMap<Symbol, Value>>,
}

/// A function value: parameter list, return type, body, and the environment
/// active when it was declared (closures capture their declaring scope, per
/// the §3 invariant on `Function`).
#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub name: Option<Symbol>,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: BlockStmt,
    pub captured_env: EnvRef,
    /// Bound receiver for a method accessed through `StructPropertyAccess`;
    /// `None` for a plain function or a `static` method.
    pub receiver: Option<Box<Value>>,
}

/// A type tag: the part of a [`Value`] compared for type compatibility,
/// independent of the carried payload. Two integers of different
/// bit-width/signedness are different tags even though both are
/// `Value::Integer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Integer { bits: IntWidth, signed: bool },
    Float { bits: FloatWidth },
    Bool,
    String,
    Char,
    Null,
    Void,
    Function,
    StructType,
    StructInstance { name: Symbol },
    Array { element: Box<TypeTag>, size: u32 },
}

impl TypeTag {
    /// Rendering used in diagnostic messages (`'INTEGER'`, `'BOOL'`...),
    /// matching §4.4's `"cannot assign value of type 'T_actual' to
    /// 'T_declared'"` format.
    pub fn describe(&self) -> String {
        match self {
            TypeTag::Integer { .. } => "INTEGER".to_string(),
            TypeTag::Float { .. } => "FLOAT".to_string(),
            TypeTag::Bool => "BOOL".to_string(),
            TypeTag::String => "STRING".to_string(),
            TypeTag::Char => "CHAR".to_string(),
            TypeTag::Null => "NULL".to_string(),
            TypeTag::Void => "VOID".to_string(),
            TypeTag::Function => "FUNCTION".to_string(),
            TypeTag::StructType => "STRUCT_TYPE".to_string(),
            TypeTag::StructInstance { name } => name.as_str().to_string(),
            TypeTag::Array { element, size } => format!("{}[{}]", element.describe(), size),
        }
    }

    pub fn bit_width(&self) -> Option<u32> {
        match self {
            TypeTag::Integer { bits, .. } => Some(bits.bits()),
            TypeTag::Float { bits } => Some(bits.bits()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A runtime value produced by the Expression Evaluator.
#[derive(Debug, Clone)]
pub enum Value {
    Integer { value: i64, bits: IntWidth, signed: bool },
    Float { value: f64, bits: FloatWidth },
    Boolean(bool),
    String(Rc<str>),
    Character(char),
    Null,
    Void,
    Function(Rc<FunctionValue>),
    StructTypeValue(Rc<StructType>),
    StructInstance {
        struct_type: Rc<StructType>,
        fields: Rc<RefCell<IndexMap<Symbol, Value>>>,
    },
    Array {
        element_type: Box<TypeTag>,
        elements: Rc<RefCell<Vec<Value>>>,
    },
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Integer { bits, signed, .. } => TypeTag::Integer { bits: *bits, signed: *signed },
            Value::Float { bits, .. } => TypeTag::Float { bits: *bits },
            Value::Boolean(_) => TypeTag::Bool,
            Value::String(_) => TypeTag::String,
            Value::Character(_) => TypeTag::Char,
            Value::Null => TypeTag::Null,
            Value::Void => TypeTag::Void,
            Value::Function(_) => TypeTag::Function,
            Value::StructTypeValue(_) => TypeTag::StructType,
            Value::StructInstance { struct_type, .. } => TypeTag::StructInstance { name: struct_type.name },
            Value::Array { element_type, elements } => TypeTag::Array {
                element: element_type.clone(),
                size: elements.borrow().len() as u32,
            },
        }
    }

    /// IsTruthy (§4.2 Logical operators, §GLOSSARY): non-null, non-zero,
    /// non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer { value, .. } => *value != 0,
            Value::Float { value, .. } => *value != 0.0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Character(c) => *c != '\0',
            Value::Null => false,
            Value::Void => false,
            Value::Function(_) | Value::StructTypeValue(_) | Value::StructInstance { .. } | Value::Array { .. } => true,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer { .. } | Value::Float { .. })
    }

    /// Constructs a default (zero/empty) value for a declared type, used
    /// when a `VariableDecl` has no initializer.
    pub fn default_for(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Integer { bits, signed, .. } => Value::Integer { value: 0, bits: *bits, signed: *signed },
            TypeRef::Float { bits, .. } => Value::Float { value: 0.0, bits: *bits },
            TypeRef::Bool(_) => Value::Boolean(false),
            TypeRef::String(_) => Value::String(Rc::from("")),
            TypeRef::Char(_) => Value::Character('\0'),
            TypeRef::Null(_) => Value::Null,
            TypeRef::Void(_) => Value::Void,
            TypeRef::Array { .. } => Value::Null,
            TypeRef::UserDefined { .. } => Value::Null,
        }
    }
}
