//! The lexically nested symbol table (§3 "Environment", §4.1).
//!
//! Modeled as a tree of reference-counted scopes rather than an
//! arena-indexed `ScopeTree`/`RibId` used for static name *resolution*:
//! this evaluator's scopes are created and torn down as
//! control flow enters and leaves blocks/calls/loop iterations, and a
//! `Function` value must keep its declaring scope alive for as long as the
//! closure itself is reachable (§3 invariant, §9 design note). `Rc`/`Weak`
//! gives us exactly that lifetime without a GC.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use quillc_util::Symbol;

use crate::error::{SemError, SemResult};
use crate::value::{FunctionValue, StructType, Value};

/// Reserved identifiers that cannot be declared-over or assigned to
/// (§4.1 "Scope resolution policy").
const RESERVED_IDENTIFIERS: &[&str] = &["true", "false", "null"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_IDENTIFIERS.contains(&name)
}

/// A variable binding: its current value plus whether it was declared
/// `const`.
#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    is_constant: bool,
}

/// A trait descriptor: method name -> signature, used by `Implements`
/// well-formedness checking (§2b).
#[derive(Debug, Clone)]
pub struct TraitDescriptor {
    pub name: Symbol,
    pub methods: HashMap<Symbol, TraitMethodSig>,
}

#[derive(Debug, Clone)]
pub struct TraitMethodSig {
    pub params: Vec<quillc_ast::Param>,
    pub return_type: quillc_ast::TypeRef,
}

/// Supplies `file_path` and original source text for diagnostic excerpts
/// (§6 "Parser handle"). Stands in for the out-of-scope parser's own
/// context object.
#[derive(Debug, Clone)]
pub struct ParserHandle {
    pub file_path: String,
    pub source: Rc<str>,
}

impl ParserHandle {
    pub fn new(file_path: impl Into<String>, source: impl Into<Rc<str>>) -> Self {
        Self { file_path: file_path.into(), source: source.into() }
    }

    /// A handle with no real backing source, for synthesized/test ASTs that
    /// never exercise source-excerpt rendering.
    pub fn synthetic() -> Self {
        Self { file_path: "<synthetic>".to_string(), source: Rc::from("") }
    }
}

struct EnvironmentData {
    variables: HashMap<Symbol, Binding>,
    functions: HashMap<Symbol, Rc<FunctionValue>>,
    structs: HashMap<Symbol, Rc<StructType>>,
    traits: HashMap<Symbol, Rc<TraitDescriptor>>,
    parent: Option<Weak<RefCell<EnvironmentData>>>,
    parser_handle: Rc<ParserHandle>,
}

/// A scope node. Cheap to clone (an `Rc` bump); clones alias the same scope.
#[derive(Clone)]
pub struct EnvRef(Rc<RefCell<EnvironmentData>>);

impl EnvRef {
    /// Creates a new environment; `parent` is `None` only for the program's
    /// root scope (§3 "Lifecycle").
    pub fn new(parent: Option<&EnvRef>, parser_handle: Rc<ParserHandle>) -> Self {
        let data = EnvironmentData {
            variables: HashMap::new(),
            functions: HashMap::new(),
            structs: HashMap::new(),
            traits: HashMap::new(),
            parent: parent.map(|p| Rc::downgrade(&p.0)),
            parser_handle,
        };
        EnvRef(Rc::new(RefCell::new(data)))
    }

    /// Creates a child scope inheriting this environment's parser handle.
    pub fn child(&self) -> Self {
        tracing::trace!("entering scope");
        let handle = self.0.borrow().parser_handle.clone();
        EnvRef::new(Some(self), handle)
    }

    pub fn parser_handle(&self) -> Rc<ParserHandle> {
        self.0.borrow().parser_handle.clone()
    }

    fn parent(&self) -> Option<EnvRef> {
        self.0.borrow().parent.as_ref().and_then(|w| w.upgrade()).map(EnvRef)
    }

    /// Inserts a new binding in the *current* scope; fails with
    /// `Redeclared` if `name` already exists here (shadowing an outer scope
    /// is fine, §4.1).
    pub fn declare_variable(&self, name: Symbol, value: Value, is_constant: bool, span: quillc_util::Span) -> SemResult<Value> {
        let mut data = self.0.borrow_mut();
        if data.variables.contains_key(&name) {
            return Err(SemError::Redeclared { name: name.as_str().to_string(), span });
        }
        data.variables.insert(name, Binding { value: value.clone(), is_constant });
        tracing::trace!(%name, is_constant, "declared variable");
        Ok(value)
    }

    /// Searches from the current scope outward (§4.1 "assign_variable").
    pub fn assign_variable(&self, name: Symbol, value: Value, span: quillc_util::Span) -> SemResult<Value> {
        if is_reserved(name.as_str()) {
            return Err(SemError::ReservedIdentifier { name: name.as_str().to_string(), span });
        }
        let mut scope = self.clone();
        loop {
            {
                let mut data = scope.0.borrow_mut();
                if let Some(binding) = data.variables.get_mut(&name) {
                    if binding.is_constant {
                        return Err(SemError::AssignToConstant { name: name.as_str().to_string(), span });
                    }
                    if binding.value.type_tag() != value.type_tag() {
                        return Err(SemError::TypeMismatch {
                            message: crate::type_check::format_tag_mismatch(&value.type_tag(), &binding.value.type_tag()),
                            span,
                        });
                    }
                    binding.value = value.clone();
                    return Ok(value);
                }
            }
            match scope.parent() {
                Some(p) => scope = p,
                None => return Err(SemError::Undeclared { name: name.as_str().to_string(), span }),
            }
        }
    }

    /// Same search order as `assign_variable` (§4.1 "get_value").
    pub fn get_value(&self, name: Symbol, span: quillc_util::Span) -> SemResult<Value> {
        let mut scope = self.clone();
        loop {
            if let Some(binding) = scope.0.borrow().variables.get(&name) {
                return Ok(binding.value.clone());
            }
            match scope.parent() {
                Some(p) => scope = p,
                None => return Err(SemError::Undeclared { name: name.as_str().to_string(), span }),
            }
        }
    }

    pub fn declare_function(&self, name: Symbol, func: Rc<FunctionValue>, span: quillc_util::Span) -> SemResult<()> {
        let mut data = self.0.borrow_mut();
        if data.functions.contains_key(&name) {
            return Err(SemError::Redeclared { name: name.as_str().to_string(), span });
        }
        data.functions.insert(name, func);
        tracing::debug!(%name, "declared function");
        Ok(())
    }

    pub fn get_function(&self, name: Symbol) -> Option<Rc<FunctionValue>> {
        let mut scope = self.clone();
        loop {
            if let Some(f) = scope.0.borrow().functions.get(&name) {
                return Some(f.clone());
            }
            scope = scope.parent()?;
        }
    }

    pub fn declare_struct(&self, name: Symbol, ty: Rc<StructType>, span: quillc_util::Span) -> SemResult<()> {
        let mut data = self.0.borrow_mut();
        if data.structs.contains_key(&name) {
            return Err(SemError::Redeclared { name: name.as_str().to_string(), span });
        }
        data.structs.insert(name, ty);
        tracing::debug!(%name, "declared struct");
        Ok(())
    }

    /// Recursive upward lookup (§4.1 "has_struct").
    pub fn has_struct(&self, name: Symbol) -> bool {
        self.get_struct(name).is_some()
    }

    pub fn get_struct(&self, name: Symbol) -> Option<Rc<StructType>> {
        let mut scope = self.clone();
        loop {
            if let Some(s) = scope.0.borrow().structs.get(&name) {
                return Some(s.clone());
            }
            scope = scope.parent()?;
        }
    }

    pub fn declare_trait(&self, name: Symbol, descriptor: Rc<TraitDescriptor>, span: quillc_util::Span) -> SemResult<()> {
        let mut data = self.0.borrow_mut();
        if data.traits.contains_key(&name) {
            return Err(SemError::Redeclared { name: name.as_str().to_string(), span });
        }
        data.traits.insert(name, descriptor);
        Ok(())
    }

    pub fn get_trait(&self, name: Symbol) -> Option<Rc<TraitDescriptor>> {
        let mut scope = self.clone();
        loop {
            if let Some(t) = scope.0.borrow().traits.get(&name) {
                return Some(t.clone());
            }
            scope = scope.parent()?;
        }
    }
}
