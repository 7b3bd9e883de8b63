//! quillc-util - Core Utilities and Foundation Types
//!
//! Fundamental utilities and types that form the foundation of the quillc
//! semantic-analysis toolchain: string interning, source positions, the
//! diagnostic model, typed-index plumbing, and the crate's structured error
//! enums. Every other crate in this workspace builds on this one.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{ColorConfig, Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, LabelStyle, Level, SourceSnippet};
pub use error::{DiagnosticError, DiagnosticResult, IndexVecError, IndexVecResult, SourceMapError, SourceMapResult, SymbolError, SymbolResult};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

// Re-export commonly used types from third-party crates, as the rest of the
// workspace expects to find them here rather than re-declaring the dependency.
pub use rustc_hash::{FxHashMap, FxHashSet};
