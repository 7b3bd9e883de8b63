//! The diagnostic model: a [`Diagnostic`] value, a fluent [`DiagnosticBuilder`]
//! to construct one, and a [`Handler`] that collects them for a single
//! analysis run.

mod builder;
mod codes;
mod level;

pub use builder::{DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;
pub use level::{ColorConfig, LabelStyle, Level};

use crate::span::Span;
use std::cell::RefCell;

/// A single error, warning, or informational note produced while analyzing a
/// program.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub code: Option<DiagnosticCode>,
    pub span: Option<Span>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub snippets: Vec<SourceSnippet>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            code: None,
            span: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }
}

/// Collects diagnostics raised over the course of one analysis run.
///
/// Cheap to share by reference: interior mutability means callers don't need
/// `&mut Handler` threaded through every evaluator function.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    panic_on_error: RefCell<bool>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: RefCell::new(false),
        }
    }

    /// A handler that panics as soon as an error-level diagnostic is emitted;
    /// useful in tests that want a hard failure at the first broken
    /// assertion rather than collecting everything.
    pub fn new_panicking() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: RefCell::new(true),
        }
    }

    #[deprecated(note = "use emit_diagnostic with DiagnosticBuilder::error instead")]
    pub fn error(&self, message: impl Into<String>) {
        self.emit_diagnostic(Diagnostic::error(message));
    }

    #[deprecated(note = "use emit_diagnostic with DiagnosticBuilder::warning instead")]
    pub fn warning(&self, message: impl Into<String>) {
        self.emit_diagnostic(Diagnostic::warning(message));
    }

    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        if diagnostic.level.is_error() && *self.panic_on_error.borrow() {
            panic!("{}: {}", diagnostic.level, diagnostic.message);
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn build_error(&self, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::error(message)
    }

    pub fn build_warning(&self, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::warning(message)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
