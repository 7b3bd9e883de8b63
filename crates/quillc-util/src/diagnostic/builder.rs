//! Fluent construction of [`Diagnostic`] values.

use crate::span::Span;

use super::level::Level;
use super::{Diagnostic, DiagnosticCode, Handler};

/// An excerpt of source text attached to a diagnostic, with an optional label
/// pointing at the specific span within it.
#[derive(Debug, Clone)]
pub struct SourceSnippet {
    pub span: Span,
    pub text: String,
    pub label: Option<String>,
}

impl SourceSnippet {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self { span, text: text.into(), label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Builds up a [`Diagnostic`] one piece at a time, then either hands it back
/// or emits it straight into a [`Handler`].
///
/// ```ignore
/// DiagnosticBuilder::error("cannot assign value of type 'i64' to 'i32'")
///     .code(DiagnosticCode::E_TYPE_MISMATCH)
///     .span(span)
///     .help("change the declared type or cast the value")
///     .emit(handler);
/// ```
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    code: Option<DiagnosticCode>,
    span: Option<Span>,
    notes: Vec<String>,
    helps: Vec<String>,
    snippets: Vec<SourceSnippet>,
}

impl DiagnosticBuilder {
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

    pub fn bug(message: impl Into<String>) -> Self {
        Self::new(Level::Bug, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            code: self.code,
            span: self.span,
            notes: self.notes,
            helps: self.helps,
            snippets: self.snippets,
        }
    }

    /// Build and hand the diagnostic to `handler`.
    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn builder_assembles_all_fields() {
        let span = Span::new(0, 3, 0, 0, FileId(0));
        let diag = DiagnosticBuilder::error("bad thing")
            .code(DiagnosticCode::E_TYPE_MISMATCH)
            .span(span)
            .note("a note")
            .help("a help")
            .snippet(SourceSnippet::new(span, "abc").with_label("here"))
            .build();

        assert_eq!(diag.message, "bad thing");
        assert_eq!(diag.level, Level::Error);
        assert_eq!(diag.code, Some(DiagnosticCode::E_TYPE_MISMATCH));
        assert_eq!(diag.notes, vec!["a note".to_string()]);
        assert_eq!(diag.helps, vec!["a help".to_string()]);
        assert_eq!(diag.snippets.len(), 1);
    }

    #[test]
    fn emit_pushes_into_handler() {
        let handler = Handler::new();
        DiagnosticBuilder::warning("just fyi").emit(&handler);
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.error_count(), 0);
    }
}
