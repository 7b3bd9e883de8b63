//! Registered source files, for translating byte offsets to line/column and
//! extracting source excerpts for diagnostics.

use super::{FileId, Span};
use crate::error::{SourceMapError, SourceMapResult};
use std::sync::Arc;

/// A single registered source file.
pub struct SourceFile {
    pub id: FileId,
    pub name: String,
    pub content: Arc<str>,
    /// Byte offset of the start of each line (line_starts[0] == 0).
    pub line_starts: Arc<[usize]>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content: Arc<str> = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self {
            id,
            name: name.into(),
            content,
            line_starts: line_starts.into(),
        }
    }

    fn compute_line_starts(content: &str) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: usize) -> SourceMapResult<usize> {
        self.line_starts
            .get(line)
            .copied()
            .ok_or(SourceMapError::InvalidLineNumber {
                line,
                max_lines: self.line_count(),
            })
    }

    /// Translate a byte offset into a 0-based (line, column) pair.
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insertion) => insertion.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line, col)
    }

    pub fn line_at_offset(&self, offset: usize) -> usize {
        self.offset_to_line_col(offset).0
    }

    /// Text of a single (0-based) line, without its trailing newline.
    pub fn line_at(&self, line: usize) -> SourceMapResult<&str> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.content.len());
        Ok(self.content[start..end].trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Extract the source text covered by `span`.
    pub fn extract(&self, span: &Span) -> SourceMapResult<&str> {
        let (start, end) = (span.start as usize, span.end as usize);
        if start > end {
            return Err(SourceMapError::InvalidSpan { start, end });
        }
        if end > self.content.len() {
            return Err(SourceMapError::SpanOutOfBounds {
                file_len: self.content.len(),
                span_start: start,
                span_end: end,
            });
        }
        Ok(&self.content[start..end])
    }
}

/// All source files registered for a single analysis run.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> Arc<SourceFile> {
        let id = FileId::new(self.files.len());
        let file = Arc::new(SourceFile::new(id, name, content));
        self.files.push(file.clone());
        file
    }

    pub fn get(&self, id: FileId) -> Option<&Arc<SourceFile>> {
        self.files.get(id.index())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Format a span as `"<file>:<line>:<col>"`, 1-based, for user-facing output.
    pub fn format_span(&self, span: &Span) -> String {
        match self.get(span.file_id) {
            Some(file) => format!("{}:{}:{}", file.name, span.line + 1, span.column + 1),
            None => format!("<unknown>:{}:{}", span.line + 1, span.column + 1),
        }
    }
}
