//! Source positions: `FileId` and `Span`.

mod source_map;

pub use source_map::{SourceFile, SourceMap};

/// Identifies a source file registered with a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FileId(pub usize);

impl FileId {
    /// Placeholder file id for spans that don't come from real source text.
    pub const DUMMY: FileId = FileId(usize::MAX);

    pub fn new(index: usize) -> Self {
        FileId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A half-open byte range into a source file, plus the line/column of its start.
///
/// Every AST node carries one of these so diagnostics can always point at an
/// exact location regardless of how deep in the tree the failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    /// A span carrying no real position information, used for synthesized
    /// nodes and as a placeholder in tests that don't exercise diagnostics.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
        file_id: FileId::DUMMY,
    };

    pub fn new(start: u32, end: u32, line: u32, column: u32, file_id: FileId) -> Self {
        Self {
            start,
            end,
            line,
            column,
            file_id,
        }
    }

    pub fn with_file(start: u32, end: u32, line: u32, column: u32, file_id: FileId) -> Self {
        Self::new(start, end, line, column, file_id)
    }

    /// A zero-width span at a single point.
    pub fn point(offset: u32, line: u32, column: u32) -> Self {
        Self::new(offset, offset, line, column, FileId::DUMMY)
    }

    pub fn point_with_file(offset: u32, line: u32, column: u32, file_id: FileId) -> Self {
        Self::new(offset, offset, line, column, file_id)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: if self.start <= other.start { self.column } else { other.column },
            file_id: self.file_id,
        }
    }

    pub fn join(&self, other: &Span) -> Span {
        self.merge(other)
    }

    pub fn shrink(&self, by: u32) -> Span {
        Span {
            start: self.start + by,
            end: self.end.saturating_sub(by).max(self.start + by),
            ..*self
        }
    }

    pub fn expand(&self, by: u32) -> Span {
        Span {
            start: self.start.saturating_sub(by),
            end: self.end + by,
            ..*self
        }
    }

    pub fn with_file_id(&self, file_id: FileId) -> Span {
        Span { file_id, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_is_empty() {
        assert!(Span::DUMMY.is_empty());
    }

    #[test]
    fn point_is_zero_width() {
        let s = Span::point(5, 1, 6);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn contains_checks_half_open_range() {
        let s = Span::new(5, 10, 1, 1, FileId(0));
        assert!(s.contains(5));
        assert!(s.contains(9));
        assert!(!s.contains(10));
    }

    #[test]
    fn contains_span_checks_nesting() {
        let outer = Span::new(0, 20, 1, 1, FileId(0));
        let inner = Span::new(5, 10, 1, 6, FileId(0));
        assert!(outer.contains_span(&inner));
        assert!(!inner.contains_span(&outer));
    }

    #[test]
    fn merge_covers_both_spans() {
        let a = Span::new(5, 10, 1, 6, FileId(0));
        let b = Span::new(8, 15, 1, 9, FileId(0));
        let m = a.merge(&b);
        assert_eq!(m.start, 5);
        assert_eq!(m.end, 15);
    }

    #[test]
    fn with_file_id_preserves_offsets() {
        let s = Span::new(1, 2, 1, 2, FileId(0)).with_file_id(FileId(3));
        assert_eq!(s.file_id, FileId(3));
        assert_eq!(s.start, 1);
        assert_eq!(s.end, 2);
    }
}
