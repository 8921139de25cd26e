use serde::Serialize;

/// Byte-offset span into source text. Start is inclusive, end is exclusive.
///
/// Byte offsets are the primary addressing unit everywhere in Styler; the
/// human-readable (line, column) form is derived on demand through a
/// [`LineIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// A zero-length span at the given offset. Used for synthesized nodes.
    pub fn empty_at(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether `other` lies entirely within `self`.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether `self` and `other` share at least one byte.
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A 1-based (line, column) source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        debug_assert!(line >= 1, "line is 1-based, got {line}");
        debug_assert!(column >= 1, "column is 1-based, got {column}");
        Self { line, column }
    }
}

/// Pre-computed index of line start offsets for byte-offset to line/column
/// conversion.
///
/// Built once per source file by scanning for `\n`; lookups are a binary
/// search over the recorded line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first byte of each line. The first entry is 0.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based [`SourcePosition`].
    ///
    /// Column is measured in bytes from the start of the line.
    pub fn position(&self, offset: u32) -> SourcePosition {
        let idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        SourcePosition {
            line: (idx as u32) + 1,
            column: offset - self.line_starts[idx] + 1,
        }
    }

    /// 1-based line number containing the given byte offset.
    pub fn line_of(&self, offset: u32) -> u32 {
        self.position(offset).line
    }

    /// Number of lines in the indexed source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
        assert_eq!(Span::empty_at(7), Span::new(7, 7));
    }

    #[test]
    fn span_merge_covers_both() {
        assert_eq!(Span::new(5, 10).merge(Span::new(8, 15)), Span::new(5, 15));
        assert_eq!(Span::new(8, 15).merge(Span::new(5, 10)), Span::new(5, 15));
    }

    #[test]
    fn span_containment() {
        let outer = Span::new(0, 20);
        assert!(outer.contains(Span::new(5, 10)));
        assert!(outer.contains(outer));
        assert!(!Span::new(5, 10).contains(outer));
    }

    #[test]
    fn span_overlap() {
        assert!(Span::new(0, 5).overlaps(Span::new(4, 8)));
        assert!(!Span::new(0, 5).overlaps(Span::new(5, 8)));
        assert!(!Span::new(0, 5).overlaps(Span::new(9, 12)));
    }

    #[test]
    fn span_serializes_to_json() {
        let json = serde_json::to_string(&Span::new(3, 9)).unwrap();
        assert_eq!(json, r#"{"start":3,"end":9}"#);
    }

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.position(0), SourcePosition::new(1, 1));
        assert_eq!(idx.position(4), SourcePosition::new(1, 5));
        assert_eq!(idx.line_count(), 1);
    }

    #[test]
    fn line_index_multiple_lines() {
        let idx = LineIndex::new("class A {\n    int x;\n}");
        assert_eq!(idx.position(0), SourcePosition::new(1, 1));
        // First byte after the first newline.
        assert_eq!(idx.position(10), SourcePosition::new(2, 1));
        // The 'i' of "int".
        assert_eq!(idx.position(14), SourcePosition::new(2, 5));
        // Closing brace on line 3.
        assert_eq!(idx.position(21), SourcePosition::new(3, 1));
    }

    #[test]
    fn line_index_offset_on_newline_stays_on_line() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.position(2), SourcePosition::new(1, 3));
        assert_eq!(idx.position(3), SourcePosition::new(2, 1));
    }
}
