use std::fmt;

use serde::Serialize;

use crate::span::SourcePosition;

/// A parse diagnostic with full location information.
///
/// Parse errors are collected during parsing rather than aborting, so a
/// single pass can report every problem it can recover from. The byte
/// `position` addresses the source directly; `line` and `column` are the
/// derived 1-based coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// Byte offset where the problem was detected.
    pub position: u32,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Human-readable description of what went wrong. Never empty.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(position: u32, pos: SourcePosition, message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "parse error message must not be empty");
        Self {
            position,
            line: pos.line,
            column: pos.column,
            message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParseError[line={}, column={}, position={}, message=\"{}\"]",
            self.line, self.column, self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_fields() {
        let err = ParseError::new(42, SourcePosition::new(3, 7), "expected `;`");
        assert_eq!(err.position, 42);
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 7);
        assert_eq!(err.message, "expected `;`");
    }

    #[test]
    fn parse_error_canonical_display() {
        let err = ParseError::new(10, SourcePosition::new(2, 5), "unexpected token");
        assert_eq!(
            err.to_string(),
            "ParseError[line=2, column=5, position=10, message=\"unexpected token\"]"
        );
    }
}
