use std::fmt;

use serde::Serialize;

use styler_common::span::Span;

/// Severity of a violation. The `Ord` derivation follows declaration
/// order, so `Error > Warning > Info` agrees with the explicit weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Numeric weight for scoring: `Error = 10`, `Warning = 5`, `Info = 1`.
    pub fn weight(self) -> u32 {
        match self {
            Severity::Error => 10,
            Severity::Warning => 5,
            Severity::Info => 1,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A proposed replacement for a source range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub range: Span,
    pub replacement: String,
}

/// One rule finding: a nonconforming region, optionally with a proposed
/// edit. Edits from one rule pass never overlap; the engine enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: String,
    pub range: Span,
    pub severity: Severity,
    pub message: String,
    pub edit: Option<Edit>,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        range: Span,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            range,
            severity,
            message: message.into(),
            edit: None,
        }
    }

    pub fn with_edit(mut self, edit: Edit) -> Self {
        self.edit = Some(edit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_match_the_contract() {
        assert_eq!(Severity::Error.weight(), 10);
        assert_eq!(Severity::Warning.weight(), 5);
        assert_eq!(Severity::Info.weight(), 1);
    }

    #[test]
    fn ordering_agrees_with_weights() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        let mut severities = [Severity::Warning, Severity::Error, Severity::Info];
        severities.sort();
        assert_eq!(
            severities,
            [Severity::Info, Severity::Warning, Severity::Error]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Info.to_string(), "INFO");
    }

    #[test]
    fn violation_serializes_for_reporters() {
        let violation = Violation::new("indentation", Span::new(4, 8), Severity::Warning, "off");
        let json = serde_json::to_string(&violation).unwrap();
        assert!(json.contains(r#""severity":"Warning""#));
        assert!(json.contains(r#""rule_id":"indentation""#));
    }

    #[test]
    fn violation_builder() {
        let violation = Violation::new("indentation", Span::new(4, 8), Severity::Warning, "off")
            .with_edit(Edit {
                range: Span::new(4, 8),
                replacement: "    ".to_string(),
            });
        assert_eq!(violation.rule_id, "indentation");
        assert!(violation.edit.is_some());
    }
}
