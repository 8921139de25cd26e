//! Library facade wiring the Styler pipeline end to end: lexer, parser,
//! arena, tree conversion, and the rule engine.
//!
//! The core is single-threaded per source file and exposes library calls
//! only; drivers supply configuration, parallelism across files, and
//! report formatting. Cancellation is cooperative through a [`Deadline`]
//! polled at coarse boundaries by every stage.

use std::fmt;
use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use styler_common::deadline::{Deadline, DeadlineExceeded};
use styler_common::diagnostics::ParseError;
use styler_common::version::LanguageVersion;
use styler_rules::{RuleConfig, RuleEngine, RuleError, Violation};
use styler_tree::{build_tree, ConvertError, Tree};

pub use styler_arena as arena;
pub use styler_common::deadline;
pub use styler_common::version;
pub use styler_lexer as lexer;
pub use styler_parser as parser;
pub use styler_rules as rules;
pub use styler_tree as tree;

/// A pipeline fault surfaced to the driver. Lex and parse errors are not
/// faults; they travel as diagnostics next to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StylerError {
    Convert(ConvertError),
    Rule(RuleError),
    DeadlineExceeded,
}

impl fmt::Display for StylerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert(error) => write!(f, "{error}"),
            Self::Rule(error) => write!(f, "{error}"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

impl std::error::Error for StylerError {}

impl From<ConvertError> for StylerError {
    fn from(error: ConvertError) -> Self {
        match error {
            ConvertError::DeadlineExceeded => StylerError::DeadlineExceeded,
            other => StylerError::Convert(other),
        }
    }
}

impl From<RuleError> for StylerError {
    fn from(error: RuleError) -> Self {
        match error {
            RuleError::DeadlineExceeded => StylerError::DeadlineExceeded,
            other => StylerError::Rule(other),
        }
    }
}

impl From<DeadlineExceeded> for StylerError {
    fn from(_: DeadlineExceeded) -> Self {
        StylerError::DeadlineExceeded
    }
}

/// A parsed source file: the immutable tree plus collected diagnostics.
/// The tree is present even when diagnostics are not empty.
pub struct Parsed {
    pub tree: Tree,
    pub diagnostics: Vec<ParseError>,
}

impl Parsed {
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The formatting core, configured once and reused across files.
pub struct Styler {
    version: LanguageVersion,
    deadline: Deadline,
    engine: RuleEngine,
}

impl Styler {
    /// A core for the given language version with the default rule set.
    pub fn new(version: LanguageVersion) -> Self {
        Self {
            version,
            deadline: Deadline::never(),
            engine: RuleEngine::with_default_rules(),
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Parse and convert one source file.
    pub fn parse(&self, source: &str) -> Result<Parsed, StylerError> {
        let output = styler_parser::parse(source, self.version, self.deadline)?;
        let tree = build_tree(source, &output, self.deadline)?;
        Ok(Parsed {
            tree,
            diagnostics: output.diagnostics,
        })
    }

    /// Parse a `module-info` source file.
    pub fn parse_module_info(&self, source: &str) -> Result<Parsed, StylerError> {
        let output = styler_parser::parse_module_info(source, self.version, self.deadline)?;
        let tree = build_tree(source, &output, self.deadline)?;
        Ok(Parsed {
            tree,
            diagnostics: output.diagnostics,
        })
    }

    /// Run every registered rule's analysis over one source.
    pub fn analyze(
        &self,
        source: &str,
        configs: &[RuleConfig],
    ) -> Result<Vec<Violation>, StylerError> {
        let parsed = self.parse(source)?;
        Ok(self
            .engine
            .analyze_with_deadline(&parsed.tree, configs, self.deadline)?)
    }

    /// Format one source through every registered rule in registration
    /// order, reparsing between rules so each sees current positions.
    pub fn format(&self, source: &str, configs: &[RuleConfig]) -> Result<String, StylerError> {
        let mut current = source.to_string();
        for rule in self.engine.rules() {
            self.deadline.check()?;
            let parsed = self.parse(&current)?;
            current = rule.format(&parsed.tree, configs)?;
        }
        Ok(current)
    }

    /// Render parse diagnostics against the source for human display.
    /// Output is colorless so drivers and tests get stable text.
    pub fn render_diagnostics(&self, source: &str, diagnostics: &[ParseError]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            let span = clamp_span(source, diagnostic.position);
            let report = Report::build(ReportKind::Error, span.clone())
                .with_message(&diagnostic.message)
                .with_config(Config::default().with_color(false))
                .with_label(Label::new(span).with_message(&diagnostic.message))
                .finish();
            let mut buf = Vec::new();
            let cache = Source::from(source);
            report
                .write(cache, &mut buf)
                .expect("diagnostic rendering writes to memory");
            out.push_str(&String::from_utf8_lossy(&buf));
        }
        out
    }
}

/// A one-byte range at `position`, clamped into the source.
fn clamp_span(source: &str, position: u32) -> Range<usize> {
    let len = source.len();
    if len == 0 {
        return 0..0;
    }
    let start = (position as usize).min(len - 1);
    start..start + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_span_stays_in_bounds() {
        assert_eq!(clamp_span("abc", 1), 1..2);
        assert_eq!(clamp_span("abc", 99), 2..3);
        assert_eq!(clamp_span("", 0), 0..0);
    }

    #[test]
    fn parse_produces_tree_and_diagnostics() {
        let styler = Styler::new(LanguageVersion::latest());
        let parsed = styler.parse("class T { int x = ; }").unwrap();
        assert!(!parsed.ok());
        assert!(!parsed.diagnostics.is_empty());
        // The tree is still usable.
        assert!(!parsed.tree.preorder().is_empty());
    }

    #[test]
    fn render_diagnostics_mentions_message_and_line() {
        let styler = Styler::new(LanguageVersion::latest());
        let source = "class T {\n    int x = ;\n}";
        let parsed = styler.parse(source).unwrap();
        let rendered = styler.render_diagnostics(source, &parsed.diagnostics);
        assert!(rendered.contains("expected an expression"));
    }
}
