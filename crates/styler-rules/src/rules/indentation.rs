//! Reference indentation rule: brace-depth-driven leading whitespace in
//! space or tab mode.
//!
//! Depth is computed from the token stream, never from raw text, so braces
//! inside strings, text blocks, and comments cannot skew it. Lines that
//! begin inside a multi-line token (text blocks, block comments) are left
//! untouched.

use styler_common::span::Span;
use styler_common::token::{Token, TokenKind};
use styler_lexer::Lexer;
use styler_tree::Tree;

use crate::config::{IndentationConfig, RuleConfig};
use crate::engine::{config_for, Rule, RuleError};
use crate::violation::{Edit, Severity, Violation};

pub struct IndentationRule;

impl IndentationRule {
    fn config(&self, configs: &[RuleConfig]) -> IndentationConfig {
        match config_for(IndentationConfig::RULE_ID, configs) {
            Some(RuleConfig::Indentation(config)) => config.clone(),
            _ => IndentationConfig::default(),
        }
    }
}

impl Rule for IndentationRule {
    fn id(&self) -> &str {
        IndentationConfig::RULE_ID
    }

    fn name(&self) -> &str {
        "Indentation"
    }

    fn description(&self) -> &str {
        "Aligns each line's leading whitespace with its brace depth"
    }

    fn analyze(&self, tree: &Tree, configs: &[RuleConfig]) -> Result<Vec<Violation>, RuleError> {
        let config = self.config(configs);
        let source = tree.source();
        let mut violations = Vec::new();

        for line in mis_indented_lines(source, &config) {
            let violation = Violation::new(
                self.id(),
                line.leading,
                Severity::Warning,
                format!(
                    "line {} is indented with {:?}, expected {:?}",
                    line.number, line.actual, line.expected
                ),
            )
            .with_edit(Edit {
                range: line.leading,
                replacement: line.expected.clone(),
            });
            violations.push(violation);
        }
        Ok(violations)
    }

    fn format(&self, tree: &Tree, configs: &[RuleConfig]) -> Result<String, RuleError> {
        let config = self.config(configs);
        Ok(reindent(tree.source(), &config))
    }
}

/// One line whose leading whitespace disagrees with its depth.
struct MisindentedLine {
    number: u32,
    leading: Span,
    actual: String,
    expected: String,
}

fn mis_indented_lines(source: &str, config: &IndentationConfig) -> Vec<MisindentedLine> {
    let mut lines = Vec::new();
    for (number, info) in line_infos(source).into_iter().enumerate() {
        let LineInfo::Code {
            start,
            content_offset,
            depth,
        } = info
        else {
            continue;
        };
        let actual = &source[start as usize..content_offset as usize];
        let expected = config.unit().repeat(depth);
        if actual != expected {
            lines.push(MisindentedLine {
                number: number as u32 + 1,
                leading: Span::new(start, content_offset),
                actual: actual.to_string(),
                expected,
            });
        }
    }
    lines
}

/// Rewrite every code line's leading whitespace to match its depth.
fn reindent(source: &str, config: &IndentationConfig) -> String {
    if source.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for info in line_infos(source) {
        if let LineInfo::Code {
            start,
            content_offset,
            depth,
        } = info
        {
            out.push_str(&source[cursor..start as usize]);
            out.push_str(&config.unit().repeat(depth));
            cursor = content_offset as usize;
        }
    }
    out.push_str(&source[cursor..]);
    out
}

enum LineInfo {
    /// A line starting with reformattable content.
    Code {
        /// Offset of the line's first byte.
        start: u32,
        /// Offset of the first non-whitespace byte.
        content_offset: u32,
        /// Indentation depth for the line.
        depth: usize,
    },
    /// Blank, or starting inside a multi-line token; left as-is.
    Untouched,
}

/// Classify every line with its brace depth, driven by the token stream.
fn line_infos(source: &str) -> Vec<LineInfo> {
    let tokens: Vec<Token> = Lexer::tokenize(source);

    // Line start offsets.
    let mut line_starts: Vec<u32> = vec![0];
    for (i, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            line_starts.push(i as u32 + 1);
        }
    }

    // First significant token at or after each offset, with the brace depth
    // in force there.
    let mut infos = Vec::with_capacity(line_starts.len());
    let mut depth: usize = 0;
    let mut token_index = 0usize;

    for (line, &start) in line_starts.iter().enumerate() {
        let line_end = line_starts
            .get(line + 1)
            .map(|&next| next.saturating_sub(1))
            .unwrap_or(source.len() as u32);

        // Skip tokens that ended before this line, folding their braces
        // into the running depth.
        while token_index < tokens.len() && tokens[token_index].span.end <= start {
            depth = adjust_depth(depth, &tokens[token_index]);
            token_index += 1;
        }

        // A non-whitespace token straddling the line start means the line
        // begins inside a multi-line token (text block, block comment).
        if token_index < tokens.len() {
            let token = &tokens[token_index];
            if token.span.start < start
                && token.span.end > start
                && token.kind != TokenKind::Whitespace
            {
                infos.push(LineInfo::Untouched);
                continue;
            }
        }

        // First non-whitespace token on this line.
        let mut probe = token_index;
        while probe < tokens.len()
            && tokens[probe].kind == TokenKind::Whitespace
            && tokens[probe].span.start < line_end
        {
            probe += 1;
        }
        let first = tokens.get(probe);
        let first_on_line = first
            .filter(|t| t.span.start < line_end && t.kind != TokenKind::Eof)
            .copied();

        match first_on_line {
            None => infos.push(LineInfo::Untouched),
            Some(token) => {
                let line_depth = if token.kind == TokenKind::RBrace {
                    depth.saturating_sub(1)
                } else {
                    depth
                };
                infos.push(LineInfo::Code {
                    start,
                    content_offset: token.span.start,
                    depth: line_depth,
                });
            }
        }
    }
    infos
}

fn adjust_depth(depth: usize, token: &Token) -> usize {
    match token.kind {
        TokenKind::LBrace => depth + 1,
        TokenKind::RBrace => depth.saturating_sub(1),
        _ => depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndentationMode;
    use styler_common::deadline::Deadline;
    use styler_common::version::LanguageVersion;

    fn tree_for(source: &str) -> Tree {
        let output =
            styler_parser::parse(source, LanguageVersion::latest(), Deadline::never()).unwrap();
        styler_tree::build_tree(source, &output, Deadline::never()).unwrap()
    }

    fn spaces(width: u8) -> Vec<RuleConfig> {
        vec![RuleConfig::Indentation(
            IndentationConfig::new(IndentationMode::Spaces, width).unwrap(),
        )]
    }

    fn tabs() -> Vec<RuleConfig> {
        vec![RuleConfig::Indentation(
            IndentationConfig::new(IndentationMode::Tabs, 4).unwrap(),
        )]
    }

    #[test]
    fn tab_mode_replaces_space_indentation() {
        let source = "class T {\n    int x = 1;\n}";
        let tree = tree_for(source);
        let formatted = IndentationRule.format(&tree, &tabs()).unwrap();
        assert_eq!(formatted, "class T {\n\tint x = 1;\n}");
    }

    #[test]
    fn format_is_idempotent() {
        let source = "class T {\n    int x = 1;\n  void f() {\nrun();\n}\n}";
        let tree = tree_for(source);
        let once = IndentationRule.format(&tree, &tabs()).unwrap();
        let again = IndentationRule
            .format(&tree_for(&once), &tabs())
            .unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn nested_blocks_indent_by_depth() {
        let source = "class T {\nvoid f() {\nrun();\n}\n}";
        let tree = tree_for(source);
        let formatted = IndentationRule.format(&tree, &spaces(2)).unwrap();
        assert_eq!(formatted, "class T {\n  void f() {\n    run();\n  }\n}");
    }

    #[test]
    fn braces_inside_strings_do_not_change_depth() {
        let source = "class T {\nString s = \"{{{\";\nint x;\n}";
        let tree = tree_for(source);
        let formatted = IndentationRule.format(&tree, &spaces(2)).unwrap();
        assert_eq!(formatted, "class T {\n  String s = \"{{{\";\n  int x;\n}");
    }

    #[test]
    fn text_block_interiors_are_untouched() {
        let source = "class T {\nString q = \"\"\"\n  keep\n   me\n\"\"\";\n}";
        let tree = tree_for(source);
        let formatted = IndentationRule.format(&tree, &spaces(2)).unwrap();
        assert!(formatted.contains("\n  keep\n   me\n"));
    }

    #[test]
    fn empty_input_formats_to_empty() {
        let tree = tree_for("");
        assert_eq!(IndentationRule.format(&tree, &spaces(4)).unwrap(), "");
        assert!(IndentationRule.analyze(&tree, &spaces(4)).unwrap().is_empty());
    }

    #[test]
    fn analyze_reports_each_bad_line_with_an_edit() {
        let source = "class T {\n  int a;\n        int b;\n}";
        let tree = tree_for(source);
        let violations = IndentationRule.analyze(&tree, &spaces(4)).unwrap();
        assert_eq!(violations.len(), 2);
        for violation in &violations {
            assert_eq!(violation.rule_id, "indentation");
            assert_eq!(violation.severity, Severity::Warning);
            let edit = violation.edit.as_ref().unwrap();
            assert_eq!(edit.replacement, "    ");
        }
    }

    #[test]
    fn analyze_is_silent_on_conforming_source() {
        let source = "class T {\n    int a;\n}";
        let tree = tree_for(source);
        assert!(IndentationRule.analyze(&tree, &spaces(4)).unwrap().is_empty());
    }
}
