//! Styler parser: recursive descent over the token stream, writing nodes
//! into an index-overlay arena.
//!
//! The parser always produces a tree, even for broken input: errors are
//! recorded as location-rich diagnostics, the parser synchronizes on the
//! next semicolon, matching brace, or declaration keyword, and missing
//! children are replaced by zero-length placeholder nodes so downstream
//! stages never see a hole.
//!
//! Version-gated constructs (records, sealed types, switch expressions,
//! module imports, compact source files, flexible constructor bodies) are
//! recognized through a registry of small strategies keyed on the configured
//! [`LanguageVersion`] and the current parsing [`Phase`].

mod parser;
pub mod strategy;

pub use parser::{Parser, Phase};
pub use strategy::{DefaultStrategyRegistry, ParseStrategy, KEYWORD_BASED, PHASE_AWARE};

use std::sync::Arc;

use styler_arena::{NodeArena, NodeId};
use styler_common::deadline::{Deadline, DeadlineExceeded};
use styler_common::diagnostics::ParseError;
use styler_common::token::Token;
use styler_common::version::LanguageVersion;
use styler_lexer::Lexer;

/// Result of parsing one source file.
///
/// The arena holds the parse tree rooted at `root`; `tokens` is the complete
/// trivia-preserving token stream the converter uses for comment attachment.
pub struct ParseOutput {
    pub arena: NodeArena,
    pub root: NodeId,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<ParseError>,
}

impl ParseOutput {
    /// Whether parsing completed without diagnostics.
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse an ordinary compilation unit.
///
/// Always returns a tree alongside any diagnostics; the only failure is the
/// cooperative deadline expiring mid-parse.
pub fn parse(
    source: &str,
    version: LanguageVersion,
    deadline: Deadline,
) -> Result<ParseOutput, DeadlineExceeded> {
    let tokens = Lexer::tokenize(source);
    let registry = Arc::new(DefaultStrategyRegistry::new());
    let mut p = parser::Parser::new(source, tokens, version, deadline, registry);
    let root = parser::parse_compilation_unit(&mut p);
    p.into_output(root)
}

/// Parse a `module-info` compilation unit.
pub fn parse_module_info(
    source: &str,
    version: LanguageVersion,
    deadline: Deadline,
) -> Result<ParseOutput, DeadlineExceeded> {
    let tokens = Lexer::tokenize(source);
    let registry = Arc::new(DefaultStrategyRegistry::new());
    let mut p = parser::Parser::new(source, tokens, version, deadline, registry);
    let root = parser::modules::parse_module_unit(&mut p);
    p.into_output(root)
}
