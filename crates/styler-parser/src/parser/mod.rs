//! Parser core: token navigation, node building, error recovery.
//!
//! Parse functions live in the submodules (`declarations`, `statements`,
//! `expressions`, `types`, `modules`) as free functions over [`Parser`],
//! dispatching on the current token. The parser owns the arena it writes
//! into; [`Parser::into_output`] releases it together with the token stream
//! and collected diagnostics.

pub(crate) mod declarations;
pub(crate) mod expressions;
pub(crate) mod modules;
pub(crate) mod statements;
pub(crate) mod types;

use std::sync::Arc;

use styler_arena::{NodeArena, NodeId, NodeKind};
use styler_common::deadline::{Deadline, DeadlineExceeded};
use styler_common::diagnostics::ParseError;
use styler_common::span::{LineIndex, Span};
use styler_common::token::{Token, TokenKind};
use styler_common::version::LanguageVersion;

use crate::strategy::DefaultStrategyRegistry;
use crate::ParseOutput;

/// The parser's current grammatical context.
///
/// Version-gating strategies filter on the phase before anything else;
/// flexible constructor bodies, for example, are only ever recognized in
/// [`Phase::ConstructorBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Directly inside a compilation unit.
    TopLevel,
    /// Inside a class, interface, enum, record, or annotation body.
    TypeBody,
    /// Inside a method, initializer, or lambda body.
    MethodBody,
    /// Inside a constructor body.
    ConstructorBody,
}

/// Recursive-descent parser writing nodes into a [`NodeArena`].
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// Raw index into `tokens`, including trivia.
    pos: usize,
    /// End offset of the last consumed significant token.
    last_end: u32,
    arena: NodeArena,
    line_index: LineIndex,
    diagnostics: Vec<ParseError>,
    version: LanguageVersion,
    deadline: Deadline,
    deadline_hit: bool,
    phases: Vec<Phase>,
    registry: Arc<DefaultStrategyRegistry>,
    /// Modifier and annotation nodes parsed ahead of a declaration,
    /// waiting to be attached as its first children.
    pending_modifiers: Vec<NodeId>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(
        source: &'src str,
        tokens: Vec<Token>,
        version: LanguageVersion,
        deadline: Deadline,
        registry: Arc<DefaultStrategyRegistry>,
    ) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            last_end: 0,
            arena: NodeArena::new(),
            line_index: LineIndex::new(source),
            diagnostics: Vec::new(),
            version,
            deadline,
            deadline_hit: false,
            phases: Vec::new(),
            registry,
            pending_modifiers: Vec::new(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// Index of the first significant (non-trivia) token at or after `from`.
    fn significant_pos(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.tokens.len() && self.tokens[i].kind.is_trivia() {
            i += 1;
        }
        i
    }

    /// Kind of the current significant token. `Eof` past the end.
    pub fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Kind of the Nth significant token ahead; `nth(0)` is `current()`.
    pub fn nth(&self, n: usize) -> TokenKind {
        let mut i = self.significant_pos(self.pos);
        let mut remaining = n;
        while remaining > 0 && i < self.tokens.len() && self.tokens[i].kind != TokenKind::Eof {
            i = self.significant_pos(i + 1);
            remaining -= 1;
        }
        if i < self.tokens.len() {
            self.tokens[i].kind
        } else {
            TokenKind::Eof
        }
    }

    /// Span of the current significant token; zero-length at end of input.
    pub fn current_span(&self) -> Span {
        let i = self.significant_pos(self.pos);
        if i < self.tokens.len() {
            self.tokens[i].span
        } else {
            Span::empty_at(self.source.len() as u32)
        }
    }

    /// Text of the current significant token.
    pub fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    /// Byte offset where the current significant token begins.
    pub fn offset(&self) -> u32 {
        self.current_span().start
    }

    /// Raw token cursor, for loop-progress checks during recovery.
    pub(crate) fn cursor(&self) -> usize {
        self.pos
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Whether the current token can serve as an identifier (a plain
    /// identifier or any contextual keyword except `non-sealed`).
    pub fn at_identifier(&self) -> bool {
        self.current().can_be_identifier()
    }

    /// Span of the current token when it can serve as an identifier.
    pub(crate) fn current_span_if_identifier(&self) -> Option<Span> {
        if self.at_identifier() {
            Some(self.current_span())
        } else {
            None
        }
    }

    /// Recorded range of a node this parser allocated.
    pub(crate) fn range_of(&self, id: NodeId) -> Span {
        self.arena
            .range_of(id)
            .expect("node ids handed out by this parser are valid")
    }

    pub fn version(&self) -> LanguageVersion {
        self.version
    }

    /// Current parsing phase; [`Phase::TopLevel`] outside any body.
    pub fn phase(&self) -> Phase {
        self.phases.last().copied().unwrap_or(Phase::TopLevel)
    }

    pub(crate) fn source_len(&self) -> u32 {
        self.source.len() as u32
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume the current significant token.
    ///
    /// At end of input this returns the `Eof` token without moving, so
    /// callers may call it unconditionally.
    pub(crate) fn advance(&mut self) -> Token {
        let i = self.significant_pos(self.pos);
        if i >= self.tokens.len() {
            return Token::new(TokenKind::Eof, self.source_len(), self.source_len());
        }
        let token = self.tokens[i];
        if token.kind == TokenKind::Eof {
            self.pos = i;
            return token;
        }
        self.pos = i + 1;
        self.last_end = token.span.end;
        token
    }

    /// Consume the current token if it matches, without error reporting.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches; record an error otherwise.
    /// The token is not consumed on mismatch.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!(
                "expected {}, found {}",
                describe(kind),
                describe(self.current())
            ));
            false
        }
    }

    /// Consume an identifier (or contextual keyword) and return its span.
    /// Records an error and returns `None` on mismatch.
    pub(crate) fn expect_identifier(&mut self) -> Option<Span> {
        if self.at_identifier() {
            Some(self.advance().span)
        } else {
            self.error(format!(
                "expected an identifier, found {}",
                describe(self.current())
            ));
            None
        }
    }

    /// Consume exactly one `>` in a generic context.
    ///
    /// The lexer munches `>>`, `>>>`, `>=`, `>>=`, and `>>>=` maximally; in
    /// a type-argument context the head token is rewritten in place with one
    /// leading `>` stripped off.
    pub(crate) fn consume_single_gt(&mut self) -> bool {
        let i = self.significant_pos(self.pos);
        if i >= self.tokens.len() {
            self.error("expected `>`".to_string());
            return false;
        }
        let token = self.tokens[i];
        let remainder = match token.kind {
            TokenKind::Gt => {
                self.advance();
                return true;
            }
            TokenKind::Shr => TokenKind::Gt,
            TokenKind::UShr => TokenKind::Shr,
            TokenKind::GtEq => TokenKind::Assign,
            TokenKind::ShrAssign => TokenKind::GtEq,
            TokenKind::UShrAssign => TokenKind::ShrAssign,
            _ => {
                self.error(format!("expected `>`, found {}", describe(token.kind)));
                return false;
            }
        };
        // One '>' consumed; the rest stays at the head of the stream.
        self.last_end = token.span.start + 1;
        self.tokens[i] = Token::new(remainder, token.span.start + 1, token.span.end);
        self.pos = i;
        true
    }

    // ── Node building ──────────────────────────────────────────────────

    /// Allocate a node whose range starts at the current offset. The range
    /// is widened by [`complete`](Self::complete) once parsing finishes.
    pub(crate) fn node(&mut self, kind: NodeKind) -> NodeId {
        let at = self.offset();
        self.alloc(kind, at, at)
    }

    /// Allocate a node anchored at an explicit start offset. Used when the
    /// node kind is only known after some of its tokens were consumed.
    pub(crate) fn node_at(&mut self, kind: NodeKind, start: u32) -> NodeId {
        self.alloc(kind, start, start)
    }

    fn alloc(&mut self, kind: NodeKind, start: u32, end: u32) -> NodeId {
        self.arena
            .allocate(kind, start, end)
            .expect("arena stays open and in-range for the whole parse")
    }

    /// Finalize a node's range as `(start, end-of-last-consumed-token)`.
    pub(crate) fn complete(&mut self, id: NodeId, start: u32) {
        let end = self.last_end.max(start);
        self.arena
            .widen_range(id, Span::new(start, end))
            .expect("node ids handed out by this parser are valid");
    }

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.arena
            .append_child(parent, child)
            .expect("node ids handed out by this parser are valid");
    }

    /// A zero-length placeholder standing in for a missing child.
    pub(crate) fn missing(&mut self) -> NodeId {
        let at = self.offset();
        self.alloc(NodeKind::Missing, at, at)
    }

    /// Access attribute side tables for a node this parser allocated.
    pub(crate) fn attrs(&mut self, id: NodeId) -> &mut styler_arena::AttributeTables {
        self.arena
            .attributes_mut(id)
            .expect("node ids handed out by this parser are valid")
    }

    pub(crate) fn text_of(&self, span: Span) -> &'src str {
        &self.source[span.start as usize..span.end as usize]
    }

    // ── Phases ─────────────────────────────────────────────────────────

    pub(crate) fn with_phase<R>(&mut self, phase: Phase, f: impl FnOnce(&mut Self) -> R) -> R {
        self.phases.push(phase);
        let result = f(self);
        self.phases.pop();
        result
    }

    pub(crate) fn registry(&self) -> Arc<DefaultStrategyRegistry> {
        Arc::clone(&self.registry)
    }

    /// Stash modifier/annotation nodes parsed ahead of a declaration.
    pub(crate) fn set_pending_modifiers(&mut self, modifiers: Vec<NodeId>) {
        self.pending_modifiers = modifiers;
    }

    /// Take the stashed modifiers; the declaration parser attaches them as
    /// its node's first children so child order stays source order.
    pub(crate) fn take_pending_modifiers(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.pending_modifiers)
    }

    // ── Errors and recovery ────────────────────────────────────────────

    /// Record a diagnostic at the current token.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let offset = self.offset();
        self.error_at(offset, message);
    }

    /// Record a diagnostic at an explicit byte offset.
    pub(crate) fn error_at(&mut self, offset: u32, message: impl Into<String>) {
        let position = self.line_index.position(offset);
        self.diagnostics
            .push(ParseError::new(offset, position, message.into()));
    }

    /// Record a version-gating diagnostic for a construct below its minimum.
    pub(crate) fn feature_error(&mut self, what: &str, minimum: u32) {
        let message = format!(
            "{what} require language version {minimum} (configured version is {})",
            self.version
        );
        self.error(message);
    }

    /// Record an error and consume one token so loops make progress.
    pub(crate) fn error_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        self.advance();
    }

    /// Skip ahead to a synchronization point: past the next semicolon, or to
    /// (not past) the next right brace or declaration-starting keyword.
    pub(crate) fn synchronize(&mut self) {
        loop {
            match self.current() {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                kind if starts_declaration(kind) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ── Deadline ───────────────────────────────────────────────────────

    /// Poll the cooperative deadline. Once it expires the parser stops
    /// descending; [`into_output`](Self::into_output) reports the fault.
    pub(crate) fn deadline_exceeded(&mut self) -> bool {
        if self.deadline_hit {
            return true;
        }
        if self.deadline.is_expired() {
            self.deadline_hit = true;
        }
        self.deadline_hit
    }

    // ── Finalization ───────────────────────────────────────────────────

    pub(crate) fn into_output(self, root: NodeId) -> Result<ParseOutput, DeadlineExceeded> {
        if self.deadline_hit {
            return Err(DeadlineExceeded);
        }
        Ok(ParseOutput {
            arena: self.arena,
            root,
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        })
    }
}

/// Whether a token kind can begin a declaration, for synchronization.
fn starts_declaration(kind: TokenKind) -> bool {
    kind.is_primitive_type()
        || matches!(
            kind,
            TokenKind::Class
                | TokenKind::Interface
                | TokenKind::Enum
                | TokenKind::Import
                | TokenKind::Package
                | TokenKind::Public
                | TokenKind::Protected
                | TokenKind::Private
                | TokenKind::Static
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Void
                | TokenKind::At
        )
}

/// Human-readable token description for diagnostics.
fn describe(kind: TokenKind) -> String {
    match kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Identifier => "an identifier".to_string(),
        other => format!("`{other:?}`"),
    }
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// Parse a complete compilation unit.
///
/// Layout: optional package declaration, imports, then type declarations.
/// Under compact-source-file rules, top-level members are admitted through
/// the strategy registry.
pub(crate) fn parse_compilation_unit(p: &mut Parser) -> NodeId {
    let root = p.alloc(NodeKind::CompilationUnit, 0, p.source_len());

    // Leading annotations belong either to a package declaration
    // (package-info units) or to the first type declaration.
    let mut pending = declarations::parse_annotation_list(p);

    let mut seen_package = false;
    if p.at(TokenKind::Package) {
        let package = declarations::parse_package_decl(p, std::mem::take(&mut pending));
        p.attach(root, package);
        seen_package = true;
    }

    while p.at(TokenKind::Import) {
        let import = declarations::parse_import_decl(p);
        p.attach(root, import);
    }

    loop {
        if p.deadline_exceeded() {
            break;
        }
        match p.current() {
            TokenKind::Eof => break,
            TokenKind::Semicolon => {
                p.advance();
            }
            TokenKind::Import => {
                let import = declarations::parse_import_decl(p);
                p.attach(root, import);
            }
            TokenKind::Package => {
                if seen_package {
                    p.error("duplicate package declaration");
                }
                seen_package = true;
                let package = declarations::parse_package_decl(p, Vec::new());
                p.attach(root, package);
            }
            _ => {
                let pending_here = std::mem::take(&mut pending);
                let decl = declarations::parse_top_level_declaration(p, pending_here);
                p.attach(root, decl);
            }
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_lexer::Lexer;

    fn parser_for(source: &str) -> Parser<'_> {
        Parser::new(
            source,
            Lexer::tokenize(source),
            LanguageVersion::latest(),
            Deadline::never(),
            Arc::new(DefaultStrategyRegistry::new()),
        )
    }

    #[test]
    fn navigation_skips_trivia() {
        let p = parser_for("class /* note */ Foo // tail\n{");
        assert_eq!(p.current(), TokenKind::Class);
        assert_eq!(p.nth(1), TokenKind::Identifier);
        assert_eq!(p.nth(2), TokenKind::LBrace);
        assert_eq!(p.nth(3), TokenKind::Eof);
    }

    #[test]
    fn advance_past_end_keeps_returning_eof() {
        let mut p = parser_for("x");
        assert_eq!(p.advance().kind, TokenKind::Identifier);
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert_eq!(p.current(), TokenKind::Eof);
    }

    #[test]
    fn expect_records_error_without_consuming() {
        let mut p = parser_for("class");
        assert!(!p.expect(TokenKind::Semicolon));
        assert_eq!(p.diagnostics.len(), 1);
        assert_eq!(p.current(), TokenKind::Class);
    }

    #[test]
    fn consume_single_gt_splits_shift() {
        // `List<List<String>>` ends in `>>` which must close two levels.
        let mut p = parser_for(">>");
        assert!(p.consume_single_gt());
        assert_eq!(p.current(), TokenKind::Gt);
        assert_eq!(p.current_span(), Span::new(1, 2));
        assert!(p.consume_single_gt());
        assert_eq!(p.current(), TokenKind::Eof);
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn consume_single_gt_splits_unsigned_shift_assign() {
        let mut p = parser_for(">>>=");
        assert!(p.consume_single_gt());
        assert_eq!(p.current(), TokenKind::ShrAssign);
        assert!(p.consume_single_gt());
        assert_eq!(p.current(), TokenKind::GtEq);
        assert!(p.consume_single_gt());
        assert_eq!(p.current(), TokenKind::Assign);
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn consume_single_gt_rejects_other_tokens() {
        let mut p = parser_for("<");
        assert!(!p.consume_single_gt());
        assert_eq!(p.diagnostics.len(), 1);
    }

    #[test]
    fn synchronize_stops_after_semicolon() {
        let mut p = parser_for("garbage tokens ; int x");
        p.synchronize();
        assert_eq!(p.current(), TokenKind::Int);
    }

    #[test]
    fn synchronize_stops_at_rbrace() {
        let mut p = parser_for("garbage tokens }");
        p.synchronize();
        assert_eq!(p.current(), TokenKind::RBrace);
    }

    #[test]
    fn phase_stack() {
        let mut p = parser_for("");
        assert_eq!(p.phase(), Phase::TopLevel);
        p.with_phase(Phase::TypeBody, |p| {
            assert_eq!(p.phase(), Phase::TypeBody);
            p.with_phase(Phase::ConstructorBody, |p| {
                assert_eq!(p.phase(), Phase::ConstructorBody);
            });
            assert_eq!(p.phase(), Phase::TypeBody);
        });
        assert_eq!(p.phase(), Phase::TopLevel);
    }

    #[test]
    fn expired_deadline_fails_the_parse() {
        let source = "class A {}";
        let mut p = Parser::new(
            source,
            Lexer::tokenize(source),
            LanguageVersion::latest(),
            Deadline::at(std::time::Instant::now()),
            Arc::new(DefaultStrategyRegistry::new()),
        );
        let root = parse_compilation_unit(&mut p);
        assert_eq!(p.into_output(root).err(), Some(DeadlineExceeded));
    }
}
