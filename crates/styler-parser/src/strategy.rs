//! Version-gating strategy registry.
//!
//! A small set of strategies decides whether a version-gated construct is
//! available under the configured language version and the current parsing
//! phase. Dispatch sites ask the registry for a claiming strategy; when none
//! claims, the fallback path records a version diagnostic and parses the
//! construct anyway so recovery stays useful.
//!
//! Priority breaks ties when several strategies claim the same token.
//! Phase-aware strategies (flexible constructor bodies, compact source
//! files) filter on the phase first; priority alone is not enough to keep
//! them out of the wrong context.

use styler_arena::NodeId;
use styler_common::token::TokenKind;
use styler_common::version::LanguageVersion;

use crate::parser::{declarations, expressions, statements, Parser, Phase};

/// Priority for strategies triggered purely by a keyword.
pub const KEYWORD_BASED: u8 = 10;

/// Priority for strategies that additionally require a parsing phase.
pub const PHASE_AWARE: u8 = 15;

/// A version-gated parse strategy.
///
/// `parse_construct` is called only after `can_handle` returned true for
/// the same parser state.
pub trait ParseStrategy: Send + Sync {
    /// Stable strategy name, for diagnostics and tests.
    fn name(&self) -> &'static str;

    /// Dispatch priority; higher wins when several strategies claim.
    fn priority(&self) -> u8 {
        KEYWORD_BASED
    }

    /// Whether this strategy applies to the current parser state under the
    /// given version and phase.
    fn can_handle(&self, version: LanguageVersion, phase: Phase, p: &Parser<'_>) -> bool;

    /// Parse the claimed construct, returning the allocated node.
    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId;
}

/// The process-wide strategy set, built once at startup.
///
/// The registry is read-only after construction; building a second registry
/// with the same strategies succeeds and behaves identically.
pub struct DefaultStrategyRegistry {
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl DefaultStrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(RecordDeclarationStrategy),
                Box::new(SwitchExpressionStrategy),
                Box::new(InstanceofPatternStrategy),
                Box::new(ModuleImportStrategy),
                Box::new(CompactSourceFileStrategy),
                Box::new(FlexibleConstructorBodyStrategy),
            ],
        }
    }

    /// Find the highest-priority strategy claiming the current parser
    /// state. Among equal priorities the first registered wins.
    pub fn find(
        &self,
        version: LanguageVersion,
        phase: Phase,
        p: &Parser<'_>,
    ) -> Option<&dyn ParseStrategy> {
        let mut best: Option<&dyn ParseStrategy> = None;
        for strategy in &self.strategies {
            if !strategy.can_handle(version, phase, p) {
                continue;
            }
            match best {
                Some(current) if current.priority() >= strategy.priority() => {}
                _ => best = Some(strategy.as_ref()),
            }
        }
        best
    }

    /// Look up one strategy by name, returning it only when it claims the
    /// current parser state. Dispatch sites that know which construct they
    /// are gating use this instead of [`find`](Self::find).
    pub fn claim(
        &self,
        name: &str,
        version: LanguageVersion,
        phase: Phase,
        p: &Parser<'_>,
    ) -> Option<&dyn ParseStrategy> {
        self.strategies
            .iter()
            .find(|s| s.name() == name && s.can_handle(version, phase, p))
            .map(|s| s.as_ref())
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for DefaultStrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Strategies ─────────────────────────────────────────────────────────

/// `record Name(...)` declarations, version 16.
struct RecordDeclarationStrategy;

impl ParseStrategy for RecordDeclarationStrategy {
    fn name(&self) -> &'static str {
        "record-declaration"
    }

    fn can_handle(&self, version: LanguageVersion, _phase: Phase, p: &Parser<'_>) -> bool {
        // Records are legal at the top level, nested, and as local
        // declarations, so no phase filter applies.
        version.supports_records() && p.at(TokenKind::Record) && p.nth(1).can_be_identifier()
    }

    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId {
        declarations::parse_record_decl(p)
    }
}

/// `switch` in expression position, version 14.
struct SwitchExpressionStrategy;

impl ParseStrategy for SwitchExpressionStrategy {
    fn name(&self) -> &'static str {
        "switch-expression"
    }

    fn can_handle(&self, version: LanguageVersion, _phase: Phase, p: &Parser<'_>) -> bool {
        version.supports_switch_expressions() && p.at(TokenKind::Switch)
    }

    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId {
        expressions::parse_switch_expr(p)
    }
}

/// Type, record, and primitive patterns after `instanceof`, version 16.
struct InstanceofPatternStrategy;

impl ParseStrategy for InstanceofPatternStrategy {
    fn name(&self) -> &'static str {
        "instanceof-pattern"
    }

    fn can_handle(&self, version: LanguageVersion, _phase: Phase, p: &Parser<'_>) -> bool {
        version.supports_pattern_instanceof() && expressions::at_pattern_start(p)
    }

    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId {
        expressions::parse_pattern(p)
    }
}

/// `import module M;`, version 25.
struct ModuleImportStrategy;

impl ParseStrategy for ModuleImportStrategy {
    fn name(&self) -> &'static str {
        "module-import"
    }

    fn can_handle(&self, version: LanguageVersion, phase: Phase, p: &Parser<'_>) -> bool {
        version.supports_module_imports()
            && phase == Phase::TopLevel
            && p.at(TokenKind::Import)
            && p.nth(1) == TokenKind::Module
            && p.nth(2).can_be_identifier()
    }

    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId {
        declarations::parse_module_import_decl(p)
    }
}

/// Top-level members without a wrapping class, version 25.
///
/// Phase-aware: only the top level of a compilation unit qualifies.
struct CompactSourceFileStrategy;

impl ParseStrategy for CompactSourceFileStrategy {
    fn name(&self) -> &'static str {
        "compact-source-file"
    }

    fn priority(&self) -> u8 {
        PHASE_AWARE
    }

    fn can_handle(&self, version: LanguageVersion, phase: Phase, p: &Parser<'_>) -> bool {
        version.supports_compact_source_files()
            && phase == Phase::TopLevel
            && !p.at(TokenKind::Eof)
            && !p.at(TokenKind::Import)
            && !p.at(TokenKind::Package)
            && !p.at(TokenKind::Semicolon)
            && !declarations::at_type_declaration_keyword(p)
    }

    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId {
        declarations::parse_member(p)
    }
}

/// `super(...)`/`this(...)` reached after other statements, version 25.
///
/// Phase-aware: the constructor-body phase is the first filter; a keyword
/// check alone would also fire on plain `super.method()` calls in methods.
struct FlexibleConstructorBodyStrategy;

impl ParseStrategy for FlexibleConstructorBodyStrategy {
    fn name(&self) -> &'static str {
        "flexible-constructor-body"
    }

    fn priority(&self) -> u8 {
        PHASE_AWARE
    }

    fn can_handle(&self, version: LanguageVersion, phase: Phase, p: &Parser<'_>) -> bool {
        version.supports_flexible_constructor_bodies()
            && phase == Phase::ConstructorBody
            && statements::at_constructor_invocation(p)
    }

    fn parse_construct(&self, p: &mut Parser<'_>) -> NodeId {
        statements::parse_constructor_invocation(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use styler_common::deadline::Deadline;
    use styler_lexer::Lexer;

    fn parser_for(source: &str, version: u32) -> Parser<'_> {
        Parser::new(
            source,
            Lexer::tokenize(source),
            LanguageVersion::new(version).unwrap(),
            Deadline::never(),
            Arc::new(DefaultStrategyRegistry::new()),
        )
    }

    #[test]
    fn priorities_are_ordered() {
        assert!(KEYWORD_BASED < PHASE_AWARE);
        assert_eq!(KEYWORD_BASED, 10);
        assert_eq!(PHASE_AWARE, 15);
    }

    #[test]
    fn registry_can_be_constructed_twice() {
        let first = DefaultStrategyRegistry::new();
        let second = DefaultStrategyRegistry::new();
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
    }

    #[test]
    fn record_strategy_requires_version_16() {
        let registry = DefaultStrategyRegistry::new();
        let p = parser_for("record Point(int x) {}", 8);
        let found = registry.find(p.version(), Phase::TopLevel, &p);
        // Under version 8 the compact-source-file strategy cannot claim
        // either, so nothing handles the record keyword.
        assert!(found.is_none());

        let p = parser_for("record Point(int x) {}", 16);
        let found = registry.find(p.version(), Phase::TypeBody, &p);
        assert_eq!(found.map(|s| s.name()), Some("record-declaration"));
    }

    #[test]
    fn compact_source_file_claims_top_level_members() {
        let registry = DefaultStrategyRegistry::new();
        let p = parser_for("void main() {}", 25);
        let found = registry.find(p.version(), Phase::TopLevel, &p).unwrap();
        assert_eq!(found.name(), "compact-source-file");
        assert_eq!(found.priority(), PHASE_AWARE);
        // Below version 25 nothing claims a top-level member.
        let p = parser_for("void main() {}", 21);
        assert!(registry.find(p.version(), Phase::TopLevel, &p).is_none());
    }

    #[test]
    fn record_keyword_beats_compact_source_file_for_type_declarations() {
        // `record Point(...)` at the top level of a version-25 unit is a
        // type declaration, not a compact member.
        let registry = DefaultStrategyRegistry::new();
        let p = parser_for("record Point(int x) {}", 25);
        let found = registry.find(p.version(), Phase::TopLevel, &p).unwrap();
        assert_eq!(found.name(), "record-declaration");
    }

    #[test]
    fn flexible_constructor_body_requires_constructor_phase() {
        let registry = DefaultStrategyRegistry::new();
        let p = parser_for("super(1);", 25);
        let in_method = registry.find(p.version(), Phase::MethodBody, &p);
        assert!(in_method.is_none());
        let in_ctor = registry.find(p.version(), Phase::ConstructorBody, &p);
        assert_eq!(
            in_ctor.map(|s| s.name()),
            Some("flexible-constructor-body")
        );
    }

    #[test]
    fn module_import_is_distinguished_from_qualified_import() {
        let registry = DefaultStrategyRegistry::new();
        // `import module.X;` starts with a package segment named `module`.
        let p = parser_for("import module.X;", 25);
        assert!(registry.find(p.version(), Phase::TopLevel, &p).is_none());

        let p = parser_for("import module java.base;", 25);
        assert_eq!(
            registry
                .find(p.version(), Phase::TopLevel, &p)
                .map(|s| s.name()),
            Some("module-import")
        );
    }
}
