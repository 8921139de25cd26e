//! Arena-to-tree conversion: a registry of per-kind strategies, the
//! converter that composes their recursion, and the conversion fault types.

mod strategies;

use std::fmt;

use rustc_hash::FxHashMap;
use styler_arena::{ArenaError, AttributeTables, NodeArena, NodeId, NodeKind};
use styler_common::deadline::Deadline;
use styler_common::span::Span;

use crate::node::Node;
use crate::trivia::TriviaMap;

/// A conversion fault. Faults flow upward out of the conversion; nothing
/// is caught internally.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// A required child was missing or of an unexpected kind.
    InvalidNodeStructure {
        index: u32,
        kind: NodeKind,
        range: Span,
        detail: String,
    },
    /// The arena was closed before conversion read from it. A program bug,
    /// not a user error.
    ArenaClosed,
    /// No strategy is registered for a kind reached during conversion.
    MissingStrategy(NodeKind),
    /// Two strategies were registered for the same kind.
    DuplicateStrategy(NodeKind),
    /// The cooperative deadline expired mid-conversion.
    DeadlineExceeded,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNodeStructure {
                index,
                kind,
                range,
                detail,
            } => write!(
                f,
                "invalid node structure at index {index} ({kind:?}, {}..{}): {detail}",
                range.start, range.end
            ),
            Self::ArenaClosed => write!(f, "arena was closed before conversion"),
            Self::MissingStrategy(kind) => {
                write!(f, "no conversion strategy registered for {kind:?}")
            }
            Self::DuplicateStrategy(kind) => {
                write!(f, "duplicate conversion strategy for {kind:?}")
            }
            Self::DeadlineExceeded => write!(f, "deadline exceeded during conversion"),
        }
    }
}

impl std::error::Error for ConvertError {}

/// A per-kind conversion strategy.
///
/// A strategy reads one arena node, extracts the substrings its tree
/// variant needs, recurses into children through [`Converter::convert_node`]
/// only, and returns the constructed node. It must not reach outside its
/// subtree.
pub trait ConversionStrategy: Send + Sync {
    /// The arena kind this strategy converts.
    fn kind(&self) -> NodeKind;

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError>;
}

/// Registry mapping each node kind to its conversion strategy.
///
/// Built once at startup through the builder, which rejects duplicate
/// registrations. Read-only afterwards; constructing a second registry with
/// the same strategies succeeds.
pub struct ConversionRegistry {
    strategies: FxHashMap<NodeKind, Box<dyn ConversionStrategy>>,
}

impl ConversionRegistry {
    pub fn builder() -> ConversionRegistryBuilder {
        ConversionRegistryBuilder {
            strategies: FxHashMap::default(),
            error: None,
        }
    }

    /// The standard registry covering every kind the parser can emit.
    pub fn standard() -> Self {
        strategies::standard_registry()
    }

    pub fn get(&self, kind: NodeKind) -> Option<&dyn ConversionStrategy> {
        self.strategies.get(&kind).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Builder enforcing one strategy per kind.
pub struct ConversionRegistryBuilder {
    strategies: FxHashMap<NodeKind, Box<dyn ConversionStrategy>>,
    error: Option<ConvertError>,
}

impl ConversionRegistryBuilder {
    pub fn register(mut self, strategy: Box<dyn ConversionStrategy>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let kind = strategy.kind();
        if self.strategies.insert(kind, strategy).is_some() {
            self.error = Some(ConvertError::DuplicateStrategy(kind));
        }
        self
    }

    pub fn build(self) -> Result<ConversionRegistry, ConvertError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(ConversionRegistry {
                strategies: self.strategies,
            }),
        }
    }
}

/// Context handed to strategies: arena access, source slicing, trivia
/// lookup, and the recursion entry point.
pub struct Converter<'a> {
    registry: &'a ConversionRegistry,
    arena: &'a NodeArena,
    source: &'a str,
    trivia: &'a TriviaMap,
    deadline: Deadline,
}

impl<'a> Converter<'a> {
    pub fn new(
        registry: &'a ConversionRegistry,
        arena: &'a NodeArena,
        source: &'a str,
        trivia: &'a TriviaMap,
        deadline: Deadline,
    ) -> Self {
        Self {
            registry,
            arena,
            source,
            trivia,
            deadline,
        }
    }

    /// Convert one arena node (and, through its strategy, its subtree).
    ///
    /// Declarations and statements receive their leading/trailing trivia
    /// here; blocks share their start offset with their first statement, so
    /// they are skipped on the leading side.
    pub fn convert_node(&self, id: NodeId) -> Result<Node, ConvertError> {
        let kind = self.kind(id)?;

        if (kind.is_declaration() || kind.is_statement()) && self.deadline.is_expired() {
            return Err(ConvertError::DeadlineExceeded);
        }

        let strategy = self
            .registry
            .get(kind)
            .ok_or(ConvertError::MissingStrategy(kind))?;
        let mut node = strategy.convert(id, self)?;

        if kind.is_declaration() || (kind.is_statement() && kind != NodeKind::Block) {
            let range = node.range();
            node.set_trivia(
                self.trivia.leading_at(range.start),
                self.trivia.trailing_at(range.end),
            );
        }
        Ok(node)
    }

    // ── Arena access ───────────────────────────────────────────────────

    pub fn kind(&self, id: NodeId) -> Result<NodeKind, ConvertError> {
        self.arena.kind_of(id).map_err(map_arena_error)
    }

    pub fn range(&self, id: NodeId) -> Result<Span, ConvertError> {
        self.arena.range_of(id).map_err(map_arena_error)
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, ConvertError> {
        Ok(self
            .arena
            .children_of(id)
            .map_err(map_arena_error)?
            .to_vec())
    }

    pub fn attrs(&self) -> &AttributeTables {
        self.arena.attributes()
    }

    /// Read-only slice of the original source.
    pub fn source_text(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }

    /// Source text of a node, by its recorded range.
    pub fn text_of(&self, id: NodeId) -> Result<&'a str, ConvertError> {
        Ok(self.source_text(self.range(id)?))
    }

    /// Build an [`ConvertError::InvalidNodeStructure`] for a node.
    pub fn structure_error(&self, id: NodeId, detail: impl Into<String>) -> ConvertError {
        let kind = self.arena.kind_of(id).unwrap_or(NodeKind::Missing);
        let range = self.arena.range_of(id).unwrap_or(Span::empty_at(0));
        ConvertError::InvalidNodeStructure {
            index: id.raw(),
            kind,
            range,
            detail: detail.into(),
        }
    }
}

fn map_arena_error(error: ArenaError) -> ConvertError {
    match error {
        ArenaError::Closed => ConvertError::ArenaClosed,
        other => ConvertError::InvalidNodeStructure {
            index: u32::MAX,
            kind: NodeKind::Missing,
            range: Span::empty_at(0),
            detail: other.to_string(),
        },
    }
}
