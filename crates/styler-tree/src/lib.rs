//! Immutable, visitor-friendly syntax tree for the Styler formatting core.
//!
//! The parser's arena is fast to build but awkward for rules; this crate
//! converts arena nodes into a typed [`node::Node`] tree with named
//! children, attached trivia, and all strings copied out of the source, so
//! the tree can outlive the arena and be shared across threads.
//!
//! Conversion is dispatched through a [`convert::ConversionRegistry`]
//! mapping each arena node kind to a strategy; rules consume the resulting
//! [`Tree`] through read-only accessors, the total [`visitor::Visitor`]
//! walk, and extractor utilities such as [`imports::extract_imports`].

pub mod convert;
pub mod imports;
pub mod node;
pub mod trivia;
pub mod visitor;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use styler_common::deadline::Deadline;
use styler_common::span::LineIndex;
use styler_parser::ParseOutput;

pub use convert::{ConversionRegistry, ConvertError, Converter};
pub use imports::{extract_imports, ImportRecord};
pub use node::{Node, NodeData};
pub use trivia::{Trivia, TriviaMap};
pub use visitor::{walk, Visitor};

/// A fully converted compilation unit.
///
/// The tree owns a copy of the source text and is deeply immutable: every
/// accessor returns values or read-only views, and parent links live in a
/// pre-order index side table rather than as owning back-references.
#[derive(Debug)]
pub struct Tree {
    source: Arc<str>,
    root: Node,
    line_index: LineIndex,
    /// Pre-order node index -> parent's pre-order index. The root has no
    /// entry.
    parents: FxHashMap<usize, usize>,
}

impl Tree {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shared handle to the copied source text.
    pub fn source_arc(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    /// 1-based line number of a byte offset.
    pub fn line_of(&self, offset: u32) -> u32 {
        self.line_index.line_of(offset)
    }

    /// All nodes in pre-order. Index positions match the parent table.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        collect_preorder(&self.root, &mut nodes);
        nodes
    }

    /// Parent of the node at `preorder_index`, as a pre-order index.
    pub fn parent_of(&self, preorder_index: usize) -> Option<usize> {
        self.parents.get(&preorder_index).copied()
    }
}

fn collect_preorder<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    out.push(node);
    for child in node.children() {
        collect_preorder(child, out);
    }
}

/// Convert a parse result into a [`Tree`].
///
/// This is the standard entry point: it builds the default conversion
/// registry, computes trivia attachment from the token stream, converts
/// from the root, and indexes parent links.
pub fn build_tree(
    source: &str,
    output: &ParseOutput,
    deadline: Deadline,
) -> Result<Tree, ConvertError> {
    let registry = ConversionRegistry::standard();
    build_tree_with(&registry, source, output, deadline)
}

/// Convert with a caller-supplied registry.
pub fn build_tree_with(
    registry: &ConversionRegistry,
    source: &str,
    output: &ParseOutput,
    deadline: Deadline,
) -> Result<Tree, ConvertError> {
    let trivia = TriviaMap::build(source, &output.tokens);
    let converter = Converter::new(registry, &output.arena, source, &trivia, deadline);
    let root = converter.convert_node(output.root)?;

    let mut parents = FxHashMap::default();
    index_parents(&root, None, &mut 0, &mut parents);

    Ok(Tree {
        source: Arc::from(source),
        root,
        line_index: LineIndex::new(source),
        parents,
    })
}

fn index_parents(
    node: &Node,
    parent: Option<usize>,
    next: &mut usize,
    out: &mut FxHashMap<usize, usize>,
) {
    let index = *next;
    *next += 1;
    if let Some(parent_index) = parent {
        out.insert(index, parent_index);
    }
    for child in node.children() {
        index_parents(child, Some(index), next, out);
    }
}
