use serde::Serialize;

use styler_common::span::Span;

use crate::attributes::AttributeTables;
use crate::error::ArenaError;
use crate::node_kind::NodeKind;

/// A small integer handle addressing a node in a [`NodeArena`].
///
/// The all-ones value is reserved as the null sentinel; it distinguishes
/// "no parent" / "no reference" and is never a valid argument to a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    /// The null sentinel.
    pub const NULL: NodeId = NodeId(u32::MAX);

    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index value.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the null sentinel.
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// Fixed per-node record width in bytes: kind (1), start (4), end (4),
/// child-list handle (4 + 4). Attribute side tables are accounted
/// separately and only where a node needs them.
pub const NODE_RECORD_BYTES: usize = 17;

const DEFAULT_CAPACITY: usize = 256;

/// Handle into the shared child-index buffer: a slice of `count` child ids
/// starting at `offset`.
#[derive(Debug, Clone, Copy, Default)]
struct ChildHandle {
    offset: u32,
    count: u32,
}

/// Dense, index-addressed storage for parse-tree nodes.
///
/// Node records are stored as parallel arrays (kind, start, end, child
/// handle); the child handle addresses a slice of a flat child-id buffer.
/// Appending a child to a parent whose slice is not at the tail of the
/// buffer relocates that parent's slice, keeping appends amortized O(1).
///
/// Capacity grows geometrically (doubling) and growth preserves every
/// previously written kind, range, child, and attribute value. [`close`]
/// releases all backing storage; reads after close fail with
/// [`ArenaError::Closed`].
///
/// [`close`]: NodeArena::close
pub struct NodeArena {
    kinds: Vec<NodeKind>,
    starts: Vec<u32>,
    ends: Vec<u32>,
    child_handles: Vec<ChildHandle>,
    child_ids: Vec<NodeId>,
    attributes: AttributeTables,
    capacity: usize,
    closed: bool,
}

impl NodeArena {
    /// Create an arena with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY).expect("default capacity is non-zero")
    }

    /// Create an arena with an explicit initial capacity.
    ///
    /// Rejects a zero capacity with [`ArenaError::ZeroCapacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        if capacity == 0 {
            return Err(ArenaError::ZeroCapacity);
        }
        Ok(Self {
            kinds: Vec::with_capacity(capacity),
            starts: Vec::with_capacity(capacity),
            ends: Vec::with_capacity(capacity),
            child_handles: Vec::with_capacity(capacity),
            child_ids: Vec::new(),
            attributes: AttributeTables::default(),
            capacity,
            closed: false,
        })
    }

    // ── Allocation ─────────────────────────────────────────────────────

    /// Allocate a node, returning its index.
    ///
    /// The byte range is validated here; allocation either commits the full
    /// record or nothing.
    pub fn allocate(&mut self, kind: NodeKind, start: u32, end: u32) -> Result<NodeId, ArenaError> {
        self.ensure_open()?;
        if start > end {
            return Err(ArenaError::InvalidRange { start, end });
        }
        if self.kinds.len() == self.capacity {
            // Geometric growth; the parallel arrays preserve their contents.
            self.capacity *= 2;
        }
        let id = NodeId::new(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.starts.push(start);
        self.ends.push(end);
        self.child_handles.push(ChildHandle::default());
        Ok(id)
    }

    /// Append `child` to `parent`'s child list.
    ///
    /// Children enumerate in append order. If the parent's existing slice is
    /// not at the tail of the child buffer, the slice is relocated first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), ArenaError> {
        self.check(parent)?;
        self.check(child)?;

        let handle = self.child_handles[parent.raw() as usize];
        let tail = self.child_ids.len() as u32;

        if handle.count == 0 {
            self.child_ids.push(child);
            self.child_handles[parent.raw() as usize] = ChildHandle {
                offset: tail,
                count: 1,
            };
        } else if handle.offset + handle.count == tail {
            // Slice is already at the tail; extend in place.
            self.child_ids.push(child);
            self.child_handles[parent.raw() as usize].count += 1;
        } else {
            // Relocate the slice to the tail, then extend.
            let from = handle.offset as usize..(handle.offset + handle.count) as usize;
            self.child_ids.extend_from_within(from);
            self.child_ids.push(child);
            self.child_handles[parent.raw() as usize] = ChildHandle {
                offset: tail,
                count: handle.count + 1,
            };
        }
        Ok(())
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// The kind of the given node.
    pub fn kind_of(&self, id: NodeId) -> Result<NodeKind, ArenaError> {
        self.check(id)?;
        Ok(self.kinds[id.raw() as usize])
    }

    /// The byte range of the given node.
    pub fn range_of(&self, id: NodeId) -> Result<Span, ArenaError> {
        self.check(id)?;
        let index = id.raw() as usize;
        Ok(Span::new(self.starts[index], self.ends[index]))
    }

    /// The children of the given node, in append order.
    pub fn children_of(&self, id: NodeId) -> Result<&[NodeId], ArenaError> {
        self.check(id)?;
        let handle = self.child_handles[id.raw() as usize];
        Ok(&self.child_ids[handle.offset as usize..(handle.offset + handle.count) as usize])
    }

    /// Widen a node's recorded range to cover `span`.
    ///
    /// The parser uses this to finalize ranges once a construct's extent is
    /// known.
    pub fn widen_range(&mut self, id: NodeId, span: Span) -> Result<(), ArenaError> {
        self.check(id)?;
        let index = id.raw() as usize;
        self.starts[index] = self.starts[index].min(span.start);
        self.ends[index] = self.ends[index].max(span.end);
        Ok(())
    }

    /// Number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Current node capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Memory footprint of the fixed-width node records at current capacity.
    pub fn memory_usage(&self) -> usize {
        self.capacity * NODE_RECORD_BYTES
    }

    // ── Attributes ─────────────────────────────────────────────────────

    /// Attribute side tables for this arena.
    pub fn attributes(&self) -> &AttributeTables {
        &self.attributes
    }

    /// Validate `id` and return the attribute tables for writing.
    pub fn attributes_mut(&mut self, id: NodeId) -> Result<&mut AttributeTables, ArenaError> {
        self.check(id)?;
        Ok(&mut self.attributes)
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Bulk reset: drop every node and attribute, keep capacity.
    pub fn reset(&mut self) {
        self.kinds.clear();
        self.starts.clear();
        self.ends.clear();
        self.child_handles.clear();
        self.child_ids.clear();
        self.attributes = AttributeTables::default();
    }

    /// Release all backing storage. Every subsequent operation fails with
    /// [`ArenaError::Closed`].
    pub fn close(&mut self) {
        self.reset();
        self.kinds.shrink_to_fit();
        self.starts.shrink_to_fit();
        self.ends.shrink_to_fit();
        self.child_handles.shrink_to_fit();
        self.child_ids.shrink_to_fit();
        self.closed = true;
    }

    /// Whether [`close`](NodeArena::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ── Validation ─────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), ArenaError> {
        if self.closed {
            Err(ArenaError::Closed)
        } else {
            Ok(())
        }
    }

    /// Validate an id for reading or writing.
    pub(crate) fn check(&self, id: NodeId) -> Result<(), ArenaError> {
        self.ensure_open()?;
        if id.is_null() {
            return Err(ArenaError::NullIndex);
        }
        if id.raw() as usize >= self.kinds.len() {
            return Err(ArenaError::IndexOutOfBounds(id.raw()));
        }
        Ok(())
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
