//! Index-overlay storage for the Styler parse tree.
//!
//! The parser writes nodes into a [`NodeArena`]: structure-of-arrays storage
//! addressed by small integer [`NodeId`]s, with dense per-kind attribute side
//! tables. Tree structure is encoded as integer offsets into flat arrays
//! rather than pointer-linked objects, which keeps the hot per-node record
//! cache-dense and makes bulk release trivial.

mod arena;
mod attributes;
mod error;
mod node_kind;

pub use arena::{NodeArena, NodeId, NODE_RECORD_BYTES};
pub use attributes::{
    AttributeTables, ImportAttr, ModuleDeclAttr, ModuleImportAttr, PackageDirectiveAttr,
    ParameterAttr, ProvidesAttr, RequiresAttr, UsesAttr,
};
pub use error::ArenaError;
pub use node_kind::NodeKind;
