//! Hierarchy graph construction.
//!
//! Nodes are registered in an [`Arena`], which is finalized into a
//! [`HierarchyGraph`] before any edge is wired. Wiring reads only the
//! finalized node set; the renderer reads only the wired graph.

mod arena;
mod graph;
mod node;

pub use arena::Arena;
pub use graph::HierarchyGraph;
pub use node::{ChildEdge, FileRef, HierarchyNode};
