//! Reference host renderer: slotmap-backed document with isolated subtrees,
//! selector queries, markup, and per-node listener tables.

pub mod node;
pub mod tree;
pub mod query;
pub mod markup;
mod host;

pub use node::{NodeData, NodeId, NodeKind, ShadowMode};
pub use tree::Document;

/// Errors from structural document operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node does not exist")]
    NodeNotFound,
    #[error("node is not an element")]
    NotAnElement,
    #[error("element already has a shadow root")]
    ShadowAlreadyAttached,
}
