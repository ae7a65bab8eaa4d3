//! DOM errors

use crate::NodeId;

/// Errors raised by tree mutation and shadow attachment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Element already has a shadow root
    #[error("element {0:?} already has a shadow root")]
    AlreadyAttached(NodeId),

    /// Element cannot have a shadow root attached
    #[error("element {0:?} does not support a shadow root")]
    NotSupported(NodeId),

    /// `shadowrootmode` value other than `open` / `closed`
    #[error("invalid shadow root mode: {0:?}")]
    InvalidMode(String),

    /// Node is not an element
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// Node does not exist (never created or destroyed)
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),

    /// Insertion would make a node its own ancestor
    #[error("cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
