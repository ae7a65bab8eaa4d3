//! Umbra DOM - Document Object Model
//!
//! Arena-backed node tree with shadow roots. Nodes are addressed by
//! [`NodeId`], shadow roots are tracked by a [`ShadowRegistry`] owned by
//! the tree, so closed shadow roots stay reachable for serialization.

mod node;
mod tree;
mod document;
mod error;
pub mod declarative;
pub mod encode;
pub mod shadow;
pub mod tree_walker;

pub use node::{Node, NodeData, ElementData, Attribute, Namespace, is_void_element, is_raw_text_element};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use error::DomError;
pub use shadow::{ShadowRoot, ShadowRootInit, ShadowRootMode, ShadowRegistry, ShadowRoots, find_shadow_roots};
pub use tree_walker::{TreeWalker, NodeFilter, FilterResult, WhatToShow, NodeType};
pub use declarative::attach_declarative_shadow_roots;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Null node ID
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Convert to `Option`, mapping `NONE` to `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    /// Raw arena index
    pub fn index(self) -> u32 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NONE
    }
}
