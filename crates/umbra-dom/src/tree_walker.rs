//! TreeWalker
//!
//! Pre-order traversal of a subtree with `whatToShow` masking and an
//! accept/skip/reject filter callback. The walk never leaves `root` and
//! never crosses into shadow trees.

use crate::node::NodeData;
use crate::{DomTree, NodeId};

/// What types of nodes to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFFFFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const CDATA_SECTION: WhatToShow = WhatToShow(0x8);
    pub const PROCESSING_INSTRUCTION: WhatToShow = WhatToShow(0x40);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);
    pub const DOCUMENT: WhatToShow = WhatToShow(0x100);
    pub const DOCUMENT_TYPE: WhatToShow = WhatToShow(0x200);
    pub const DOCUMENT_FRAGMENT: WhatToShow = WhatToShow(0x400);

    /// Check if a node type is shown
    pub fn includes(self, node_type: NodeType) -> bool {
        let flag = match node_type {
            NodeType::Element => Self::ELEMENT.0,
            NodeType::Text => Self::TEXT.0,
            NodeType::CDataSection => Self::CDATA_SECTION.0,
            NodeType::ProcessingInstruction => Self::PROCESSING_INSTRUCTION.0,
            NodeType::Comment => Self::COMMENT.0,
            NodeType::Document => Self::DOCUMENT.0,
            NodeType::DocumentType => Self::DOCUMENT_TYPE.0,
            NodeType::DocumentFragment => Self::DOCUMENT_FRAGMENT.0,
        };
        (self.0 & flag) != 0
    }

    /// Union of two WhatToShow filters
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }
}

impl Default for WhatToShow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    CDataSection,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    /// Document fragments and shadow roots
    DocumentFragment,
}

impl NodeType {
    pub fn of(data: &NodeData) -> Self {
        match data {
            NodeData::Document => NodeType::Document,
            NodeData::DocumentFragment | NodeData::ShadowRoot { .. } => NodeType::DocumentFragment,
            NodeData::Doctype { .. } => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::CData(_) => NodeType::CDataSection,
            NodeData::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }
}

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Accept the node
    Accept,
    /// Skip this node and its descendants
    Reject,
    /// Skip this node but process its children
    Skip,
}

/// Node filter for custom filtering
pub trait NodeFilter {
    /// Accept, skip or reject a node
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> FilterResult;
}

impl<F> NodeFilter for F
where
    F: Fn(&DomTree, NodeId) -> FilterResult,
{
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> FilterResult {
        self(tree, node)
    }
}

/// TreeWalker for navigating the DOM tree
pub struct TreeWalker<'a> {
    tree: &'a DomTree,
    /// The root node of the traversal
    root: NodeId,
    /// What types of nodes to show
    what_to_show: WhatToShow,
    /// Current node position
    current_node: NodeId,
    /// Custom filter (optional)
    filter: Option<Box<dyn NodeFilter + 'a>>,
}

impl<'a> TreeWalker<'a> {
    /// Create a new TreeWalker positioned at `root`
    pub fn new(tree: &'a DomTree, root: NodeId, what_to_show: WhatToShow) -> Self {
        Self {
            tree,
            root,
            what_to_show,
            current_node: root,
            filter: None,
        }
    }

    /// Create with a custom filter
    pub fn with_filter(
        tree: &'a DomTree,
        root: NodeId,
        what_to_show: WhatToShow,
        filter: impl NodeFilter + 'a,
    ) -> Self {
        Self {
            tree,
            root,
            what_to_show,
            current_node: root,
            filter: Some(Box::new(filter)),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get the current node
    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    /// Set the current node
    pub fn set_current_node(&mut self, node: NodeId) {
        self.current_node = node;
    }

    /// Check if a node is accepted by filters
    fn is_accepted(&self, node: NodeId) -> FilterResult {
        let Some(data) = self.tree.get(node).map(|n| &n.data) else {
            return FilterResult::Reject;
        };
        if !self.what_to_show.includes(NodeType::of(data)) {
            return FilterResult::Skip;
        }
        match &self.filter {
            Some(filter) => filter.accept_node(self.tree, node),
            None => FilterResult::Accept,
        }
    }

    /// Move to the closest accepted ancestor within root
    pub fn parent_node(&mut self) -> Option<NodeId> {
        let mut node = self.current_node;
        while node != self.root {
            node = self.tree.parent(node)?;
            if self.is_accepted(node) == FilterResult::Accept {
                self.current_node = node;
                return Some(node);
            }
        }
        None
    }

    /// Move to the first accepted child, descending through skipped nodes
    pub fn first_child(&mut self) -> Option<NodeId> {
        let mut node = self.tree.first_child(self.current_node)?;
        loop {
            match self.is_accepted(node) {
                FilterResult::Accept => {
                    self.current_node = node;
                    return Some(node);
                }
                FilterResult::Skip => {
                    if let Some(child) = self.tree.first_child(node) {
                        node = child;
                        continue;
                    }
                }
                FilterResult::Reject => {}
            }
            // Advance to the next sibling, climbing out of skipped parents
            loop {
                if let Some(sibling) = self.tree.next_sibling(node) {
                    node = sibling;
                    break;
                }
                let parent = self.tree.parent(node)?;
                if parent == self.root || parent == self.current_node {
                    return None;
                }
                node = parent;
            }
        }
    }

    /// Move to the next accepted sibling of the current node
    pub fn next_sibling(&mut self) -> Option<NodeId> {
        if self.current_node == self.root {
            return None;
        }
        let mut node = self.current_node;
        loop {
            let mut sibling = self.tree.next_sibling(node);
            while let Some(candidate) = sibling {
                node = candidate;
                let result = self.is_accepted(node);
                if result == FilterResult::Accept {
                    self.current_node = node;
                    return Some(node);
                }
                sibling = self.tree.first_child(node);
                if result == FilterResult::Reject || sibling.is_none() {
                    sibling = self.tree.next_sibling(node);
                }
            }
            node = self.tree.parent(node)?;
            if node == self.root || self.is_accepted(node) == FilterResult::Accept {
                return None;
            }
        }
    }

    /// Move to the next accepted node in document order
    pub fn next_node(&mut self) -> Option<NodeId> {
        let mut node = self.current_node;
        let mut result = FilterResult::Accept;
        loop {
            while result != FilterResult::Reject {
                let Some(child) = self.tree.first_child(node) else {
                    break;
                };
                node = child;
                result = self.is_accepted(node);
                if result == FilterResult::Accept {
                    self.current_node = node;
                    return Some(node);
                }
            }

            let mut temporary = node;
            loop {
                if temporary == self.root {
                    return None;
                }
                if let Some(sibling) = self.tree.next_sibling(temporary) {
                    node = sibling;
                    break;
                }
                temporary = self.tree.parent(temporary)?;
            }

            result = self.is_accepted(node);
            if result == FilterResult::Accept {
                self.current_node = node;
                return Some(node);
            }
        }
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.next_node()
    }
}
