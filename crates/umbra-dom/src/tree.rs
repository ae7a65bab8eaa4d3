//! DOM Tree (arena-based allocation)
//!
//! Every node lives in one `Vec` slot addressed by its `NodeId`. Slots are
//! never reused: destroying a node empties its slot, so stale ids resolve
//! to `None` instead of aliasing a newer node.
//!
//! The slot vector therefore only grows. A destroyed node costs one empty
//! `Option<Node>` slot, so a tree whose markup is replaced over and over
//! (for example through repeated `set_html_unsafe` calls) grows with the
//! number of nodes ever created, not with the number alive. Long-lived
//! callers that churn content should rebuild the tree to reclaim it.

use crate::node::{ElementData, Namespace, Node, NodeData};
use crate::shadow::{ShadowRegistry, ShadowRoot, ShadowRootInit, ShadowRootMode};
use crate::tree_walker::{TreeWalker, WhatToShow};
use crate::{DomError, NodeId};

/// Elements that may host a shadow root besides custom elements
const SHADOW_HOST_ELEMENTS: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "main", "nav", "p", "section", "span",
];

/// Arena-based DOM tree.
///
/// `len` counts live nodes; `slots` counts every id handed out so far.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Option<Node>>,
    live: usize,
    registry: ShadowRegistry,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::document())],
            live: 1,
            registry: ShadowRegistry::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes in the tree
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of ids handed out, live or destroyed
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Shadow roots attached in this tree, including closed ones
    pub fn registry(&self) -> &ShadowRegistry {
        &self.registry
    }

    // --- Node creation ---

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.live += 1;
        id
    }

    /// Create a detached HTML element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(ElementData::new(name)))
    }

    /// Create a detached element in `namespace`
    pub fn create_element_ns(&mut self, namespace: Namespace, name: &str) -> NodeId {
        self.push(Node::element(ElementData::with_namespace(namespace, name)))
    }

    /// Create a detached element from prepared data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(Node::element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Create a detached CDATA section
    pub fn create_cdata(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::CData(text.to_string())))
    }

    /// Create a detached DOCTYPE
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    /// Create a detached processing instruction
    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.push(Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        }))
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::new(NodeData::DocumentFragment))
    }

    // --- Navigation ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.to_option()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child.to_option()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling.to_option()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling.to_option()
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// First child that is an element
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).find(|(_, n)| n.is_element()).map(|(id, _)| id)
    }

    /// Whether `ancestor` is `node` or one of its ancestors (shadow boundaries are not crossed)
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node.to_option();
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Pre-order traversal of `root`'s descendants
    pub fn descendants(&self, root: NodeId) -> TreeWalker<'_> {
        TreeWalker::new(self, root, WhatToShow::ALL)
    }

    /// Elements under `root` with the given HTML tag name, in document order
    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        TreeWalker::new(self, root, WhatToShow::ELEMENT)
            .filter(|&id| self.tag_name(id) == Some(tag.as_str()))
            .collect()
    }

    // --- Element access ---

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.get_mut(id)
            .ok_or(DomError::NodeNotFound(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?
            .set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.get_mut(id)?.as_element_mut()?.remove_attr(name)
    }

    /// Concatenated text of all text and CDATA descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(|n| n.as_text()) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            match self.get(node).map(|n| &n.data) {
                Some(NodeData::Text(t)) | Some(NodeData::CData(t)) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    // --- Mutation ---

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` before `reference` (or at the end if `reference` is NONE)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) {
            return Err(DomError::NodeNotFound(parent));
        }
        let child_node = self.get(child).ok_or(DomError::NodeNotFound(child))?;
        let unparentable = matches!(
            child_node.data,
            NodeData::Document | NodeData::ShadowRoot { .. }
        );
        if unparentable || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if reference.is_valid() && self.parent(reference) != Some(parent) {
            return Err(DomError::NodeNotFound(reference));
        }
        if reference == child {
            return Ok(());
        }

        self.detach(child);
        self.link(parent, child, reference);
        Ok(())
    }

    /// Create an element and append it to `parent`, which must be live
    pub(crate) fn create_child_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.create_element(name);
        self.link(parent, id, NodeId::NONE);
        id
    }

    /// Splice a detached `child` into `parent` before `reference`
    fn link(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.get(reference).map_or(NodeId::NONE, |n| n.prev_sibling)
        } else {
            self.get(parent).map_or(NodeId::NONE, |n| n.last_child)
        };

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if let Some(node) = self.get_mut(prev) {
            node.next_sibling = child;
        }
        if let Some(node) = self.get_mut(reference) {
            node.prev_sibling = child;
        }
        if let Some(node) = self.get_mut(parent) {
            if !prev.is_valid() {
                node.first_child = child;
            }
            if !reference.is_valid() {
                node.last_child = child;
            }
        }
    }

    /// Unlink a node from its parent; the node stays alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if let Some(p) = self.get_mut(prev) {
            p.next_sibling = next;
        }
        if let Some(n) = self.get_mut(next) {
            n.prev_sibling = prev;
        }
        if let Some(p) = self.get_mut(parent) {
            if p.first_child == id {
                p.first_child = next;
            }
            if p.last_child == id {
                p.last_child = prev;
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Move every child of `from` to the end of `to`, preserving order
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        while let Some(child) = self.first_child(from) {
            self.append_child(to, child)?;
        }
        Ok(())
    }

    /// Free a node, its descendants and every shadow tree hosted within.
    ///
    /// Registry records of destroyed hosts are dropped with them.
    pub fn destroy(&mut self, id: NodeId) {
        if id == NodeId::ROOT || !self.contains(id) {
            return;
        }
        if let Some(host) = self.host(id) {
            self.registry.remove(host);
        }
        self.detach(id);

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get_mut(current.0 as usize).and_then(Option::take) else {
                continue;
            };
            self.live -= 1;

            let mut child = node.first_child;
            while let Some(c) = self.get(child) {
                pending.push(child);
                child = c.next_sibling;
            }
            if node.is_element() {
                if let Some(shadow) = self.registry.remove(current) {
                    pending.push(shadow.root);
                }
            }
        }
    }

    /// Destroy all children of `id`
    pub fn clear_children(&mut self, id: NodeId) {
        while let Some(child) = self.first_child(id) {
            self.destroy(child);
        }
    }

    // --- Shadow DOM ---

    /// Whether an element may host a shadow root
    pub fn can_attach_shadow(&self, host: NodeId) -> bool {
        self.element(host).is_some_and(|e| {
            e.namespace == Namespace::Html
                && (is_valid_custom_element_name(&e.name)
                    || SHADOW_HOST_ELEMENTS.contains(&e.name.as_str()))
        })
    }

    /// Attach a shadow root to `host` and record it in the registry
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> Result<NodeId, DomError> {
        let node = self.get(host).ok_or(DomError::NodeNotFound(host))?;
        if !node.is_element() {
            return Err(DomError::NotAnElement(host));
        }
        if !self.can_attach_shadow(host) {
            return Err(DomError::NotSupported(host));
        }
        if self.registry.lookup(host).is_some() {
            return Err(DomError::AlreadyAttached(host));
        }

        let root = self.push(Node::new(NodeData::ShadowRoot { host, mode: init.mode }));
        self.registry.register(host, ShadowRoot::from_init(host, root, init));
        tracing::trace!("attached {} shadow root {:?} to {:?}", init.mode, root, host);
        Ok(root)
    }

    /// Open shadow root of `host`; closed roots are only visible through [`Self::registry`]
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.registry
            .lookup(host)
            .filter(|s| s.mode == ShadowRootMode::Open)
            .map(|s| s.root)
    }

    /// Host element of a shadow root node
    pub fn host(&self, shadow_root: NodeId) -> Option<NodeId> {
        match self.get(shadow_root)?.data {
            NodeData::ShadowRoot { host, .. } => Some(host),
            _ => None,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Custom element names start with a lowercase ASCII letter and contain a hyphen
fn is_valid_custom_element_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "annotation-xml", "color-profile", "font-face", "font-face-src",
        "font-face-uri", "font-face-format", "font-face-name", "missing-glyph",
    ];
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && !name.chars().any(|c| c.is_ascii_uppercase())
        && !RESERVED.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_navigate() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_text("b");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(tree.parent(div), Some(tree.root()));
        assert_eq!(tree.first_child(div), Some(a));
        assert_eq!(tree.last_child(div), Some(b));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.text_content(div), "ab");
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let first = tree.create_element("li");
        let second = tree.create_element("li");
        tree.append_child(ul, second).unwrap();
        tree.insert_before(ul, first, second).unwrap();

        let ids: Vec<_> = tree.children(ul).map(|(id, _)| id).collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { parent: inner, child: outer })
        );
    }

    #[test]
    fn test_reparent_detaches() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let child = tree.create_element("span");
        tree.append_child(a, child).unwrap();
        tree.append_child(b, child).unwrap();

        assert_eq!(tree.first_child(a), None);
        assert_eq!(tree.first_child(b), Some(child));
    }

    #[test]
    fn test_destroy_frees_subtree() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        assert_eq!(tree.len(), 3);

        tree.destroy(div);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(span));
        assert_eq!(tree.first_child(tree.root()), None);
    }

    #[test]
    fn test_custom_element_names() {
        assert!(is_valid_custom_element_name("my-tag"));
        assert!(!is_valid_custom_element_name("div"));
        assert!(!is_valid_custom_element_name("font-face"));
        assert!(!is_valid_custom_element_name("-tag"));
    }
}
