//! Document - High-level document API

use crate::declarative::attach_declarative_shadow_roots;
use crate::{DomError, DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Set once declarative shadow roots have been attached
    initialized: bool,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_child_element(tree.root(), "html");
        let head = tree.create_child_element(html, "head");
        let body = tree.create_child_element(html, "body");

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            initialized: false,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            initialized: false,
        }
    }

    /// Locate html/head/body after the tree has been populated
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        self.html_element = tree
            .children(tree.root())
            .find(|(_, n)| n.as_element().is_some_and(|e| e.is_html("html")))
            .map_or(NodeId::NONE, |(id, _)| id);

        let child_named = |name: &str| {
            tree.children(self.html_element)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.is_html(name)))
                .map_or(NodeId::NONE, |(id, _)| id)
        };
        self.head_element = child_named("head");
        self.body_element = child_named("body");
    }

    /// Attach every declarative shadow root in the document.
    ///
    /// Stands in for the "document finished loading" notification: the
    /// embedder calls it once the tree is fully built. Only the first call
    /// does any work; it returns the number of shadow roots attached.
    pub fn initialize(&mut self) -> Result<usize, DomError> {
        if self.initialized {
            return Ok(0);
        }
        self.initialized = true;

        let root = if self.html_element.is_valid() {
            self.html_element
        } else {
            self.tree.root()
        };
        let attached = attach_declarative_shadow_roots(&mut self.tree, root)?;
        tracing::debug!("initialized {}: {} declarative shadow roots", self.url, attached);
        Ok(attached)
    }

    /// Whether [`Self::initialize`] has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.tree
            .elements_by_tag_name(self.head_element, "title")
            .first()
            .map(|&title| self.tree.text_content(title))
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
