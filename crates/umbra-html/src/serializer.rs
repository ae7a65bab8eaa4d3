//! HTML Serialization
//!
//! Two serializers live here:
//! - [`HtmlSerializer`] is the plain `innerHTML`/`outerHTML` dump: named-entity
//!   escaping, no shadow roots
//! - [`Fragments`] is the shadow-aware serializer: allowed shadow roots are
//!   written inline as `<template shadowrootmode="...">` placeholders so that
//!   [`crate::parse_html_unsafe`] can bring them back to life

use std::borrow::Cow;

use umbra_dom::encode::{encode_attribute_value, encode_text, escape_attribute_html, escape_text_html};
use umbra_dom::{is_raw_text_element, is_void_element, DomTree, ElementData, NodeData, NodeId, ShadowRootMode};

use crate::foreign::{ForeignSerializer, XML_SERIALIZER};

/// Which shadow roots [`get_html`] renders inline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Master switch; without it shadow roots are never rendered
    pub serializable_shadow_roots: bool,
    /// Allow-list of shadow root nodes to render
    pub shadow_roots: Vec<NodeId>,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render exactly the given shadow roots
    pub fn with_shadow_roots(roots: impl IntoIterator<Item = NodeId>) -> Self {
        Self::new().serializable_shadow_roots(true).shadow_roots(roots)
    }

    #[must_use]
    pub fn serializable_shadow_roots(mut self, enabled: bool) -> Self {
        self.serializable_shadow_roots = enabled;
        self
    }

    #[must_use]
    pub fn shadow_roots(mut self, roots: impl IntoIterator<Item = NodeId>) -> Self {
        self.shadow_roots = roots.into_iter().collect();
        self
    }

    /// Whether `shadow_root` is rendered inline
    pub fn allows(&self, shadow_root: NodeId) -> bool {
        self.serializable_shadow_roots && shadow_root.is_valid() && self.shadow_roots.contains(&shadow_root)
    }

    fn renders_shadow_roots(&self) -> bool {
        self.serializable_shadow_roots && self.shadow_roots.iter().any(|root| root.is_valid())
    }
}

/// Plain HTML serializer (innerHTML/outerHTML)
pub struct HtmlSerializer<'a> {
    foreign: &'a dyn ForeignSerializer,
}

impl Default for HtmlSerializer<'static> {
    fn default() -> Self {
        Self { foreign: &XML_SERIALIZER }
    }
}

impl HtmlSerializer<'static> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> HtmlSerializer<'a> {
    /// Serializer that hands SVG/MathML subtrees to `foreign`
    pub fn with_foreign(foreign: &'a dyn ForeignSerializer) -> Self {
        Self { foreign }
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, false, &mut output);
        output
    }

    /// Serialize a node and its descendants; `raw` marks text inside raw-text elements
    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, raw: bool, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot { .. } => {
                self.serialize_children(tree, node_id, output);
            }
            NodeData::Element(elem) if elem.is_foreign() => {
                output.push_str(&self.foreign.serialize(tree, node_id));
            }
            NodeData::Element(elem) => {
                output.push('<');
                output.push_str(&elem.name);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(&attr.name);
                    output.push_str("=\"");
                    output.push_str(&escape_attribute_html(&attr.value));
                    output.push('"');
                }
                output.push('>');

                if is_void_element(&elem.name) {
                    return;
                }
                let raw = is_raw_text_element(&elem.name);
                for (child, _) in tree.children(node_id) {
                    self.serialize_node(tree, child, raw, output);
                }
                output.push_str("</");
                output.push_str(&elem.name);
                output.push('>');
            }
            NodeData::Text(text) if raw => output.push_str(text),
            NodeData::Text(text) => output.push_str(&escape_text_html(text)),
            leaf => output.push_str(&leaf_markup(leaf)),
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        let raw = tree.element(parent_id).is_some_and(|e| !e.is_foreign() && is_raw_text_element(&e.name));
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, raw, output);
        }
    }
}

/// Markup of comments, CDATA sections, doctypes and processing instructions
fn leaf_markup(data: &NodeData) -> String {
    match data {
        NodeData::Comment(text) => format!("<!--{text}-->"),
        NodeData::CData(text) => format!("<![CDATA[{text}]]>"),
        NodeData::Doctype { name, .. } => format!("<!DOCTYPE {name}>"),
        NodeData::ProcessingInstruction { target, data } => format!("<?{target} {data}>"),
        _ => String::new(),
    }
}

/// Open tag with attribute values as numeric character references
fn open_tag(elem: &ElementData) -> String {
    let mut tag = String::with_capacity(elem.name.len() + 2);
    tag.push('<');
    tag.push_str(&elem.name);
    for attr in &elem.attrs {
        tag.push(' ');
        tag.push_str(&attr.name);
        tag.push_str("=\"");
        tag.push_str(&encode_attribute_value(&attr.value));
        tag.push('"');
    }
    tag.push('>');
    tag
}

/// Pending work of the fragment cursor
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Emit a node; its next sibling is scheduled first
    Visit(NodeId),
    /// `<template shadowrootmode="...">`
    OpenTemplate(ShadowRootMode),
    /// End tag of an element, or `</template>` for a shadow root
    Close(NodeId),
}

/// Lazy, shadow-aware serialization of a node's descendants.
///
/// Each call to `next` produces one fragment: a tag, a text run or a whole
/// foreign subtree. Ancestors are closed by popping pending `Close` steps,
/// so every open tag is closed once, after its last descendant.
pub struct Fragments<'a> {
    tree: &'a DomTree,
    options: &'a SerializeOptions,
    foreign: &'a dyn ForeignSerializer,
    legacy: Option<NodeId>,
    stack: Vec<Step>,
}

impl<'a> Fragments<'a> {
    fn new(
        tree: &'a DomTree,
        root: NodeId,
        options: &'a SerializeOptions,
        foreign: &'a dyn ForeignSerializer,
    ) -> Self {
        let mut fragments = Self {
            tree,
            options,
            foreign,
            legacy: None,
            stack: Vec::new(),
        };

        if !options.renders_shadow_roots() {
            fragments.legacy = Some(root);
        } else if let Some(first) = tree.first_child(root) {
            fragments.stack.push(Step::Visit(first));
        }
        fragments
    }

    fn visit(&mut self, id: NodeId) -> Option<Cow<'a, str>> {
        let (tree, options) = (self.tree, self.options);
        let node = tree.get(id)?;
        if let Some(next) = node.next_sibling.to_option() {
            self.stack.push(Step::Visit(next));
        }

        let elem = match &node.data {
            NodeData::Element(elem) if elem.is_foreign() => {
                return Some(Cow::Owned(self.foreign.serialize(tree, id)));
            }
            NodeData::Element(elem) => elem,
            NodeData::Text(text) => return Some(encode_text(text)),
            NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot { .. } => return None,
            leaf => return Some(Cow::Owned(leaf_markup(leaf))),
        };

        if !is_void_element(&elem.name) {
            self.stack.push(Step::Close(id));
            if let Some(first) = node.first_child.to_option() {
                self.stack.push(Step::Visit(first));
            }
        }
        if let Some(shadow) = tree.registry().lookup(id).filter(|s| options.allows(s.root)) {
            self.stack.push(Step::Close(shadow.root));
            if let Some(first) = tree.first_child(shadow.root) {
                self.stack.push(Step::Visit(first));
            }
            self.stack.push(Step::OpenTemplate(shadow.mode));
        }

        Some(Cow::Owned(open_tag(elem)))
    }

    fn close(&self, id: NodeId) -> Option<Cow<'a, str>> {
        match &self.tree.get(id)?.data {
            NodeData::ShadowRoot { .. } => Some(Cow::Borrowed("</template>")),
            NodeData::Element(elem) => Some(Cow::Owned(format!("</{}>", elem.name))),
            _ => None,
        }
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.legacy.take() {
            return Some(Cow::Owned(HtmlSerializer::with_foreign(self.foreign).serialize_inner(self.tree, root)));
        }

        while let Some(step) = self.stack.pop() {
            let fragment = match step {
                Step::Visit(id) => self.visit(id),
                Step::OpenTemplate(mode) => Some(Cow::Owned(format!("<template shadowrootmode=\"{mode}\">"))),
                Step::Close(id) => self.close(id),
            };
            if fragment.is_some() {
                return fragment;
            }
        }
        None
    }
}

/// Fragments of `root`'s descendants, foreign subtrees written as XML
pub fn fragments<'a>(tree: &'a DomTree, root: NodeId, options: &'a SerializeOptions) -> Fragments<'a> {
    Fragments::new(tree, root, options, &XML_SERIALIZER)
}

/// Fragments of `root`'s descendants with a caller-supplied foreign serializer
pub fn fragments_with<'a>(
    tree: &'a DomTree,
    root: NodeId,
    options: &'a SerializeOptions,
    foreign: &'a dyn ForeignSerializer,
) -> Fragments<'a> {
    Fragments::new(tree, root, options, foreign)
}

/// Serialize `node`'s descendants, rendering the shadow roots `options` allows
pub fn get_html(tree: &DomTree, node: NodeId, options: &SerializeOptions) -> String {
    fragments(tree, node, options).collect()
}

/// Utility: Get innerHTML of an element
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node)
}

/// Utility: Get outerHTML of an element
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node)
}
