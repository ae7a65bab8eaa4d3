//! Umbra HTML
//!
//! Shadow-aware HTML on top of html5ever: parse markup into an `umbra-dom`
//! tree, bring declarative shadow roots to life, and serialize trees back
//! with selected shadow roots written inline.

mod error;
mod parser;
pub mod foreign;
pub mod serializer;

use umbra_dom::{attach_declarative_shadow_roots, Document, DomError, DomTree, NodeData, NodeId};

pub use error::HtmlError;
pub use foreign::{ForeignSerializer, XmlSerializer};
pub use parser::HtmlParser;
pub use serializer::{fragments, fragments_with, get_html, inner_html, outer_html, Fragments, HtmlSerializer, SerializeOptions};
pub use umbra_dom::find_shadow_roots;

/// Markup in and out of a tree, shadow roots included
pub trait Serializable {
    /// Serialize `node`'s descendants, rendering the shadow roots `options` allows
    fn get_html(&self, node: NodeId, options: &SerializeOptions) -> String;

    /// Replace `node`'s children with parsed markup and attach its declarative shadow roots
    fn set_html_unsafe(&mut self, node: NodeId, html: &str) -> Result<(), HtmlError>;
}

impl Serializable for DomTree {
    fn get_html(&self, node: NodeId, options: &SerializeOptions) -> String {
        serializer::get_html(self, node, options)
    }

    fn set_html_unsafe(&mut self, node: NodeId, html: &str) -> Result<(), HtmlError> {
        set_html_unsafe(self, node, html)
    }
}

impl Serializable for Document {
    fn get_html(&self, node: NodeId, options: &SerializeOptions) -> String {
        self.tree().get_html(node, options)
    }

    fn set_html_unsafe(&mut self, node: NodeId, html: &str) -> Result<(), HtmlError> {
        self.tree_mut().set_html_unsafe(node, html)
    }
}

/// Parse an HTML document and attach its declarative shadow roots
pub fn parse_html_unsafe(html: &str) -> Result<Document, HtmlError> {
    let mut document = HtmlParser::new().parse(html)?;
    document.initialize()?;
    Ok(document)
}

/// Parse an HTML document without touching its `<template>` elements
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Replace the children of `node` with `html`, attaching declarative shadow roots.
///
/// `node` must be an element, shadow root, fragment or document. The old
/// children are destroyed along with any shadow roots they hosted.
pub fn set_html_unsafe(tree: &mut DomTree, node: NodeId, html: &str) -> Result<(), HtmlError> {
    let container = tree.get(node).ok_or(DomError::NodeNotFound(node))?;
    if !matches!(
        container.data,
        NodeData::Element(_) | NodeData::ShadowRoot { .. } | NodeData::DocumentFragment | NodeData::Document
    ) {
        return Err(DomError::NotAnElement(node).into());
    }

    let fragment = HtmlParser::new().parse_fragment(tree, node, html)?;
    tree.clear_children(node);
    let moved = tree.move_children(fragment, node);
    tree.destroy(fragment);
    moved?;

    let attached = attach_declarative_shadow_roots(tree, node)?;
    tracing::debug!("set_html_unsafe on {:?}: {} declarative shadow roots", node, attached);
    Ok(())
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
