//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to the arena tree. Template
//! contents are flattened into the `<template>` element's children, which is
//! where the declarative shadow DOM pass expects to find them.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace as HtmlNamespace, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use umbra_dom::{Attribute, Document, DomTree, ElementData, Namespace, NodeId};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = read(html)?;
        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root)?;

        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse markup into a detached document fragment of `tree`.
    ///
    /// The markup is parsed the way `innerHTML` parses it: in the context of
    /// `context` when that is an element, otherwise in the context of a
    /// `<body>`. Leading comments and whitespace are kept, and `<html>`,
    /// `<head>` and `<body>` tags inside the markup are ignored.
    pub fn parse_fragment(&self, tree: &mut DomTree, context: NodeId, html: &str) -> Result<NodeId, HtmlError> {
        let context_name = match tree.element(context) {
            Some(elem) => QualName::new(None, HtmlNamespace::from(elem.namespace.uri()), LocalName::from(&*elem.name)),
            None => QualName::new(None, HtmlNamespace::from(Namespace::HTML_URI), LocalName::from("body")),
        };
        let dom = parse_fragment(RcDom::default(), Default::default(), context_name, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        let fragment = tree.create_fragment();

        // The parsed nodes live under a synthetic <html> element
        let document = dom.document.children.borrow();
        if let Some(html_element) = document.iter().find(|h| is_element_named(h, "html")) {
            for child in html_element.children.borrow().iter() {
                self.convert_node(child, tree, fragment)?;
            }
        }

        tracing::trace!("Parsed fragment {:?} ({} bytes)", fragment, html.len());
        Ok(fragment)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> Result<(), HtmlError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id)?;
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let mut elem = ElementData::with_namespace(Namespace::from_uri(&name.ns), &name.local);
                elem.attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let attr_name = match &attr.name.prefix {
                            Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        Attribute::new(attr_name, attr.value.to_string())
                    })
                    .collect();

                let id = tree.create_element_with(elem);
                tree.append_child(parent, id)?;

                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id)?;
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
            }
            RcNodeData::ProcessingInstruction { target, contents } => {
                let id = tree.create_processing_instruction(target, contents);
                tree.append_child(parent, id)?;
            }
        }
        Ok(())
    }
}

fn read(html: &str) -> Result<RcDom, HtmlError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    Ok(dom)
}

fn is_element_named(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}
