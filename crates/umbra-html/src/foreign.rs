//! Foreign content serialization
//!
//! SVG and MathML subtrees are handed to a [`ForeignSerializer`] and emitted
//! as one opaque piece of markup; shadow roots are never looked up inside them.

use umbra_dom::encode::{escape_xml_attribute, escape_xml_text};
use umbra_dom::{DomTree, Namespace, NodeData, NodeId};

/// Serializes an element outside the HTML namespace, including itself
pub trait ForeignSerializer {
    fn serialize(&self, tree: &DomTree, element: NodeId) -> String;
}

/// Generic XML serializer for foreign subtrees.
///
/// Declares the default namespace wherever it changes, and writes childless
/// elements as empty-element tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

/// Shared instance used when no serializer is supplied
pub static XML_SERIALIZER: XmlSerializer = XmlSerializer;

impl ForeignSerializer for XmlSerializer {
    fn serialize(&self, tree: &DomTree, element: NodeId) -> String {
        let mut out = String::new();
        write_node(tree, element, None, &mut out);
        out
    }
}

fn write_node(tree: &DomTree, id: NodeId, parent_ns: Option<&Namespace>, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Element(elem) => {
            out.push('<');
            out.push_str(&elem.name);
            if parent_ns != Some(&elem.namespace) {
                out.push_str(" xmlns=\"");
                out.push_str(&escape_xml_attribute(elem.namespace.uri()));
                out.push('"');
            }
            for attr in &elem.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&escape_xml_attribute(&attr.value));
                out.push('"');
            }

            if !node.has_children() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for (child, _) in tree.children(id) {
                write_node(tree, child, Some(&elem.namespace), out);
            }
            out.push_str("</");
            out.push_str(&elem.name);
            out.push('>');
        }
        NodeData::Text(text) => out.push_str(&escape_xml_text(text)),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            out.push(' ');
            out.push_str(data);
            out.push_str("?>");
        }
        NodeData::Doctype { .. } => {}
        NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot { .. } => {
            for (child, _) in tree.children(id) {
                write_node(tree, child, parent_ns, out);
            }
        }
    }
}
