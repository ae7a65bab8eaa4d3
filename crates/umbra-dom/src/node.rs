//! DOM Node
//!
//! Nodes link to each other through `NodeId`s instead of pointers, so the
//! whole tree lives in one arena and parent links never own anything.

use crate::NodeId;
use crate::shadow::ShadowRootMode;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a detached node carrying `data`
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(data: ElementData) -> Self {
        Self::new(NodeData::Element(data))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeData::Text(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::new(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Whether the node has at least one child
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_valid()
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Detached container for parsed fragments
    DocumentFragment,
    /// Root of a shadow tree, owned by `host`
    ShadowRoot {
        host: NodeId,
        mode: ShadowRootMode,
    },
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// CDATA section
    CData(String),
    /// Processing instruction
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

/// Element namespace
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
    Other(String),
}

impl Namespace {
    pub const HTML_URI: &'static str = "http://www.w3.org/1999/xhtml";
    pub const SVG_URI: &'static str = "http://www.w3.org/2000/svg";
    pub const MATHML_URI: &'static str = "http://www.w3.org/1998/Math/MathML";

    /// Map a namespace URI; the empty URI counts as HTML
    pub fn from_uri(uri: &str) -> Self {
        match uri {
            "" | Self::HTML_URI => Self::Html,
            Self::SVG_URI => Self::Svg,
            Self::MATHML_URI => Self::MathMl,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::Html => Self::HTML_URI,
            Self::Svg => Self::SVG_URI,
            Self::MathMl => Self::MATHML_URI,
            Self::Other(uri) => uri,
        }
    }

    /// Anything outside the HTML vocabulary is serialized opaquely
    #[inline]
    pub fn is_foreign(&self) -> bool {
        !matches!(self, Self::Html)
    }
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Namespace of the element
    pub namespace: Namespace,
    /// Local name; lowercase for HTML elements
    pub name: String,
    /// Attributes in document order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// HTML element; the tag name is canonicalized to lowercase
    pub fn new(name: &str) -> Self {
        Self {
            namespace: Namespace::Html,
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Element in an arbitrary namespace; foreign names keep their case (`foreignObject`)
    pub fn with_namespace(namespace: Namespace, name: &str) -> Self {
        let name = if namespace.is_foreign() {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };
        Self {
            namespace,
            name,
            attrs: Vec::new(),
        }
    }

    /// Whether this element belongs to a foreign vocabulary
    #[inline]
    pub fn is_foreign(&self) -> bool {
        self.namespace.is_foreign()
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check if the attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, keeping the position of an existing one
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value;
            return;
        }
        self.attrs.push(Attribute::new(name, value));
    }

    /// Remove an attribute, returning its value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Whether this is an HTML element with the given local name
    #[inline]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name as written (`class`, `xlink:href`)
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr",
    "img", "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (content is never escaped)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Whether an HTML element never has an end tag
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Whether an HTML element's text children are emitted verbatim
pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}
