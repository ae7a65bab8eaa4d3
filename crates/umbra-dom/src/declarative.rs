//! Declarative Shadow DOM
//!
//! Turns `<template shadowrootmode="open|closed">` placeholders left by the
//! parser into live shadow roots on their parent element.

use crate::tree_walker::{FilterResult, TreeWalker, WhatToShow};
use crate::{DomError, DomTree, NodeId, ShadowRootInit, ShadowRootMode};

/// Attribute marking a template as a declarative shadow root
pub const SHADOW_ROOT_MODE_ATTR: &str = "shadowrootmode";

/// Whether `node` is a `<template>` carrying a `shadowrootmode` attribute
pub fn is_declarative_template(tree: &DomTree, node: NodeId) -> bool {
    tree.element(node)
        .is_some_and(|e| e.is_html("template") && e.has_attr(SHADOW_ROOT_MODE_ATTR))
}

/// Placeholders under `root` in document order.
///
/// Template content is inert, so the walk does not descend into any
/// `<template>`; placeholders nested inside one are reached once their
/// enclosing placeholder has become a shadow root.
pub fn declarative_templates(tree: &DomTree, root: NodeId) -> Vec<NodeId> {
    let inert = |tree: &DomTree, node: NodeId| {
        let in_template = tree
            .parent(node)
            .and_then(|parent| tree.element(parent))
            .is_some_and(|e| e.is_html("template"));
        if in_template { FilterResult::Reject } else { FilterResult::Accept }
    };
    TreeWalker::with_filter(tree, root, WhatToShow::ELEMENT, inert)
        .filter(|&node| is_declarative_template(tree, node))
        .collect()
}

/// Convert every declarative placeholder under `root` into an attached shadow root.
///
/// For each placeholder: its parent becomes the host, its children move
/// into the new shadow root in order, the placeholder is destroyed, and the
/// new shadow root is processed the same way. Errors from the host
/// (invalid mode, unsupported host, double attachment) are returned as-is.
///
/// Returns the number of shadow roots attached; running it again on the
/// same tree attaches nothing.
pub fn attach_declarative_shadow_roots(tree: &mut DomTree, root: NodeId) -> Result<usize, DomError> {
    let mut attached = 0;

    for template in declarative_templates(tree, root) {
        let mode: ShadowRootMode = tree
            .get_attribute(template, SHADOW_ROOT_MODE_ATTR)
            .unwrap_or_default()
            .parse()?;
        let host = tree.parent(template).ok_or(DomError::NotSupported(template))?;

        let shadow_root = tree.attach_shadow(host, ShadowRootInit::declarative(mode))?;
        tree.move_children(template, shadow_root)?;
        tree.destroy(template);
        tracing::trace!("declarative {} shadow root {:?} on {:?}", mode, shadow_root, host);

        attached += 1 + attach_declarative_shadow_roots(tree, shadow_root)?;
    }

    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(tree: &mut DomTree, parent: NodeId, mode: &str) -> NodeId {
        let template = tree.create_element("template");
        tree.set_attribute(template, SHADOW_ROOT_MODE_ATTR, mode).unwrap();
        tree.append_child(parent, template).unwrap();
        template
    }

    #[test]
    fn test_attach_moves_content() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-tag");
        tree.append_child(tree.root(), host).unwrap();
        let template = placeholder(&mut tree, host, "open");
        let p = tree.create_element("p");
        let text = tree.create_text("after");
        tree.append_child(template, p).unwrap();
        tree.append_child(template, text).unwrap();

        assert_eq!({ let root = tree.root(); attach_declarative_shadow_roots(&mut tree, root) }, Ok(1));

        let shadow = tree.shadow_root(host).unwrap();
        let children: Vec<_> = tree.children(shadow).map(|(id, _)| id).collect();
        assert_eq!(children, [p, text]);
        assert!(!tree.contains(template));
        assert_eq!(tree.first_child(host), None);
    }

    #[test]
    fn test_nested_placeholders() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("outer-tag");
        tree.append_child(tree.root(), outer).unwrap();
        let outer_template = placeholder(&mut tree, outer, "open");
        let inner = tree.create_element("inner-tag");
        tree.append_child(outer_template, inner).unwrap();
        placeholder(&mut tree, inner, "closed");

        assert_eq!(declarative_templates(&tree, tree.root()), [outer_template]);
        assert_eq!({ let root = tree.root(); attach_declarative_shadow_roots(&mut tree, root) }, Ok(2));

        let inner_shadow = tree.registry().lookup(inner).unwrap();
        assert_eq!(inner_shadow.mode, ShadowRootMode::Closed);
        assert!(inner_shadow.declarative);
        assert_eq!(tree.shadow_root(inner), None);
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut tree = DomTree::new();
        let host = tree.create_element("div");
        tree.append_child(tree.root(), host).unwrap();
        placeholder(&mut tree, host, "open");

        assert_eq!({ let root = tree.root(); attach_declarative_shadow_roots(&mut tree, root) }, Ok(1));
        let count = tree.len();
        assert_eq!({ let root = tree.root(); attach_declarative_shadow_roots(&mut tree, root) }, Ok(0));
        assert_eq!(tree.len(), count);
    }

    #[test]
    fn test_invalid_mode_propagates() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-tag");
        tree.append_child(tree.root(), host).unwrap();
        placeholder(&mut tree, host, "sideways");

        assert_eq!(
            { let root = tree.root(); attach_declarative_shadow_roots(&mut tree, root) },
            Err(DomError::InvalidMode("sideways".to_string()))
        );
    }

    #[test]
    fn test_double_attachment_propagates() {
        let mut tree = DomTree::new();
        let host = tree.create_element("my-tag");
        tree.append_child(tree.root(), host).unwrap();
        placeholder(&mut tree, host, "open");
        placeholder(&mut tree, host, "open");

        assert_eq!(
            { let root = tree.root(); attach_declarative_shadow_roots(&mut tree, root) },
            Err(DomError::AlreadyAttached(host))
        );
    }
}
