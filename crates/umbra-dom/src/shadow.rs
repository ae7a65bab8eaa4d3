//! Shadow DOM
//!
//! Shadow root records, the host -> shadow root registry, and discovery of
//! every shadow root nested under a node.
//!
//! Key features:
//! - Shadow encapsulation (open/closed modes)
//! - Registry keeps closed roots reachable for serialization
//! - Records are dropped together with their host (see `DomTree::destroy`)
//! - Depth-first enumeration of shadow roots inside shadow roots

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::tree_walker::{TreeWalker, WhatToShow};
use crate::{DomError, DomTree, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl ShadowRootMode {
    /// Value of the `shadowrootmode` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ShadowRootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShadowRootMode {
    type Err = DomError;

    /// Enumerated attribute: ASCII case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("open") {
            Ok(Self::Open)
        } else if s.eq_ignore_ascii_case("closed") {
            Ok(Self::Closed)
        } else {
            Err(DomError::InvalidMode(s.to_string()))
        }
    }
}

/// Shadow root initialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    /// Created from a `<template shadowrootmode>` placeholder
    pub declarative: bool,
}

impl ShadowRootInit {
    pub fn new(mode: ShadowRootMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn open() -> Self {
        Self::new(ShadowRootMode::Open)
    }

    pub fn closed() -> Self {
        Self::new(ShadowRootMode::Closed)
    }

    /// Options used when a declarative placeholder is materialized
    pub fn declarative(mode: ShadowRootMode) -> Self {
        Self { mode, declarative: true }
    }
}

/// Shadow root record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRoot {
    /// Host element
    pub host: NodeId,
    /// The shadow root node in the arena
    pub root: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
    /// Whether this came from declarative shadow DOM
    pub declarative: bool,
}

impl ShadowRoot {
    /// Create from init options
    pub fn from_init(host: NodeId, root: NodeId, init: ShadowRootInit) -> Self {
        Self {
            host,
            root,
            mode: init.mode,
            declarative: init.declarative,
        }
    }
}

/// Host element -> shadow root association.
///
/// Keyed by the host's `NodeId`, which is never reused, and owned by the
/// `DomTree`: a record lives exactly as long as its host.
#[derive(Debug, Default)]
pub struct ShadowRegistry {
    roots: HashMap<NodeId, ShadowRoot>,
}

impl ShadowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a shadow root for `host`, returning the record it replaces
    pub fn register(&mut self, host: NodeId, shadow: ShadowRoot) -> Option<ShadowRoot> {
        self.roots.insert(host, shadow)
    }

    /// Shadow root of `host`, whatever its mode
    pub fn lookup(&self, host: NodeId) -> Option<&ShadowRoot> {
        self.roots.get(&host)
    }

    /// Drop the record of `host`
    pub fn remove(&mut self, host: NodeId) -> Option<ShadowRoot> {
        self.roots.remove(&host)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Lazy depth-first enumeration of shadow roots, see [`find_shadow_roots`]
pub struct ShadowRoots<'a> {
    tree: &'a DomTree,
    walkers: Vec<TreeWalker<'a>>,
}

impl<'a> Iterator for ShadowRoots<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let walker = self.walkers.last_mut()?;
            match walker.next() {
                Some(element) => {
                    if let Some(shadow) = self.tree.registry().lookup(element) {
                        self.walkers.push(TreeWalker::new(self.tree, shadow.root, WhatToShow::ELEMENT));
                        return Some(shadow.root);
                    }
                }
                None => {
                    self.walkers.pop();
                }
            }
        }
    }
}

/// Every shadow root reachable from `root`, in document order.
///
/// A shadow root is followed by the shadow roots nested inside it before the
/// outer walk resumes. Closed roots are included. `root`'s own shadow root is
/// not, since `root` itself is not part of the walk.
pub fn find_shadow_roots(tree: &DomTree, root: NodeId) -> ShadowRoots<'_> {
    ShadowRoots {
        tree,
        walkers: vec![TreeWalker::new(tree, root, WhatToShow::ELEMENT)],
    }
}
