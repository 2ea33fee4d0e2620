//! Child-to-parent links kept outside the tree

use std::collections::{HashMap, HashSet};
use tracepin_ast::{walk, NodeId, SourceNode};
use tracing::warn;

/// Longest ancestor chain followed before giving up.
pub const MAX_ANCESTOR_HOPS: usize = 1000;

/// Parent links for one tree, built in a single walk.
#[derive(Debug, Default)]
pub struct ParentMap<'a> {
    parents: HashMap<NodeId, &'a SourceNode>,
}

impl<'a> ParentMap<'a> {
    /// Links every node to its parent.
    pub fn build(root: &'a SourceNode) -> Self {
        Self::build_filtered(root, |_| true)
    }

    /// Links only children of nodes accepted by `keep_parent`.
    pub fn build_filtered<F>(root: &'a SourceNode, keep_parent: F) -> Self
    where
        F: Fn(&SourceNode) -> bool,
    {
        let mut parents = HashMap::new();
        walk(root, &mut |node: &'a SourceNode| {
            if keep_parent(node) {
                for child in node.children() {
                    parents.insert(child.id, node);
                }
            }
            false
        });
        Self { parents }
    }

    pub fn parent(&self, node: &SourceNode) -> Option<&'a SourceNode> {
        self.parents.get(&node.id).copied()
    }

    /// Ancestors of `node`, nearest first.
    ///
    /// Stops after [`MAX_ANCESTOR_HOPS`] or when a node repeats.
    pub fn ancestors(&self, node: &SourceNode) -> Vec<&'a SourceNode> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([node.id]);
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if !visited.insert(parent.id) {
                warn!(node = parent.id.0, "Cycle in parent links, stopping climb");
                break;
            }
            if chain.len() >= MAX_ANCESTOR_HOPS {
                warn!(hops = MAX_ANCESTOR_HOPS, "Ancestor climb hit the hop limit");
                break;
            }
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }
}
