//! Pre-order traversal over [`SourceNode`] trees
//!
//! The walk is iterative, so deeply nested input (long `a.b.c...` chains,
//! generated code) cannot overflow the stack.

use crate::node::SourceNode;

/// Visits `root` and every node below it in pre-order.
///
/// The visitor returns `true` to stop the whole traversal; `walk` then
/// returns `true` as well.
pub fn walk<'a, F>(root: &'a SourceNode, visitor: &mut F) -> bool
where
    F: FnMut(&'a SourceNode) -> bool,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if visitor(node) {
            return true;
        }
        stack.extend(node.children().rev());
    }
    false
}

/// First node in pre-order for which `predicate` holds.
pub fn find_first<'a, P>(root: &'a SourceNode, mut predicate: P) -> Option<&'a SourceNode>
where
    P: FnMut(&SourceNode) -> bool,
{
    let mut found = None;
    walk(root, &mut |node| {
        if predicate(node) {
            found = Some(node);
            true
        } else {
            false
        }
    });
    found
}

/// Every node for which `predicate` holds, in pre-order.
pub fn collect<'a, P>(root: &'a SourceNode, mut predicate: P) -> Vec<&'a SourceNode>
where
    P: FnMut(&SourceNode) -> bool,
{
    let mut out = Vec::new();
    walk(root, &mut |node| {
        if predicate(node) {
            out.push(node);
        }
        false
    });
    out
}

/// Mutable pre-order visit of every node, without early exit.
pub fn walk_mut<F>(root: &mut SourceNode, visitor: &mut F)
where
    F: FnMut(&mut SourceNode),
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visitor(node);
        let children: Vec<&mut SourceNode> = node.children_mut().collect();
        stack.extend(children.into_iter().rev());
    }
}
