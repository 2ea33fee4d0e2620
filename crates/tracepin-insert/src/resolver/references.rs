//! Does an expression subtree refer to the selected variable?

use crate::checkers::bindings::bound_identifier;
use crate::paths::{member_path, normalize_expression};
use std::collections::HashSet;
use tracepin_ast::{NodeId, NodeKind, SourceNode};
use tracing::warn;

/// Deepest recursion a single search may reach.
pub const MAX_REFERENCE_DEPTH: usize = 1000;

/// One reference query; the visited set is per query.
pub struct ReferenceSearch<'d> {
    document: &'d str,
    variable: &'d str,
    /// `variable` with whitespace removed, for whole-expression selections
    normalized: String,
    /// First identifier of a path selection (`user` for `user.name`)
    root_name: &'d str,
    visited: HashSet<NodeId>,
    exhausted: bool,
}

impl<'d> ReferenceSearch<'d> {
    pub fn new(document: &'d str, variable: &'d str) -> Self {
        let root_name = variable
            .split(['.', '?', '[', '(', '!'])
            .next()
            .unwrap_or(variable)
            .trim();
        Self {
            document,
            variable,
            normalized: normalize_expression(variable),
            root_name,
            visited: HashSet::new(),
            exhausted: false,
        }
    }

    /// Whether the search gave up at the depth cap.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn references(&mut self, node: &SourceNode) -> bool {
        self.visit(node, 0)
    }

    fn visit(&mut self, node: &SourceNode, depth: usize) -> bool {
        if depth >= MAX_REFERENCE_DEPTH {
            if !self.exhausted {
                warn!(
                    depth = MAX_REFERENCE_DEPTH,
                    variable = self.variable,
                    "Reference search hit the depth limit"
                );
            }
            self.exhausted = true;
            return false;
        }
        if self.exhausted || !self.visited.insert(node.id) {
            return false;
        }

        match node.kind {
            NodeKind::Identifier => return node.name() == Some(self.variable),
            NodeKind::MemberExpression => {
                if member_path(node, self.document).as_deref() == Some(self.variable)
                    || self.is_whole_expression(node)
                {
                    return true;
                }
            }
            NodeKind::ObjectExpression
            | NodeKind::ArrayExpression
            | NodeKind::CallExpression
            | NodeKind::NewExpression
            | NodeKind::BinaryExpression
            | NodeKind::LogicalExpression
            | NodeKind::ConditionalExpression
            | NodeKind::TemplateLiteral
            | NodeKind::TaggedTemplateExpression => {
                if self.is_whole_expression(node) {
                    return true;
                }
            }
            kind if kind.is_function_like() => {
                // A parameter with the same name hides the outer binding
                if node
                    .list("params")
                    .iter()
                    .any(|param| bound_identifier(param, self.root_name).is_some())
                {
                    return false;
                }
            }
            // Property keys are names, not references
            NodeKind::ObjectProperty if !node.flag("computed") && !node.flag("shorthand") => {
                return node
                    .child("value")
                    .is_some_and(|value| self.visit(value, depth + 1));
            }
            _ => {}
        }

        for child in node.children() {
            if self.visit(child, depth + 1) {
                return true;
            }
        }
        false
    }

    fn is_whole_expression(&self, node: &SourceNode) -> bool {
        !self.normalized.is_empty() && normalize_expression(node.text(self.document)) == self.normalized
    }
}
