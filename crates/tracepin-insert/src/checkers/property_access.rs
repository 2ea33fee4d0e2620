//! Selections that name a property rather than a binding
//!
//! Three shapes are recognized, tried in this order:
//! 1. an object literal key (`fullName` in `const person = { profile: { fullName } }`),
//! 2. a dotted member property (`person.profile.fullName`),
//! 3. a computed member with a string key (`person['fullName']`).
//!
//! Each hit reports the reconstructed access path so the debug statement
//! prints `person.profile.fullName` instead of the bare key.

use super::{CheckContext, CheckOutcome, PatternChecker};
use crate::parents::ParentMap;
use crate::paths::member_path;
use tracepin_ast::{walk, NodeKind, SourceNode};
use tracepin_foundation::{LogMessageType, LogMetadata};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct RawPropertyAccessChecker;

impl PatternChecker for RawPropertyAccessChecker {
    fn log_message_type(&self) -> LogMessageType {
        LogMessageType::RawPropertyAccess
    }

    fn check(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        let parents = ParentMap::build_filtered(ctx.ast, is_path_container);

        let hit = object_key_path(ctx, &parents)
            .or_else(|| dotted_member_path(ctx))
            .or_else(|| computed_member_path(ctx));

        match hit {
            Some((path, line)) => {
                debug!(path = %path, line, "Resolved property access path");
                CheckOutcome::matched_with(LogMetadata::with_path(path).line(line))
            }
            None => CheckOutcome::unmatched(),
        }
    }
}

fn is_path_container(node: &SourceNode) -> bool {
    matches!(
        node.kind,
        NodeKind::ObjectProperty
            | NodeKind::MemberExpression
            | NodeKind::ObjectExpression
            | NodeKind::ObjectPattern
            | NodeKind::VariableDeclaration
            | NodeKind::VariableDeclarator
    )
}

/// Static key text of an object property: identifiers and string keys.
fn key_name<'a>(property: &'a SourceNode) -> Option<&'a str> {
    if property.flag("computed") {
        return None;
    }
    let key = property.child("key")?;
    match key.kind {
        NodeKind::Identifier => key.name(),
        NodeKind::StringLiteral => key.str_field("value"),
        _ => None,
    }
}

fn object_key_path(ctx: &CheckContext<'_>, parents: &ParentMap<'_>) -> Option<(String, usize)> {
    let mut result = None;
    walk(ctx.ast, &mut |node| {
        if node.kind != NodeKind::ObjectProperty
            || key_name(node) != Some(ctx.variable)
            || node.child("key").map(|k| k.start_line()) != Some(ctx.selection_line)
        {
            return false;
        }
        // Keys of a destructuring pattern bind names; they are not accesses
        if parents.parent(node).map(|p| p.kind) == Some(NodeKind::ObjectPattern) {
            return false;
        }
        result = path_to_declarator(node, parents);
        result.is_some()
    });
    result
}

/// Climbs from an object literal property to the declarator that owns the
/// literal, collecting keys on the way. A chain cut short by the ancestor
/// guards yields `None`.
fn path_to_declarator(property: &SourceNode, parents: &ParentMap<'_>) -> Option<(String, usize)> {
    let mut segments = vec![key_name(property)?.to_string()];
    for ancestor in parents.ancestors(property) {
        match ancestor.kind {
            NodeKind::ObjectExpression => {}
            NodeKind::ObjectProperty => segments.push(key_name(ancestor)?.to_string()),
            NodeKind::VariableDeclarator => {
                let root = ancestor.child("id").filter(|id| id.kind == NodeKind::Identifier)?;
                segments.push(root.name()?.to_string());
                segments.reverse();
                return Some((segments.join("."), ancestor.start_line()));
            }
            _ => return None,
        }
    }
    None
}

fn dotted_member_path(ctx: &CheckContext<'_>) -> Option<(String, usize)> {
    member_hit(ctx, |member| {
        let property = member.child("property")?;
        let object = member.child("object")?;
        (!member.flag("computed")
            && property.name() == Some(ctx.variable)
            && property.start_line() == ctx.selection_line
            && object.kind != NodeKind::ThisExpression)
            .then_some(property.start_line())
    })
}

fn computed_member_path(ctx: &CheckContext<'_>) -> Option<(String, usize)> {
    member_hit(ctx, |member| {
        let property = member.child("property")?;
        (member.flag("computed")
            && property.kind == NodeKind::StringLiteral
            && property.str_field("value") == Some(ctx.variable)
            && property.start_line() == ctx.selection_line)
            .then_some(property.start_line())
    })
}

/// First member expression accepted by `accept`, rendered as a path.
fn member_hit<F>(ctx: &CheckContext<'_>, mut accept: F) -> Option<(String, usize)>
where
    F: FnMut(&SourceNode) -> Option<usize>,
{
    let mut result = None;
    walk(ctx.ast, &mut |node| {
        if node.kind != NodeKind::MemberExpression {
            return false;
        }
        let Some(line) = accept(node) else {
            return false;
        };
        result = member_path(node, ctx.document).map(|path| (path, line));
        result.is_some()
    });
    result
}
