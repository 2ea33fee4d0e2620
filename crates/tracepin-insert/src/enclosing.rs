//! Names of the class and function around a selection

use crate::parents::ParentMap;
use crate::paths::member_path;
use tracepin_ast::{walk, NodeKind, SourceNode};

/// Innermost named class and function whose lines contain `line`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnclosingNames {
    pub class: Option<String>,
    pub function: Option<String>,
}

pub fn enclosing_names(ast: &SourceNode, document: &str, line: usize) -> EnclosingNames {
    let parents = ParentMap::build(ast);
    let mut names = EnclosingNames::default();
    // Pre-order visits outer nodes first, so later hits are deeper
    walk(ast, &mut |node| {
        if !node.contains_line(line) {
            return false;
        }
        match node.kind {
            NodeKind::ClassDeclaration | NodeKind::ClassExpression => {
                if let Some(name) = class_name(node, &parents) {
                    names.class = Some(name);
                }
            }
            kind if kind.is_function_like() => {
                if let Some(name) = function_name(node, &parents, document) {
                    names.function = Some(name);
                }
            }
            _ => {}
        }
        false
    });
    names
}

fn class_name<'a>(class: &'a SourceNode, parents: &ParentMap<'a>) -> Option<String> {
    class
        .child("id")
        .and_then(|id| id.name())
        .or_else(|| declared_as(class, parents))
        .map(str::to_string)
}

fn function_name(function: &SourceNode, parents: &ParentMap<'_>, document: &str) -> Option<String> {
    match function.kind {
        NodeKind::ClassMethod | NodeKind::ObjectMethod => function.child("key").and_then(key_name),
        _ => {
            if let Some(name) = function.child("id").and_then(|id| id.name()) {
                return Some(name.to_string());
            }
            let parent = parents.parent(function)?;
            match parent.kind {
                NodeKind::VariableDeclarator => declared_as(function, parents).map(str::to_string),
                NodeKind::ObjectProperty | NodeKind::ClassProperty => {
                    parent.child("key").and_then(key_name)
                }
                NodeKind::AssignmentExpression => {
                    parent.child("left").and_then(|left| member_path(left, document))
                }
                _ => None,
            }
        }
    }
}

/// `Foo` in `const Foo = <node>`.
fn declared_as<'a>(node: &SourceNode, parents: &ParentMap<'a>) -> Option<&'a str> {
    let parent = parents.parent(node)?;
    (parent.kind == NodeKind::VariableDeclarator)
        .then(|| parent.child("id"))
        .flatten()
        .and_then(|id| id.name())
}

fn key_name(key: &SourceNode) -> Option<String> {
    match key.kind {
        NodeKind::Identifier | NodeKind::PrivateName => key.name().map(str::to_string),
        NodeKind::StringLiteral => key.str_field("value").map(str::to_string),
        _ => None,
    }
}
