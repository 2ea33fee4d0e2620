//! Locating the declaration or assignment that binds the selection

use crate::paths::{member_path, unwrap_type_wrappers};
use tracepin_ast::{walk, NodeKind, SourceNode};

/// How the selection receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `const x = ...`, including names bound by destructuring
    Declarator,
    /// `x = ...`, `this.x = ...`
    Assignment,
    /// `class A { x = ... }`
    ClassProperty,
}

#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    pub kind: BindingKind,
    /// The declarator, assignment expression or class property
    pub node: &'a SourceNode,
    /// The bound name as written at the binding site
    pub target: &'a SourceNode,
    /// The assigned value with TypeScript wrappers removed
    pub value: Option<&'a SourceNode>,
}

impl<'a> Binding<'a> {
    /// The value with a leading `await` removed as well.
    pub fn awaited_value(&self) -> Option<&'a SourceNode> {
        let value = self.value?;
        if value.kind == NodeKind::AwaitExpression {
            value.child("argument").map(unwrap_type_wrappers)
        } else {
            Some(value)
        }
    }
}

/// The first binding of `variable` whose name sits on `line`.
pub fn find_binding<'a>(ast: &'a SourceNode, line: usize, variable: &str) -> Option<Binding<'a>> {
    let mut binding = None;
    walk(ast, &mut |node: &'a SourceNode| {
        if !node.contains_line(line) {
            return false;
        }
        binding = binding_at(node, line, variable);
        binding.is_some()
    });
    binding.map(|(kind, node, target, value)| Binding {
        kind,
        node,
        target,
        value: value.map(unwrap_type_wrappers),
    })
}

type RawBinding<'a> = (
    BindingKind,
    &'a SourceNode,
    &'a SourceNode,
    Option<&'a SourceNode>,
);

fn binding_at<'a>(node: &'a SourceNode, line: usize, variable: &str) -> Option<RawBinding<'a>> {
    match node.kind {
        NodeKind::VariableDeclarator => {
            let target = bound_identifier(node.child("id")?, variable)?;
            (target.start_line() == line).then_some((
                BindingKind::Declarator,
                node,
                target,
                node.child("init"),
            ))
        }
        NodeKind::AssignmentExpression => {
            let left = node.child("left")?;
            let target = match left.kind {
                NodeKind::MemberExpression => assigned_member(left, variable)?,
                _ => bound_identifier(left, variable)?,
            };
            (target.start_line() == line).then_some((
                BindingKind::Assignment,
                node,
                target,
                node.child("right"),
            ))
        }
        NodeKind::ClassProperty => {
            let key = node.child("key")?;
            (key.name() == Some(variable) && key.start_line() == line).then_some((
                BindingKind::ClassProperty,
                node,
                key,
                node.child("value"),
            ))
        }
        _ => None,
    }
}

/// `this.count = ...` binds both `count` and `this.count`.
fn assigned_member<'a>(member: &'a SourceNode, variable: &str) -> Option<&'a SourceNode> {
    let property = member.child("property")?;
    if !member.flag("computed") && property.name() == Some(variable) {
        return Some(property);
    }
    // Path text needs no document for non-computed chains
    (member_path(member, "").as_deref() == Some(variable)).then_some(member)
}

/// The identifier named `variable` that `pattern` binds, at any depth.
pub fn bound_identifier<'a>(pattern: &'a SourceNode, variable: &str) -> Option<&'a SourceNode> {
    let mut stack = vec![pattern];
    while let Some(node) = stack.pop() {
        match node.kind {
            NodeKind::Identifier => {
                if node.name() == Some(variable) {
                    return Some(node);
                }
            }
            NodeKind::ObjectPattern => {
                for property in node.list("properties").iter().rev() {
                    match property.kind {
                        NodeKind::ObjectProperty => stack.extend(property.child("value")),
                        _ => stack.push(property),
                    }
                }
            }
            NodeKind::ArrayPattern => stack.extend(node.list("elements").iter().rev()),
            NodeKind::RestElement => stack.extend(node.child("argument")),
            NodeKind::AssignmentPattern => stack.extend(node.child("left")),
            NodeKind::TSParameterProperty => stack.extend(node.child("parameter")),
            _ => {}
        }
    }
    None
}
