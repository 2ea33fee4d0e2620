//! Checkers for selections bound to a value of a particular shape

use super::bindings::{find_binding, Binding};
use super::{CheckContext, CheckOutcome, PatternChecker};
use tracepin_ast::{NodeKind, SourceNode};
use tracepin_foundation::LogMessageType;

/// Shape of the bound value a checker is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerShape {
    /// `[a, b]`
    Array,
    /// `a + b`, `a ?? b`
    Binary,
    /// `load()`, `new Date()`, `await fetch(url)`
    PlainCall,
    /// `function () {}`, `() => {}`
    Function,
    /// `api.users.list()`
    MemberCall,
    /// `{ a: 1 }`
    Object,
    /// `user.profile`
    MemberAccess,
    /// `` `${a}` ``, `` gql`...` ``
    Template,
    /// `a ? b : c`
    Conditional,
}

impl InitializerShape {
    pub fn matches(&self, binding: &Binding<'_>) -> bool {
        match self {
            Self::Array => value_is(binding.value, &[NodeKind::ArrayExpression]),
            Self::Binary => value_is(
                binding.value,
                &[NodeKind::BinaryExpression, NodeKind::LogicalExpression],
            ),
            Self::PlainCall => binding.awaited_value().is_some_and(is_plain_call),
            Self::Function => value_is(
                binding.value,
                &[
                    NodeKind::FunctionExpression,
                    NodeKind::ArrowFunctionExpression,
                ],
            ),
            Self::MemberCall => binding.awaited_value().is_some_and(is_member_call),
            Self::Object => value_is(binding.value, &[NodeKind::ObjectExpression]),
            Self::MemberAccess => value_is(binding.value, &[NodeKind::MemberExpression]),
            Self::Template => value_is(
                binding.value,
                &[
                    NodeKind::TemplateLiteral,
                    NodeKind::TaggedTemplateExpression,
                ],
            ),
            Self::Conditional => value_is(binding.value, &[NodeKind::ConditionalExpression]),
        }
    }
}

fn value_is(value: Option<&SourceNode>, kinds: &[NodeKind]) -> bool {
    value.is_some_and(|v| kinds.contains(&v.kind))
}

/// A call whose callee is not a member chain, or any `new`.
fn is_plain_call(value: &SourceNode) -> bool {
    match value.kind {
        NodeKind::NewExpression => true,
        NodeKind::CallExpression => value
            .child("callee")
            .is_some_and(|callee| callee.kind != NodeKind::MemberExpression),
        _ => false,
    }
}

fn is_member_call(value: &SourceNode) -> bool {
    value.kind == NodeKind::CallExpression
        && value
            .child("callee")
            .is_some_and(|callee| callee.kind == NodeKind::MemberExpression)
}

/// Matches when the selection is bound on its line to a value of `shape`.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentChecker {
    log_message_type: LogMessageType,
    shape: InitializerShape,
}

impl AssignmentChecker {
    pub fn new(log_message_type: LogMessageType, shape: InitializerShape) -> Self {
        Self {
            log_message_type,
            shape,
        }
    }
}

impl PatternChecker for AssignmentChecker {
    fn log_message_type(&self) -> LogMessageType {
        self.log_message_type
    }

    fn check(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        let matched = find_binding(ctx.ast, ctx.selection_line, ctx.variable)
            .is_some_and(|binding| self.shape.matches(&binding));
        CheckOutcome::from_bool(matched)
    }
}

#[cfg(test)]
mod tests {
    use crate::checkers::test_support::matches;
    use tracepin_foundation::LogMessageType::*;

    #[test]
    fn test_array_assignment() {
        assert!(matches(ArrayAssignment, "const list = [1, 2, 3];", 0, "list"));
        assert!(!matches(ArrayAssignment, "const list = other;", 0, "list"));
    }

    #[test]
    fn test_binary_expression_includes_logical_operators() {
        assert!(matches(BinaryExpression, "const sum = a + b;", 0, "sum"));
        assert!(matches(BinaryExpression, "const name = input ?? 'anon';", 0, "name"));
        assert!(matches(BinaryExpression, "let ok;\nok = a && b;", 1, "ok"));
    }

    #[test]
    fn test_function_call_assignment() {
        assert!(matches(FunctionCallAssignment, "const data = load();", 0, "data"));
        assert!(matches(FunctionCallAssignment, "const res = await fetch(url);", 0, "res"));
        assert!(matches(FunctionCallAssignment, "const when = new Date();", 0, "when"));
        assert!(!matches(FunctionCallAssignment, "const users = api.users.list();", 0, "users"));
    }

    #[test]
    fn test_object_function_call_assignment() {
        assert!(matches(ObjectFunctionCallAssignment, "const users = api.users.list();", 0, "users"));
        assert!(matches(
            ObjectFunctionCallAssignment,
            "const json = await response.json();",
            0,
            "json"
        ));
        assert!(!matches(ObjectFunctionCallAssignment, "const data = load();", 0, "data"));
    }

    #[test]
    fn test_named_function_assignment() {
        assert!(matches(NamedFunctionAssignment, "const double = (n) => n * 2;", 0, "double"));
        assert!(matches(NamedFunctionAssignment, "const handler = function () {};", 0, "handler"));
        assert!(!matches(NamedFunctionAssignment, "function handler() {}", 0, "handler"));
    }

    #[test]
    fn test_object_literal_and_property_access() {
        assert!(matches(ObjectLiteral, "const config = {\n  debug: true,\n};", 0, "config"));
        assert!(matches(PropertyAccessAssignment, "const city = user.address.city;", 0, "city"));
        assert!(matches(PropertyAccessAssignment, "const city = user?.address;", 0, "city"));
    }

    #[test]
    fn test_template_and_ternary() {
        assert!(matches(TemplateString, "const greeting = `Hi ${name}`;", 0, "greeting"));
        assert!(matches(TemplateString, "const query = gql`{ users }`;", 0, "query"));
        assert!(matches(Ternary, "const label = done ? 'yes' : 'no';", 0, "label"));
    }

    #[test]
    fn test_selection_must_be_on_binding_line() {
        let source = "const list =\n  [1, 2];";
        assert!(matches(ArrayAssignment, source, 0, "list"));
        assert!(!matches(ArrayAssignment, source, 1, "list"));
    }
}
