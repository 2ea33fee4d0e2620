use super::{CheckContext, CheckOutcome, PatternChecker};
use crate::paths::member_path;
use tracepin_ast::{walk, NodeKind, SourceNode};
use tracepin_foundation::{LogMessageType, LogMetadata};

/// Matches a segment of the callee chain of a call that starts on the
/// selection line, e.g. `users` in `api.users.list()`.
///
/// The emitted path is the chain up to and including that segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyMethodCallChecker;

impl PatternChecker for PropertyMethodCallChecker {
    fn log_message_type(&self) -> LogMessageType {
        LogMessageType::PropertyMethodCall
    }

    fn check(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        let mut path = None;
        walk(ctx.ast, &mut |node| {
            if node.kind != NodeKind::CallExpression || node.start_line() != ctx.selection_line {
                return false;
            }
            path = node
                .child("callee")
                .filter(|callee| callee.kind == NodeKind::MemberExpression)
                .and_then(|callee| chain_prefix(callee, ctx.variable, ctx.document));
            path.is_some()
        });
        match path {
            Some(path) => CheckOutcome::matched_with(LogMetadata::with_path(path)),
            None => CheckOutcome::unmatched(),
        }
    }
}

/// Walks a callee chain from the outside in and renders the prefix that
/// ends at the segment named `variable`.
fn chain_prefix(callee: &SourceNode, variable: &str, document: &str) -> Option<String> {
    let mut current = callee;
    loop {
        match current.kind {
            NodeKind::MemberExpression => {
                let named = !current.flag("computed")
                    && current.child("property").and_then(|p| p.name()) == Some(variable);
                let object = current.child("object")?;
                // The outermost property is the method itself
                if named && current.id != callee.id {
                    return member_path(current, document);
                }
                current = object;
            }
            NodeKind::CallExpression => current = current.child("callee")?,
            kind if kind.is_type_wrapper() => current = current.child("expression")?,
            NodeKind::Identifier => {
                return (current.name() == Some(variable)).then(|| variable.to_string());
            }
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::checkers::test_support::{matches, run};
    use tracepin_foundation::LogMessageType::PropertyMethodCall;
    use tracepin_foundation::LogMetadata;

    fn path(source: &str, line: usize, variable: &str) -> Option<String> {
        run(PropertyMethodCall, source, line, variable)
            .metadata
            .and_then(|m: LogMetadata| m.deep_object_path)
    }

    #[test]
    fn test_segment_of_callee_chain() {
        assert_eq!(path("api.users.list();", 0, "users").as_deref(), Some("api.users"));
        assert_eq!(path("api.users.list();", 0, "api").as_deref(), Some("api"));
    }

    #[test]
    fn test_chain_through_calls() {
        assert_eq!(
            path("store.get('a').items.forEach(fn);", 0, "items").as_deref(),
            Some("store.get('a').items")
        );
    }

    #[test]
    fn test_method_name_and_other_lines_do_not_match() {
        assert!(!matches(PropertyMethodCall, "api.users.list();", 0, "list"));
        assert!(!matches(PropertyMethodCall, "\napi.users.list();", 0, "users"));
        assert!(!matches(PropertyMethodCall, "load(users);", 0, "users"));
    }
}
