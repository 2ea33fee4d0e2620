use super::bindings::bound_identifier;
use super::{CheckContext, CheckOutcome, PatternChecker};
use tracepin_ast::{walk, SourceNode};
use tracepin_foundation::LogMessageType;

/// The innermost function-like node with a parameter named `variable`
/// written on `line`.
pub fn find_parameter_owner<'a>(
    ast: &'a SourceNode,
    line: usize,
    variable: &str,
) -> Option<&'a SourceNode> {
    let mut owner: Option<&'a SourceNode> = None;
    walk(ast, &mut |node: &'a SourceNode| {
        if node.kind.is_function_like()
            && node.contains_line(line)
            && binds_parameter(node, line, variable)
            && owner.map_or(true, |current| node.len() < current.len())
        {
            owner = Some(node);
        }
        false
    });
    owner
}

fn binds_parameter(function: &SourceNode, line: usize, variable: &str) -> bool {
    function
        .list("params")
        .iter()
        .filter_map(|param| bound_identifier(param, variable))
        .any(|ident| ident.start_line() == line)
}

/// Matches parameters of functions, arrows, methods and constructors,
/// including defaults, rest elements, destructuring and TS parameter
/// properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionParameterChecker;

impl PatternChecker for FunctionParameterChecker {
    fn log_message_type(&self) -> LogMessageType {
        LogMessageType::FunctionParameter
    }

    fn check(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::from_bool(
            find_parameter_owner(ctx.ast, ctx.selection_line, ctx.variable).is_some(),
        )
    }
}
