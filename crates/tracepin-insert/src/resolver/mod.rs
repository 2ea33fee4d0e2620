//! Insertion-point resolution
//!
//! Turns a classification into the zero-based line the debug statement goes
//! on. Besides the line, a [`Resolution`] names the line whose indentation
//! the statement copies and whether the structural transformer has to be
//! consulted first.

pub mod brackets;
pub mod references;
pub mod statements;

use crate::checkers::bindings::find_binding;
use crate::checkers::parameter::find_parameter_owner;
use references::ReferenceSearch;
use serde::Serialize;
use statements::{compound_block, enclosing_line, enclosing_node};
use tracepin_ast::{NodeKind, SourceNode};
use tracepin_foundation::{LogMessage, LogMessageType};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Zero-based line the statement is inserted before
    pub target_line: usize,
    /// Line whose indentation the statement copies
    pub anchor_line: usize,
    /// The statement opens a block, so it is indented one step deeper
    /// than the anchor
    pub inside_block: bool,
    /// Try the structural transformer before inserting at `target_line`
    pub needs_transform: bool,
}

impl Resolution {
    fn after(target_line: usize, anchor_line: usize) -> Self {
        Self {
            target_line,
            anchor_line,
            inside_block: false,
            needs_transform: false,
        }
    }

    fn transform(mut self) -> Self {
        self.needs_transform = true;
        self
    }
}

/// Resolves where the debug statement for `message` belongs.
pub fn resolve_insertion(
    ast: &SourceNode,
    document: &str,
    message: &LogMessage,
    line: usize,
    variable: &str,
) -> Resolution {
    let resolution = match message.log_message_type {
        LogMessageType::FunctionParameter => resolve_parameter(ast, line, variable),
        LogMessageType::NamedFunctionAssignment => {
            resolve_assignment(ast, line, variable).map(|resolution| {
                if bound_function_is_empty(ast, document, line, variable) {
                    resolution.transform()
                } else {
                    resolution
                }
            })
        }
        t if t.is_assignment() => resolve_assignment(ast, line, variable),
        _ => None,
    };

    let resolution = resolution.unwrap_or_else(|| {
        resolve_default(
            ast,
            document,
            message.effective_line(line),
            message.effective_variable(variable),
        )
    });
    debug!(
        log_message_type = %message.log_message_type,
        target_line = resolution.target_line,
        needs_transform = resolution.needs_transform,
        "Insertion point resolved"
    );
    resolution
}

/// Line after the statement that binds the selection.
fn resolve_assignment(ast: &SourceNode, line: usize, variable: &str) -> Option<Resolution> {
    let binding = find_binding(ast, line, variable)?;
    let statement = enclosing_node(ast, binding.node)?;
    Some(place_around(statement, line))
}

fn bound_function_is_empty(ast: &SourceNode, document: &str, line: usize, variable: &str) -> bool {
    find_binding(ast, line, variable)
        .and_then(|binding| binding.value)
        .and_then(|value| value.child("body"))
        .is_some_and(|body| is_empty_block(body, document))
}

/// A `{}` block with nothing but whitespace between the braces.
pub fn is_empty_block(body: &SourceNode, document: &str) -> bool {
    if body.kind != NodeKind::BlockStatement || !body.list("body").is_empty() {
        return false;
    }
    let text = body.text(document);
    text.len() >= 2 && text[1..text.len() - 1].trim().is_empty()
}

/// First line inside the body of the function the selection is a
/// parameter of.
fn resolve_parameter(ast: &SourceNode, line: usize, variable: &str) -> Option<Resolution> {
    let owner = find_parameter_owner(ast, line, variable)?;
    let body = owner.child("body")?;

    if owner.flag("expression") || body.kind != NodeKind::BlockStatement {
        return Some(Resolution::after(line + 1, line).transform());
    }

    let resolution = block_entry(body);
    let empty = body.list("body").is_empty();
    if empty || body.start_line() == body.end_line() {
        Some(resolution.transform())
    } else {
        Some(resolution)
    }
}

/// The line after a block's opening brace, indented like the block's
/// first statement when it has one on a later line.
fn block_entry(block: &SourceNode) -> Resolution {
    let target_line = block.start_line() + 1;
    match block.list("body").first() {
        Some(first) if first.start_line() > block.start_line() => {
            Resolution::after(target_line, first.start_line())
        }
        _ => Resolution {
            target_line,
            anchor_line: block.start_line(),
            inside_block: true,
            needs_transform: false,
        },
    }
}

/// Placement relative to a statement containing `line`.
fn place_around(statement: &SourceNode, line: usize) -> Resolution {
    match compound_block(statement) {
        Some(block) if line <= block.start_line() => block_entry(block),
        _ => Resolution::after(statement.end_line() + 1, statement.start_line()),
    }
}

/// Placement for selections that are not bindings: property accesses,
/// method-call chains and everything unclassified.
fn resolve_default(ast: &SourceNode, document: &str, line: usize, variable: &str) -> Resolution {
    let enclosing = enclosing_line(ast, line);
    let statement = match enclosing.statement {
        Some(statement) if !enclosing.interior => statement,
        _ => {
            let (target_line, anchor_line) = brackets::bracket_fallback(document, line);
            return Resolution::after(target_line, anchor_line);
        }
    };

    if statement.kind == NodeKind::ReturnStatement {
        return resolve_return(statement, document, line, variable);
    }
    place_around(statement, line)
}

/// A statement after a `return` never runs, so a returned variable is
/// logged just before the `return`.
fn resolve_return(statement: &SourceNode, document: &str, line: usize, variable: &str) -> Resolution {
    let Some(argument) = statement.child("argument") else {
        return Resolution::after(line + 1, line);
    };
    let mut search = ReferenceSearch::new(document, variable);
    let referenced = search.references(argument);
    if search.exhausted() {
        debug!(line, "Reference search gave up, placing after the selection");
    }
    if referenced {
        Resolution::after(statement.start_line(), statement.start_line())
    } else {
        Resolution::after(line + 1, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassificationChain;
    use crate::checkers::CheckContext;
    use tracepin_ast::parse_script;
    use tracepin_foundation::ScriptDialect;

    fn resolve(source: &str, line: usize, variable: &str) -> Resolution {
        let ast = parse_script(source, ScriptDialect::TypeScript).unwrap();
        let message = ClassificationChain::default().classify(&CheckContext {
            ast: &ast,
            document: source,
            selection_line: line,
            variable,
        });
        resolve_insertion(&ast, source, &message, line, variable)
    }

    #[test]
    fn test_assignment_goes_below_the_whole_statement() {
        let source = "const items = [\n  1,\n  2,\n];\nnext();";
        let resolution = resolve(source, 0, "items");
        assert_eq!(resolution, Resolution::after(4, 0));
    }

    #[test]
    fn test_parameter_goes_inside_the_body() {
        let source = "function area(\n  width,\n  height,\n) {\n  return width * height;\n}";
        let resolution = resolve(source, 2, "height");
        assert_eq!(resolution.target_line, 4);
        assert_eq!(resolution.anchor_line, 4);
        assert!(!resolution.needs_transform);
    }

    #[test]
    fn test_return_too_deep_to_search_falls_back_below_the_selection() {
        use crate::parents::test_trees::{lines, TreeBuilder};
        use references::MAX_REFERENCE_DEPTH;

        let mut trees = TreeBuilder::default();
        let leaf = trees.ident("x");
        let argument = trees.nested_arrays(MAX_REFERENCE_DEPTH + 10, leaf);
        let mut ret = trees.node(NodeKind::ReturnStatement).with_loc(lines(3, 3));
        ret.push_node("argument", Some(argument));

        assert_eq!(resolve_return(&ret, "", 3, "x"), Resolution::after(4, 3));

        let leaf = trees.ident("x");
        let argument = trees.nested_arrays(3, leaf);
        let mut ret = trees.node(NodeKind::ReturnStatement).with_loc(lines(3, 3));
        ret.push_node("argument", Some(argument));
        assert_eq!(resolve_return(&ret, "", 3, "x"), Resolution::after(3, 3));
    }

    #[test]
    fn test_nested_return_example() {
        let source = "function outer(data) {\n  function inner(data) {\n    return data;\n  }\n  return inner(data);\n}";
        assert_eq!(resolve(source, 0, "data").target_line, 1);
    }

    #[test]
    fn test_return_referencing_the_selection() {
        let source = "function f(user) {\n  const x = 1;\n  return user.profile.name;\n}";
        let resolution = resolve(source, 2, "name");
        assert_eq!(resolution.target_line, 2);
    }

    #[test]
    fn test_return_not_referencing_the_selection() {
        let source = "function f() {\n  return compute(a);\n}";
        assert_eq!(resolve(source, 1, "b").target_line, 2);
    }

    #[test]
    fn test_empty_and_expression_bodies_need_transform() {
        assert!(resolve("function greet(x) {}", 0, "x").needs_transform);
        assert!(resolve("const f = (x) => x * 2;", 0, "x").needs_transform);
        assert!(resolve("const noop = () => {};", 0, "noop").needs_transform);
        assert!(!resolve("const noop = () => {\n  run();\n};", 0, "noop").needs_transform);
    }

    #[test]
    fn test_compound_statement_opens_its_block() {
        let source = "for (const item of list.items) {\n  use(item);\n}";
        let resolution = resolve(source, 0, "items");
        assert_eq!(resolution, Resolution::after(1, 1));
    }

    #[test]
    fn test_empty_compound_block_is_entered_one_step_deeper() {
        let source = "if (user.active) {\n}";
        let resolution = resolve(source, 0, "active");
        assert_eq!(resolution.target_line, 1);
        assert!(resolution.inside_block);
        assert_eq!(resolution.anchor_line, 0);
    }

    #[test]
    fn test_deep_object_line_redirects_placement() {
        let source = "const person = {\n  profile: {\n    fullName: 'Ada',\n  },\n};";
        assert_eq!(resolve(source, 2, "fullName"), Resolution::after(5, 0));
    }
}
