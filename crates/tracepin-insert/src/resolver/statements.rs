//! Finding the statement a selection belongs to

use tracepin_ast::{NodeKind, SourceNode};

/// Statements and class members a debug line can follow.
fn is_candidate(node: &SourceNode) -> bool {
    (node.kind.is_statement() && node.kind != NodeKind::BlockStatement)
        || node.kind == NodeKind::CatchClause
}

fn is_block_like(node: &SourceNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Program | NodeKind::BlockStatement | NodeKind::ClassBody
    )
}

/// The innermost statement around a line.
#[derive(Debug, Clone, Copy)]
pub struct Enclosing<'a> {
    pub statement: Option<&'a SourceNode>,
    /// The line lies strictly inside a block but in no statement of it
    /// (blank lines, comments, dangling fragments)
    pub interior: bool,
}

/// Deepest statement whose lines contain `line`.
pub fn enclosing_line(ast: &SourceNode, line: usize) -> Enclosing<'_> {
    let mut statement: Option<(&SourceNode, usize)> = None;
    let mut block_depth: Option<usize> = None;
    let mut stack = vec![(ast, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if !node.contains_line(line) {
            continue;
        }
        if is_candidate(node) && statement.map_or(true, |(_, d)| depth > d) {
            statement = Some((node, depth));
        }
        if is_block_like(node)
            && node.start_line() < line
            && line < node.end_line()
            && block_depth.map_or(true, |d| depth > d)
        {
            block_depth = Some(depth);
        }
        stack.extend(searchable_children(node).rev().map(|child| (child, depth + 1)));
    }

    let interior = match (statement, block_depth) {
        (Some((_, statement_depth)), Some(block_depth)) => block_depth > statement_depth,
        (None, _) => true,
        _ => false,
    };
    Enclosing {
        statement: statement.map(|(node, _)| node),
        interior,
    }
}

/// Children that may hold the statement; loop heads are skipped so
/// `for (const x of xs)` resolves to the loop, not its declaration.
fn searchable_children(node: &SourceNode) -> Box<dyn DoubleEndedIterator<Item = &SourceNode> + '_> {
    match node.kind {
        NodeKind::ForStatement | NodeKind::ForInStatement | NodeKind::ForOfStatement => {
            Box::new(node.child("body").into_iter())
        }
        _ => Box::new(node.children()),
    }
}

/// Deepest statement whose byte range contains `target`.
pub fn enclosing_node<'a>(ast: &'a SourceNode, target: &SourceNode) -> Option<&'a SourceNode> {
    let mut found = None;
    let mut current = ast;
    loop {
        if is_candidate(current) {
            found = Some(current);
        }
        if current.id == target.id {
            return found;
        }
        match current.children().find(|child| child.contains_range(target)) {
            Some(child) => current = child,
            None => return found,
        }
    }
}

/// The block a compound statement executes, when it is a `{ ... }` block.
pub fn compound_block(statement: &SourceNode) -> Option<&SourceNode> {
    let body = match statement.kind {
        NodeKind::IfStatement => statement.child("consequent"),
        NodeKind::ForStatement
        | NodeKind::ForInStatement
        | NodeKind::ForOfStatement
        | NodeKind::WhileStatement
        | NodeKind::WithStatement
        | NodeKind::CatchClause => statement.child("body"),
        _ => None,
    };
    body.filter(|b| b.kind == NodeKind::BlockStatement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracepin_ast::{find_first, parse_script};
    use tracepin_foundation::ScriptDialect;

    fn kind_at(source: &str, line: usize) -> (Option<NodeKind>, bool) {
        let ast = parse_script(source, ScriptDialect::TypeScript).unwrap();
        let enclosing = enclosing_line(&ast, line);
        (enclosing.statement.map(|s| s.kind), enclosing.interior)
    }

    #[test]
    fn test_innermost_statement() {
        let source = "function f(a) {\n  if (a) {\n    run(a);\n  }\n}";
        assert_eq!(kind_at(source, 0), (Some(NodeKind::FunctionDeclaration), false));
        assert_eq!(kind_at(source, 1), (Some(NodeKind::IfStatement), false));
        assert_eq!(kind_at(source, 2), (Some(NodeKind::ExpressionStatement), false));
    }

    #[test]
    fn test_blank_line_inside_a_block_is_interior() {
        let source = "function f() {\n\n  run();\n}";
        assert_eq!(kind_at(source, 1), (Some(NodeKind::FunctionDeclaration), true));
    }

    #[test]
    fn test_enclosing_node_of_a_declarator() {
        let source = "class A {\n  m() {\n    const x = [1];\n  }\n}";
        let ast = parse_script(source, ScriptDialect::TypeScript).unwrap();
        let declarator = find_first(&ast, |n| n.kind == NodeKind::VariableDeclarator).unwrap();
        let statement = enclosing_node(&ast, declarator).unwrap();
        assert_eq!(statement.kind, NodeKind::VariableDeclaration);
        assert_eq!(statement.start_line(), 2);
    }

    #[test]
    fn test_compound_block() {
        let ast = parse_script("for (const x of xs) {\n  use(x);\n}", ScriptDialect::JavaScript).unwrap();
        let statement = enclosing_line(&ast, 0).statement.unwrap();
        assert_eq!(compound_block(statement).map(|b| b.start_line()), Some(0));
    }
}
