//! Textual reconstruction of member access paths

use tracepin_ast::{NodeKind, SourceNode};

/// Renders `node` as an access path (`user?.profile.name`, `items[0]`).
///
/// Returns `None` for shapes that are not paths (literals, binary
/// expressions, ...). Optional links keep their `?.`; computed properties
/// are copied from the source verbatim.
pub fn member_path(node: &SourceNode, document: &str) -> Option<String> {
    match node.kind {
        NodeKind::Identifier | NodeKind::PrivateName => node.name().map(str::to_string),
        NodeKind::ThisExpression => Some("this".to_string()),
        NodeKind::Super => Some("super".to_string()),
        NodeKind::MemberExpression => {
            let object = member_path(node.child("object")?, document)?;
            let property = node.child("property")?;
            let optional = node.flag("optional");
            if node.flag("computed") {
                let link = if optional { "?." } else { "" };
                Some(format!("{object}{link}[{}]", property.text(document)))
            } else {
                let link = if optional { "?." } else { "." };
                Some(format!("{object}{link}{}", property.name()?))
            }
        }
        NodeKind::CallExpression => {
            let callee = member_path(node.child("callee")?, document)?;
            let link = if node.flag("optional") { "?." } else { "" };
            let args: Vec<&str> = node
                .list("arguments")
                .iter()
                .map(|arg| arg.text(document))
                .collect();
            Some(format!("{callee}{link}({})", args.join(", ")))
        }
        NodeKind::TSNonNullExpression => {
            member_path(node.child("expression")?, document).map(|inner| format!("{inner}!"))
        }
        kind if kind.is_type_wrapper() => member_path(node.child("expression")?, document),
        _ => None,
    }
}

/// Strips TypeScript wrappers (`as`, `satisfies`, `!`, `<T>x`).
pub fn unwrap_type_wrappers(node: &SourceNode) -> &SourceNode {
    let mut current = node;
    while current.kind.is_type_wrapper() {
        match current.child("expression") {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Collapses whitespace runs so differently formatted expressions compare equal.
pub fn normalize_expression(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracepin_ast::{find_first, parse_script};
    use tracepin_foundation::ScriptDialect;

    fn path_of(source: &str) -> Option<String> {
        let ast = parse_script(source, ScriptDialect::TypeScript).unwrap();
        let init = find_first(&ast, |n| n.kind == NodeKind::VariableDeclarator)
            .and_then(|d| d.child("init"))
            .unwrap();
        member_path(init, source)
    }

    #[test]
    fn test_renders_plain_and_optional_links() {
        assert_eq!(path_of("const a = user.profile.name;").as_deref(), Some("user.profile.name"));
        assert_eq!(path_of("const a = user?.profile.name;").as_deref(), Some("user?.profile.name"));
        assert_eq!(path_of("const a = this.state.items;").as_deref(), Some("this.state.items"));
    }

    #[test]
    fn test_renders_computed_and_wrapped_links() {
        assert_eq!(path_of("const a = map['key'].value;").as_deref(), Some("map['key'].value"));
        assert_eq!(path_of("const a = user!.id;").as_deref(), Some("user!.id"));
        assert_eq!(path_of("const a = list?.[0];").as_deref(), Some("list?.[0]"));
    }

    #[test]
    fn test_non_paths() {
        assert_eq!(path_of("const a = 1 + 2;"), None);
        assert_eq!(path_of("const a = { b: 1 };"), None);
    }

    #[test]
    fn test_normalize_expression() {
        assert_eq!(normalize_expression("{ a: 1,\n  b }"), "{a:1,b}");
    }
}
