//! Structural rewrites for functions with nowhere to put a statement
//!
//! An expression-bodied arrow (`(x) => x * 2`) or an empty body
//! (`function greet(x) {}`) has no line a debug statement can be inserted
//! on. The transformer computes one text replacement over the original
//! document that opens a block and places the statement inside it. The tree
//! is never modified.

use crate::checkers::parameter::find_parameter_owner;
use crate::resolver::is_empty_block;
use tracepin_ast::{lines::indentation_of, NodeKind, SourceNode};
use tracepin_foundation::TransformationPlan;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    /// `(x) => expression`
    ArrowBody,
    /// `{}` with only whitespace inside
    EmptyBody,
    /// `{ statements }` written on a single line
    InlineBody,
}

/// A function whose body has to be rewritten.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub kind: SiteKind,
    pub function: &'a SourceNode,
    pub body: &'a SourceNode,
}

/// Finds the function that needs a rewrite for a parameter selection.
pub fn find_site<'a>(
    ast: &'a SourceNode,
    document: &str,
    line: usize,
    variable: &str,
) -> Option<Site<'a>> {
    let function = find_parameter_owner(ast, line, variable)?;
    let body = function.child("body")?;

    let kind = if function.kind == NodeKind::ArrowFunctionExpression && function.flag("expression") {
        SiteKind::ArrowBody
    } else if is_empty_block(body, document) {
        SiteKind::EmptyBody
    } else if body.kind == NodeKind::BlockStatement && body.start_line() == body.end_line() {
        SiteKind::InlineBody
    } else {
        return None;
    };
    debug!(site = ?kind, function = %function.kind, "Found transformation site");
    Some(Site {
        kind,
        function,
        body,
    })
}

impl<'a> Site<'a> {
    /// Zero-based line the debug statement lands on after the rewrite.
    pub fn statement_line(&self, document: &str) -> usize {
        let opening = match self.kind {
            SiteKind::ArrowBody => arrow_token(self.function, self.body, document)
                .map(|(_, end)| end)
                .unwrap_or(self.body.start),
            SiteKind::EmptyBody | SiteKind::InlineBody => self.body.start,
        };
        line_of(document, opening) + 1
    }

    /// The replacement placing `statement` in the rewritten body.
    ///
    /// `tab_size` spaces make one indentation step; the base indentation
    /// is the leading whitespace of the line the function starts on.
    pub fn render(&self, document: &str, statement: &str, tab_size: usize) -> Option<TransformationPlan> {
        let base = indentation_of(document, line_of(document, self.function.start));
        let inner = format!("{base}{}", " ".repeat(tab_size));
        let statement_block = indent_lines(statement, &inner);

        let (start, end, replacement_text) = match self.kind {
            SiteKind::ArrowBody => {
                let (_, arrow_end) = arrow_token(self.function, self.body, document)?;
                let head = document.get(self.function.start..arrow_end)?;
                let gap = document.get(arrow_end..self.body.start)?;
                let open_parens = count_outside_comments(gap, '(');
                let end = closing_parens_end(document, self.body.end, open_parens)
                    .unwrap_or(self.body.end);
                let parenthesized = open_parens > 0 && end != self.body.end;

                let comments = strip_parens(gap);
                let mut value = String::new();
                if !comments.is_empty() {
                    value.push_str(&comments);
                    value.push(' ');
                }
                let body_text = self.body.text(document);
                if parenthesized {
                    value.push('(');
                    value.push_str(body_text);
                    value.push(')');
                } else {
                    value.push_str(body_text);
                }
                (
                    self.function.start,
                    end,
                    format!("{head} {{\n{statement_block}\n{inner}return {value};\n{base}}}"),
                )
            }
            SiteKind::EmptyBody => (
                self.body.start,
                self.body.end,
                format!("{{\n{statement_block}\n{base}}}"),
            ),
            SiteKind::InlineBody => {
                let text = self.body.text(document);
                let content = text.get(1..text.len().saturating_sub(1))?.trim();
                (
                    self.body.start,
                    self.body.end,
                    format!("{{\n{statement_block}\n{inner}{content}\n{base}}}"),
                )
            }
        };

        Some(TransformationPlan {
            start,
            end,
            replacement_text,
            statement_line: self.statement_line(document),
        })
    }
}

/// One-shot form of [`find_site`] followed by [`Site::render`].
///
/// `None` means no rewrite applies and the caller inserts a line instead.
pub fn plan_transformation(
    ast: &SourceNode,
    document: &str,
    line: usize,
    variable: &str,
    statement: &str,
    tab_size: usize,
) -> Option<TransformationPlan> {
    find_site(ast, document, line, variable)?.render(document, statement, tab_size)
}

fn line_of(document: &str, offset: usize) -> usize {
    document
        .get(..offset)
        .map(|prefix| prefix.matches('\n').count())
        .unwrap_or(0)
}

fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offsets of `=>`, searched backward from the body start.
fn arrow_token(function: &SourceNode, body: &SourceNode, document: &str) -> Option<(usize, usize)> {
    let params_end = function
        .list("params")
        .last()
        .map(|param| param.end)
        .unwrap_or(function.start);
    let region = document.get(params_end..body.start)?;
    let mask = comment_mask(region);
    let bytes = region.as_bytes();
    (0..bytes.len().saturating_sub(1))
        .rev()
        .find(|&i| bytes[i] == b'=' && bytes[i + 1] == b'>' && !mask[i] && !mask[i + 1])
        .map(|i| (params_end + i, params_end + i + 2))
}

/// Marks the bytes of `text` that belong to `//` or `/* */` comments.
fn comment_mask(text: &str) -> Vec<bool> {
    let bytes = text.as_bytes();
    let mut mask = vec![false; bytes.len()];
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                mask[i] = true;
                i += 1;
            }
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            let close = text[i + 2..].find("*/").map(|rel| i + 2 + rel + 2).unwrap_or(bytes.len());
            mask[i..close].iter_mut().for_each(|m| *m = true);
            i = close;
        } else {
            i += 1;
        }
    }
    mask
}

fn count_outside_comments(text: &str, wanted: char) -> usize {
    let mask = comment_mask(text);
    text.char_indices()
        .filter(|&(i, c)| c == wanted && !mask[i])
        .count()
}

/// The gap between `=>` and the body with its opening parens removed.
fn strip_parens(gap: &str) -> String {
    let mask = comment_mask(gap);
    gap.char_indices()
        .filter(|&(i, c)| mask[i] || c != '(')
        .map(|(_, c)| c)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Offset after the `count`-th closing paren following `from`, skipping
/// whitespace and comments. `None` if anything else comes first.
fn closing_parens_end(document: &str, from: usize, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let rest = document.get(from..)?;
    let mask = comment_mask(rest);
    let mut remaining = count;
    for (i, c) in rest.char_indices() {
        if mask[i] || c.is_whitespace() {
            continue;
        }
        if c != ')' {
            return None;
        }
        remaining -= 1;
        if remaining == 0 {
            return Some(from + i + 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracepin_ast::parse_script;
    use tracepin_foundation::ScriptDialect;

    fn transform(source: &str, line: usize, variable: &str, statement: &str) -> Option<String> {
        let ast = parse_script(source, ScriptDialect::Tsx).unwrap();
        plan_transformation(&ast, source, line, variable, statement, 2).map(|plan| plan.apply(source))
    }

    #[test]
    fn test_empty_function_body() {
        assert_eq!(
            transform("function greet(x) {}\n", 0, "x", "console.log('x:', x);").as_deref(),
            Some("function greet(x) {\n  console.log('x:', x);\n}\n")
        );
    }

    #[test]
    fn test_empty_method_keeps_base_indentation() {
        let source = "class A {\n    constructor(private store: Store) {}\n}";
        assert_eq!(
            transform(source, 1, "store", "log(store);").as_deref(),
            Some("class A {\n    constructor(private store: Store) {\n      log(store);\n    }\n}")
        );
    }

    #[test]
    fn test_expression_bodied_arrow() {
        assert_eq!(
            transform("const double = (n) => n * 2;", 0, "n", "log(n);").as_deref(),
            Some("const double = (n) => {\n  log(n);\n  return n * 2;\n};")
        );
    }

    #[test]
    fn test_arrow_body_on_the_next_line_keeps_the_declaration_indent() {
        assert_eq!(
            transform("const double = (n) =>\n  n * 2;\n", 0, "n", "log(n);").as_deref(),
            Some("const double = (n) => {\n  log(n);\n  return n * 2;\n};\n")
        );
        assert_eq!(
            transform("class A {\n  run = (job) =>\n    job.start();\n}", 1, "job", "log(job);").as_deref(),
            Some("class A {\n  run = (job) => {\n    log(job);\n    return job.start();\n  };\n}")
        );
    }

    #[test]
    fn test_parenthesized_arrow_body_is_rewrapped() {
        assert_eq!(
            transform("const view = (props) => (<div>{props.name}</div>);", 0, "props", "log(props);")
                .as_deref(),
            Some("const view = (props) => {\n  log(props);\n  return (<div>{props.name}</div>);\n};")
        );
    }

    #[test]
    fn test_comment_between_arrow_and_body_is_kept() {
        assert_eq!(
            transform("const f = (a) => /* sum */ a + 1;", 0, "a", "log(a);").as_deref(),
            Some("const f = (a) => {\n  log(a);\n  return /* sum */ a + 1;\n};")
        );
    }

    #[test]
    fn test_inline_body_is_split() {
        assert_eq!(
            transform("function id(v) { return v; }", 0, "v", "log(v);").as_deref(),
            Some("function id(v) {\n  log(v);\n  return v;\n}")
        );
    }

    #[test]
    fn test_no_site_for_multi_line_bodies_or_non_parameters() {
        assert_eq!(transform("function f(a) {\n  run(a);\n}", 0, "a", "log(a);"), None);
        assert_eq!(transform("const f = () => {};", 0, "f", "log(f);"), None);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let source = "items.map((item) => item.id);";
        let ast = parse_script(source, ScriptDialect::JavaScript).unwrap();
        let first = plan_transformation(&ast, source, 0, "item", "log(item);", 4);
        let second = plan_transformation(&ast, source, 0, "item", "log(item);", 4);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
