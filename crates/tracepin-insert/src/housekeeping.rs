//! Commenting, uncommenting and deleting inserted debug statements
//!
//! A debug statement starts a line with the configured log function,
//! followed by `(` and a first string argument shaped like a label the
//! message builder produces: the prefix and delimiter (`"🚀 ~ ..."`), or
//! the variable suffix when no prefix is configured, or a banner of dashes.
//! Other calls to the same function are left alone. Statements may span
//! several lines; the end is found by bracket counting. Lines that start
//! inside a block comment or a template literal are never statements.

use crate::message::spaced_delimiter;
use crate::resolver::brackets::{scan_lines, LineScan, LineScanner};
use serde::Serialize;
use tracepin_config::MessageConfig;
use tracing::debug;

/// One debug statement found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStatement {
    /// Zero-based first line
    pub start_line: usize,
    /// Zero-based last line, inclusive
    pub end_line: usize,
    /// Every line of the statement is behind `//`
    pub commented: bool,
}

fn strip_comment_marker(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix("//").map(str::trim_start)
}

fn starts_call(code: &str, log_function: &str) -> bool {
    code.strip_prefix(log_function)
        .is_some_and(|rest| rest.trim_start().starts_with('('))
}

/// Unescaped first argument of `call` when it is a string literal.
fn first_string_argument(call: &str, log_function: &str) -> Option<String> {
    let args = call
        .strip_prefix(log_function)?
        .trim_start()
        .strip_prefix('(')?
        .trim_start();
    let mut chars = args.chars();
    let quote = chars.next().filter(|c| matches!(c, '"' | '\'' | '`'))?;
    let mut label = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => label.push(chars.next()?),
            c if c == quote => return Some(label),
            c => label.push(c),
        }
    }
    None
}

/// Whether `label` could have come from the message builder.
fn is_debug_label(label: &str, message: &MessageConfig) -> bool {
    let prefix = message.prefix.trim();
    let delimiter = spaced_delimiter(&message.delimiter);
    let body = if prefix.is_empty() {
        label
    } else {
        match label.strip_prefix(prefix).and_then(|rest| rest.strip_prefix(delimiter.as_str())) {
            Some(body) => body,
            None => return false,
        }
    };

    if !body.is_empty() && body.chars().all(|c| c == '-') {
        return true;
    }
    if !prefix.is_empty() {
        return !body.is_empty();
    }
    if message.suffix.is_empty() {
        body.contains(delimiter.as_str())
    } else {
        body.ends_with(message.suffix.as_str())
    }
}

fn is_debug_statement(code_lines: &[&str], message: &MessageConfig) -> bool {
    let call = code_lines.join("\n");
    first_string_argument(call.trim_start(), &message.log_function)
        .is_some_and(|label| is_debug_label(&label, message))
}

/// Line on which the call opening at `start` is balanced again.
fn active_end(scans: &[LineScan], start: usize) -> usize {
    let mut depth = 0i64;
    for (index, scan) in scans.iter().enumerate().skip(start) {
        depth += scan.delta;
        if depth <= 0 {
            return index;
        }
    }
    scans.len().saturating_sub(1)
}

/// Same as [`active_end`] over the run of commented lines from `start`.
fn commented_end(lines: &[&str], start: usize) -> usize {
    let mut scanner = LineScanner::default();
    let mut depth = 0i64;
    let mut last = start;
    let run = lines
        .iter()
        .enumerate()
        .skip(start)
        .map_while(|(index, &line)| strip_comment_marker(line).map(|code| (index, code)));
    for (index, code) in run {
        last = index;
        depth += scanner.scan(code).delta;
        if depth <= 0 {
            break;
        }
    }
    last
}

/// Every debug statement in document order.
pub fn find_log_statements(document: &str, message: &MessageConfig) -> Vec<LogStatement> {
    let log_function = message.log_function.as_str();
    let lines: Vec<&str> = document.split('\n').collect();
    let scans = scan_lines(document);
    let mut statements = Vec::new();

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        let in_code = scans.get(index).is_some_and(|scan| scan.starts_in_code);
        if !in_code {
            index += 1;
            continue;
        }

        if starts_call(line.trim_start(), log_function) {
            let end_line = active_end(&scans, index);
            if is_debug_statement(&lines[index..=end_line], message) {
                statements.push(LogStatement {
                    start_line: index,
                    end_line,
                    commented: false,
                });
            }
            index = end_line + 1;
            continue;
        }

        if strip_comment_marker(line).is_some_and(|code| starts_call(code, log_function)) {
            // The statement continues over consecutive commented lines
            let end_line = commented_end(&lines, index);
            let code: Vec<&str> = lines[index..=end_line]
                .iter()
                .filter_map(|&l| strip_comment_marker(l))
                .collect();
            if is_debug_statement(&code, message) {
                statements.push(LogStatement {
                    start_line: index,
                    end_line,
                    commented: true,
                });
            }
            index = end_line + 1;
            continue;
        }
        index += 1;
    }

    debug!(count = statements.len(), log_function, "Found debug statements");
    statements
}

fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Applies `edit` to each line of the selected statements. `edit` also
/// receives the indentation of the statement's first line.
fn rewrite_lines<F>(document: &str, statements: &[LogStatement], mut edit: F) -> String
where
    F: FnMut(&str, &str) -> Option<String>,
{
    let lines: Vec<&str> = document.split('\n').collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut next = statements.iter().peekable();
    for (index, &line) in lines.iter().enumerate() {
        while next.peek().is_some_and(|s| s.end_line < index) {
            next.next();
        }
        match next.peek() {
            Some(statement) if statement.start_line <= index => {
                let base = indentation(lines[statement.start_line]);
                out.extend(edit(line, base));
            }
            _ => out.push(line.to_string()),
        }
    }
    out.join("\n")
}

/// Puts `// ` in front of every active debug statement.
pub fn comment_logs(document: &str, message: &MessageConfig) -> String {
    let active: Vec<_> = find_log_statements(document, message)
        .into_iter()
        .filter(|s| !s.commented)
        .collect();
    rewrite_lines(document, &active, |line, base| {
        let rest = line.strip_prefix(base).unwrap_or(line.trim_start());
        Some(format!("{base}// {rest}"))
    })
}

/// Removes the `//` marker from every commented debug statement.
pub fn uncomment_logs(document: &str, message: &MessageConfig) -> String {
    let commented: Vec<_> = find_log_statements(document, message)
        .into_iter()
        .filter(|s| s.commented)
        .collect();
    rewrite_lines(document, &commented, |line, base| {
        let rest = line.strip_prefix(base).unwrap_or(line.trim_start());
        let code = rest
            .strip_prefix("// ")
            .or_else(|| rest.strip_prefix("//"))
            .unwrap_or(rest);
        Some(format!("{base}{code}"))
    })
}

/// Deletes every debug statement, commented or not.
pub fn delete_logs(document: &str, message: &MessageConfig) -> String {
    let all = find_log_statements(document, message);
    rewrite_lines(document, &all, |_, _| None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "function f(a) {\n  console.log(\"🚀 ~ a:\", a);\n  run(a);\n  console.log(\n    \"🚀 ~ f ~ b:\",\n    b\n  );\n}\n";

    fn plain() -> MessageConfig {
        MessageConfig {
            prefix: String::new(),
            quote: "'".to_string(),
            ..MessageConfig::default()
        }
    }

    #[test]
    fn test_finds_single_and_multi_line_statements() {
        let found = find_log_statements(DOC, &MessageConfig::default());
        assert_eq!(
            found,
            vec![
                LogStatement { start_line: 1, end_line: 1, commented: false },
                LogStatement { start_line: 3, end_line: 6, commented: false },
            ]
        );
    }

    #[test]
    fn test_ignores_strings_comments_and_other_functions() {
        let doc = "const s = `\nconsole.log('🚀 ~ x:', x);\n`;\n/*\nconsole.log('🚀 ~ y:', y);\n*/\nlogger.console.log('🚀 ~ z:', z);";
        assert!(find_log_statements(doc, &MessageConfig::default()).is_empty());
    }

    #[test]
    fn test_user_logs_are_left_alone() {
        let doc = "console.log('server started on', port);\nconsole.log(\"🚀 ~ app.ts:3 ~ x:\", x);\n// console.log(`done`);\nconsole.log(total);\n";
        let config = MessageConfig::default();
        assert_eq!(
            delete_logs(doc, &config),
            "console.log('server started on', port);\n// console.log(`done`);\nconsole.log(total);\n"
        );
        assert_eq!(
            comment_logs(doc, &config),
            "console.log('server started on', port);\n// console.log(\"🚀 ~ app.ts:3 ~ x:\", x);\n// console.log(`done`);\nconsole.log(total);\n"
        );
        assert_eq!(uncomment_logs(doc, &config), doc);
    }

    #[test]
    fn test_without_prefix_the_suffix_marks_the_label() {
        let doc = "console.log('a:', a);\nconsole.log('ready');\nconsole.log('it\\'s:', it);\n";
        assert_eq!(delete_logs(doc, &plain()), "console.log('ready');\n");
    }

    #[test]
    fn test_comment_then_uncomment_round_trips() {
        let config = MessageConfig::default();
        let commented = comment_logs(DOC, &config);
        assert_eq!(
            commented,
            "function f(a) {\n  // console.log(\"🚀 ~ a:\", a);\n  run(a);\n  // console.log(\n  //   \"🚀 ~ f ~ b:\",\n  //   b\n  // );\n}\n"
        );
        assert!(find_log_statements(&commented, &config).iter().all(|s| s.commented));
        assert_eq!(uncomment_logs(&commented, &config), DOC);
    }

    #[test]
    fn test_statements_end_where_their_brackets_close() {
        let doc = "// note: see (below\n// console.log('🚀 ~ a:', {\n//   a,\n// });\n// console.log('🚀 ~ b:', b);\nrun();";
        assert_eq!(
            find_log_statements(doc, &MessageConfig::default()),
            vec![
                LogStatement { start_line: 1, end_line: 3, commented: true },
                LogStatement { start_line: 4, end_line: 4, commented: true },
            ]
        );
    }

    #[test]
    fn test_delete_removes_whole_statements() {
        assert_eq!(delete_logs(DOC, &MessageConfig::default()), "function f(a) {\n  run(a);\n}\n");
    }

    #[test]
    fn test_delete_removes_wrapping_banners() {
        let doc = "run();\nconsole.log('🚀 ~ -----');\nconsole.log('🚀 ~ x:', x);\nconsole.log('🚀 ~ -----');\nnext();";
        assert_eq!(delete_logs(doc, &MessageConfig::default()), "run();\nnext();");
        let doc = "run();\nconsole.log('-----');\nconsole.log('x:', x);\nconsole.log('-----');\nnext();";
        assert_eq!(delete_logs(doc, &plain()), "run();\nnext();");
    }
}
