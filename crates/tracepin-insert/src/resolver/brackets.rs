//! Text-level fallback for selections no statement encloses
//!
//! Counts `(`, `[` and `{` against their closers line by line, skipping
//! string literals and comments, to find the line where a construct opened
//! on (or before) the selection line is balanced again.

/// Per-line result of the bracket scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineScan {
    /// Opened minus closed brackets on the line
    pub delta: i64,
    /// The line does not start inside a block comment or template literal
    pub starts_in_code: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Code,
    Str(char),
    LineComment,
    BlockComment,
}

/// Line-at-a-time bracket scanner carrying string and comment state.
#[derive(Debug, Clone, Default)]
pub struct LineScanner {
    state: State,
}

impl LineScanner {
    /// Scans the next line; lines are fed without their `\n`.
    pub fn scan(&mut self, line: &str) -> LineScan {
        let starts_in_code = self.state == State::Code;
        let mut delta = 0i64;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match self.state {
                State::Code => match c {
                    '(' | '[' | '{' => delta += 1,
                    ')' | ']' | '}' => delta -= 1,
                    '\'' | '"' | '`' => self.state = State::Str(c),
                    '/' if chars.peek() == Some(&'/') => self.state = State::LineComment,
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        self.state = State::BlockComment;
                    }
                    _ => {}
                },
                State::Str(quote) => {
                    if c == '\\' {
                        chars.next();
                    } else if c == quote {
                        self.state = State::Code;
                    }
                }
                State::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        self.state = State::Code;
                    }
                }
                State::LineComment => {}
            }
        }
        match self.state {
            State::LineComment => self.state = State::Code,
            // Only template literals span lines
            State::Str(quote) if quote != '`' => self.state = State::Code,
            _ => {}
        }
        LineScan {
            delta,
            starts_in_code,
        }
    }
}

/// Scans every line of `document`.
pub fn scan_lines(document: &str) -> Vec<LineScan> {
    let mut scanner = LineScanner::default();
    document.split('\n').map(|line| scanner.scan(line)).collect()
}

/// Where to put a statement for a selection inside a bracketed construct.
///
/// Returns `(target_line, anchor_line)`. When the selection line leaves
/// brackets open, the target follows the line that closes them. When it
/// closes brackets opened above, the anchor is the line that opened them.
pub fn bracket_fallback(document: &str, line: usize) -> (usize, usize) {
    let deltas: Vec<i64> = scan_lines(document).iter().map(|scan| scan.delta).collect();
    let Some(&selection_delta) = deltas.get(line) else {
        return (line + 1, line);
    };

    if selection_delta > 0 {
        let mut depth = selection_delta;
        for (offset, delta) in deltas.iter().enumerate().skip(line + 1) {
            depth += delta;
            if depth <= 0 {
                return (offset + 1, line);
            }
        }
        return (deltas.len(), line);
    }

    if selection_delta < 0 {
        let mut depth = selection_delta;
        for offset in (0..line).rev() {
            depth += deltas[offset];
            if depth >= 0 {
                return (line + 1, offset);
            }
        }
    }

    (line + 1, line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downward_to_the_closing_line() {
        let doc = "foo(bar, {\n  a: 1,\n}, baz);\nnext();";
        assert_eq!(bracket_fallback(doc, 0), (3, 0));
    }

    #[test]
    fn test_upward_to_the_opening_line() {
        let doc = "  call(\n    one,\n  two);\nnext();";
        assert_eq!(bracket_fallback(doc, 2), (3, 0));
    }

    #[test]
    fn test_brackets_in_strings_and_comments_are_ignored() {
        let doc = "log('(', \"[\") // {\nnext();";
        assert_eq!(bracket_fallback(doc, 0), (1, 0));
        let doc = "/* ( */ run(\n  x\n);";
        assert_eq!(bracket_fallback(doc, 0), (3, 0));
    }

    #[test]
    fn test_template_literal_lines_do_not_start_in_code() {
        let scans = scan_lines("const t = `\n(\n`;\nrun(");
        let starts: Vec<_> = scans.iter().map(|s| s.starts_in_code).collect();
        assert_eq!(starts, vec![true, false, false, true]);
        assert_eq!(scans[1].delta, 0);
        assert_eq!(scans[3].delta, 1);
    }

    #[test]
    fn test_balanced_line_targets_next_line() {
        assert_eq!(bracket_fallback("a(b);\nc();", 0), (1, 0));
        assert_eq!(bracket_fallback("a(b);", 7), (8, 7));
    }
}
