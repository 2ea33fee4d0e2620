//! Byte offset to line/column conversion

use crate::node::Position;

/// Line start table over a text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Zero-based line and character column of `offset`.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_of(offset);
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        Position { line, column }
    }

    /// Byte offset where `line` starts, `None` past the end.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        self.text
            .get(start..end)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
    }
}

/// Leading whitespace of `line` in `text`, empty when out of range.
pub fn indentation_of(text: &str, line: usize) -> &str {
    text.lines()
        .nth(line)
        .map(|l| {
            let trimmed = l.trim_start();
            &l[..l.len() - trimmed.len()]
        })
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let text = "const a = 1;\n  let b;\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(0), Position { line: 0, column: 0 });
        assert_eq!(index.position(15), Position { line: 1, column: 2 });
        assert_eq!(index.position(13), Position { line: 1, column: 0 });
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "const s = \"🚀\"; x";
        let index = LineIndex::new(text);
        let offset = text.find('x').unwrap_or(0);
        assert_eq!(index.position(offset).column, 15);
    }

    #[test]
    fn test_line_text_strips_crlf() {
        let index = LineIndex::new("a\r\nb");
        assert_eq!(index.line_text(0), Some("a"));
        assert_eq!(index.line_text(1), Some("b"));
        assert_eq!(index.line_text(2), None);
    }

    #[test]
    fn test_indentation_of() {
        assert_eq!(indentation_of("x\n    y\n", 1), "    ");
        assert_eq!(indentation_of("x", 5), "");
    }
}
