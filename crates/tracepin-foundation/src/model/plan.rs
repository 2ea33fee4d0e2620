//! Edits handed back to the caller

use serde::{Deserialize, Serialize};

/// A single text replacement over the untouched host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationPlan {
    /// Byte offset where the replaced region starts
    pub start: usize,
    /// Byte offset one past the replaced region
    pub end: usize,
    pub replacement_text: String,
    /// Zero-based line the debug statement occupies after the splice
    pub statement_line: usize,
}

impl TransformationPlan {
    /// Performs the one slice-and-splice the plan describes.
    pub fn apply(&self, document: &str) -> String {
        let mut out = String::with_capacity(document.len() + self.replacement_text.len());
        out.push_str(&document[..self.start]);
        out.push_str(&self.replacement_text);
        out.push_str(&document[self.end..]);
        out
    }
}

/// What the caller has to do to place the debug statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InsertionOutcome {
    /// Insert `text` (newline-terminated) before zero-based line `line`.
    Insert { line: usize, text: String },
    /// A structural transformation fired; `document` is the full result.
    Rewrite {
        plan: TransformationPlan,
        document: String,
    },
}

impl InsertionOutcome {
    /// Returns the edited document.
    pub fn apply(&self, document: &str) -> String {
        match self {
            Self::Insert { line, text } => insert_at_line(document, *line, text),
            Self::Rewrite { document, .. } => document.clone(),
        }
    }

    /// Zero-based line of the debug statement in the edited document.
    pub fn statement_line(&self) -> usize {
        match self {
            Self::Insert { line, text } => {
                line + text.lines().take_while(|l| l.trim().is_empty()).count()
            }
            Self::Rewrite { plan, .. } => plan.statement_line,
        }
    }
}

/// Inserts `text` before `line`, appending when the line is past the end.
pub fn insert_at_line(document: &str, line: usize, text: &str) -> String {
    let offset = if line == 0 {
        Some(0)
    } else {
        document
            .match_indices('\n')
            .nth(line - 1)
            .map(|(idx, _)| idx + 1)
    };

    let mut out = String::with_capacity(document.len() + text.len() + 1);
    match offset {
        Some(offset) => {
            out.push_str(&document[..offset]);
            out.push_str(text);
            out.push_str(&document[offset..]);
        }
        None => {
            out.push_str(document);
            if !document.is_empty() && !document.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(text);
        }
    }
    out
}
