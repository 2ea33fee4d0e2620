//! AST error types

use thiserror::Error;
use tracepin_foundation::{FileKind, TracepinError};

/// Failures of the extraction and parsing stages
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AstError {
    #[error("Extraction error ({kind}): {message}")]
    Extraction { kind: FileKind, message: String },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        /// Zero-based host-document line of the diagnostic
        line: Option<usize>,
    },
}

impl AstError {
    pub fn extraction(kind: FileKind, message: impl Into<String>) -> Self {
        Self::Extraction {
            kind,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Parse {
            message: message.into(),
            line,
        }
    }

    /// Shifts the diagnostic line from region to host coordinates.
    pub(crate) fn offset_line(self, line_offset: usize) -> Self {
        match self {
            Self::Parse { message, line } => Self::Parse {
                message,
                line: line.map(|l| l + line_offset),
            },
            other => other,
        }
    }
}

impl From<AstError> for TracepinError {
    fn from(err: AstError) -> Self {
        match err {
            AstError::Extraction { kind, message } => {
                TracepinError::extraction(format!("{message} ({kind} document)"))
            }
            AstError::Parse { message, line } => TracepinError::parse(message, line),
        }
    }
}

/// Result type alias for AST operations
pub type AstResult<T> = Result<T, AstError>;
