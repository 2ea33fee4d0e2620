//! Top-level error type surfaced to tracepin callers

use thiserror::Error;

/// Errors that abort a debug-log insertion.
///
/// Stage-specific errors (`AstError`, `ConfigError`) convert into this type
/// so a caller only has to handle one enum.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TracepinError {
    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Parse error at line {}: {message}", line.map(|l| (l + 1).to_string()).unwrap_or_else(|| "?".to_string()))]
    Parse {
        message: String,
        /// Zero-based host-document line of the diagnostic, when known
        line: Option<usize>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unsupported file type: {hint}")]
    UnsupportedFile { hint: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TracepinError {
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Parse {
            message: message.into(),
            line,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unsupported_file(hint: impl Into<String>) -> Self {
        Self::UnsupportedFile { hint: hint.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the failure should be shown to the user as-is.
    ///
    /// Extraction and parse failures describe the document, not a bug.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Extraction { .. } | Self::Parse { .. } | Self::UnsupportedFile { .. }
        )
    }
}

/// Result type alias for convenience
pub type TracepinResult<T> = Result<T, TracepinError>;
