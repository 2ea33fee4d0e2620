//! Classification results produced by the checker chain

use serde::{Deserialize, Serialize};
use std::fmt;

/// The syntactic pattern family a selection belongs to.
///
/// Every selection classifies as exactly one of these;
/// `PrimitiveAssignment` is the fallback when nothing more specific matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogMessageType {
    ArrayAssignment,
    BinaryExpression,
    FunctionCallAssignment,
    FunctionParameter,
    NamedFunctionAssignment,
    ObjectFunctionCallAssignment,
    ObjectLiteral,
    PropertyAccessAssignment,
    TemplateString,
    Ternary,
    RawPropertyAccess,
    PropertyMethodCall,
    PrimitiveAssignment,
}

impl LogMessageType {
    pub const ALL: [LogMessageType; 13] = [
        LogMessageType::ArrayAssignment,
        LogMessageType::BinaryExpression,
        LogMessageType::FunctionCallAssignment,
        LogMessageType::FunctionParameter,
        LogMessageType::NamedFunctionAssignment,
        LogMessageType::ObjectFunctionCallAssignment,
        LogMessageType::ObjectLiteral,
        LogMessageType::PropertyAccessAssignment,
        LogMessageType::TemplateString,
        LogMessageType::Ternary,
        LogMessageType::RawPropertyAccess,
        LogMessageType::PropertyMethodCall,
        LogMessageType::PrimitiveAssignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArrayAssignment => "arrayAssignment",
            Self::BinaryExpression => "binaryExpression",
            Self::FunctionCallAssignment => "functionCallAssignment",
            Self::FunctionParameter => "functionParameter",
            Self::NamedFunctionAssignment => "namedFunctionAssignment",
            Self::ObjectFunctionCallAssignment => "objectFunctionCallAssignment",
            Self::ObjectLiteral => "objectLiteral",
            Self::PropertyAccessAssignment => "propertyAccessAssignment",
            Self::TemplateString => "templateString",
            Self::Ternary => "ternary",
            Self::RawPropertyAccess => "rawPropertyAccess",
            Self::PropertyMethodCall => "propertyMethodCall",
            Self::PrimitiveAssignment => "primitiveAssignment",
        }
    }

    /// Families whose selection is bound by a declaration or assignment.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            Self::ArrayAssignment
                | Self::BinaryExpression
                | Self::FunctionCallAssignment
                | Self::NamedFunctionAssignment
                | Self::ObjectFunctionCallAssignment
                | Self::ObjectLiteral
                | Self::PropertyAccessAssignment
                | Self::TemplateString
                | Self::Ternary
        )
    }
}

impl fmt::Display for LogMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra facts a checker learned while matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    /// Reconstructed property path (`person.profile.fullName`, `user?.id`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_object_path: Option<String>,
    /// Zero-based line that replaces the selection line downstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_object_line: Option<usize>,
}

impl LogMetadata {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            deep_object_path: Some(path.into()),
            deep_object_line: None,
        }
    }

    pub fn line(mut self, line: usize) -> Self {
        self.deep_object_line = Some(line);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.deep_object_path.is_none() && self.deep_object_line.is_none()
    }
}

/// The classifier's verdict for one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    pub log_message_type: LogMessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LogMetadata>,
}

impl LogMessage {
    pub fn new(log_message_type: LogMessageType) -> Self {
        Self {
            log_message_type,
            metadata: None,
        }
    }

    pub fn with_metadata(log_message_type: LogMessageType, metadata: Option<LogMetadata>) -> Self {
        Self {
            log_message_type,
            metadata: metadata.filter(|m| !m.is_empty()),
        }
    }

    /// Line downstream stages work from: the metadata override, if any.
    pub fn effective_line(&self, selection_line: usize) -> usize {
        self.metadata
            .as_ref()
            .and_then(|m| m.deep_object_line)
            .unwrap_or(selection_line)
    }

    /// Variable expression printed by the debug statement.
    pub fn effective_variable<'a>(&'a self, variable: &'a str) -> &'a str {
        self.metadata
            .as_ref()
            .and_then(|m| m.deep_object_path.as_deref())
            .unwrap_or(variable)
    }
}
