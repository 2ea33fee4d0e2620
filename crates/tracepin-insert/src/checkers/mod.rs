//! Pattern checkers
//!
//! Each checker recognizes one syntactic family around the selected
//! variable. They are independent of each other; ordering is the
//! classifier's business.

pub mod assignment;
pub mod bindings;
pub mod method_call;
pub mod parameter;
pub mod primitive;
pub mod property_access;

use tracepin_ast::SourceNode;
use tracepin_foundation::{LogMessageType, LogMetadata};

/// Everything a checker may look at.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub ast: &'a SourceNode,
    pub document: &'a str,
    /// Zero-based host line of the selection
    pub selection_line: usize,
    pub variable: &'a str,
}

/// Verdict of a single checker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub is_checked: bool,
    pub metadata: Option<LogMetadata>,
}

impl CheckOutcome {
    pub fn matched() -> Self {
        Self {
            is_checked: true,
            metadata: None,
        }
    }

    pub fn matched_with(metadata: LogMetadata) -> Self {
        Self {
            is_checked: true,
            metadata: Some(metadata),
        }
    }

    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn from_bool(is_checked: bool) -> Self {
        Self {
            is_checked,
            metadata: None,
        }
    }
}

/// Recognizer for one [`LogMessageType`].
pub trait PatternChecker: Send + Sync {
    fn log_message_type(&self) -> LogMessageType;

    fn check(&self, ctx: &CheckContext<'_>) -> CheckOutcome;
}

/// The checker implementing `log_message_type`.
pub fn checker_for(log_message_type: LogMessageType) -> Box<dyn PatternChecker> {
    use assignment::{AssignmentChecker, InitializerShape};

    match log_message_type {
        LogMessageType::ArrayAssignment => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::Array))
        }
        LogMessageType::BinaryExpression => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::Binary))
        }
        LogMessageType::FunctionCallAssignment => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::PlainCall))
        }
        LogMessageType::FunctionParameter => Box::new(parameter::FunctionParameterChecker),
        LogMessageType::NamedFunctionAssignment => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::Function))
        }
        LogMessageType::ObjectFunctionCallAssignment => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::MemberCall))
        }
        LogMessageType::ObjectLiteral => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::Object))
        }
        LogMessageType::PropertyAccessAssignment => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::MemberAccess))
        }
        LogMessageType::TemplateString => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::Template))
        }
        LogMessageType::Ternary => {
            Box::new(AssignmentChecker::new(log_message_type, InitializerShape::Conditional))
        }
        LogMessageType::RawPropertyAccess => Box::new(property_access::RawPropertyAccessChecker),
        LogMessageType::PropertyMethodCall => Box::new(method_call::PropertyMethodCallChecker),
        LogMessageType::PrimitiveAssignment => Box::new(primitive::PrimitiveAssignmentChecker),
    }
}
