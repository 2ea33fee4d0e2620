use super::{CheckContext, CheckOutcome, PatternChecker};
use tracepin_foundation::LogMessageType;

/// Fallback that accepts every selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveAssignmentChecker;

impl PatternChecker for PrimitiveAssignmentChecker {
    fn log_message_type(&self) -> LogMessageType {
        LogMessageType::PrimitiveAssignment
    }

    fn check(&self, _ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::matched()
    }
}
