//! tracepin-foundation: model types and errors shared by every tracepin crate
//!
//! Nothing in here parses or analyzes code. The types describe what flows
//! between the pipeline stages: which host format a document is, how a
//! selection was classified, and what edit the caller has to perform.

pub mod error;
pub mod model;

pub use error::{TracepinError, TracepinResult};
pub use model::file_kind::{FileKind, ScriptDialect};
pub use model::log_message::{LogMessage, LogMessageType, LogMetadata};
pub use model::plan::{InsertionOutcome, TransformationPlan};
