//! tracepin-insert: decides where a debug statement goes and what it says
//!
//! Given a parsed document and a selected variable, the crate
//! - classifies the selection with a priority-ordered chain of
//!   [`checkers`] ([`classifier`]),
//! - resolves the line the statement is inserted before ([`resolver`]),
//! - rewrites function bodies that cannot take a plain line insertion
//!   ([`transformer`]),
//! - and renders the statement itself ([`message`]).
//!
//! [`pipeline::insert_debug_log`] strings the stages together.
//! [`housekeeping`] finds, comments and deletes statements inserted earlier.

pub mod checkers;
pub mod classifier;
pub mod enclosing;
pub mod housekeeping;
pub mod message;
pub mod parents;
pub mod paths;
pub mod pipeline;
pub mod resolver;
pub mod transformer;

pub use classifier::{CheckerDescriptor, ClassificationChain, DEFAULT_PRIORITIES};
pub use housekeeping::{comment_logs, delete_logs, find_log_statements, uncomment_logs, LogStatement};
pub use message::{DebugMessageBuilder, MessageContext};
pub use pipeline::{
    classify_selection, insert_debug_log, insert_with_report, InsertionReport, InsertionRequest,
};
pub use resolver::{resolve_insertion, Resolution};
pub use transformer::plan_transformation;
