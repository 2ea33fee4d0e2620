//! Data model shared across the pipeline stages

pub mod file_kind;
pub mod log_message;
pub mod plan;
