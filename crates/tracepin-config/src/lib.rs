//! tracepin-config: layered configuration and logging initialization
//!
//! The core pipeline only ever sees the plain structs defined here; loading
//! them from disk and the environment happens at the application edge.

pub mod config;
pub mod logging;

pub use config::{
    ConfigError, InsertionConfig, LogFormat, LoggingConfig, MessageConfig, TracepinConfig,
    CONFIG_FILE_NAME,
};
