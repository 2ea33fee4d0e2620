//! Layered configuration for tracepin
//!
//! Sources are merged in this order, later ones winning:
//! 1. Built-in defaults.
//! 2. `.tracepin.toml` in the workspace root.
//! 3. Environment variables prefixed with `TRACEPIN_` (`__` separates
//!    nesting, e.g. `TRACEPIN_MESSAGE__LOG_FUNCTION=console.debug`).
//!
//! # Example file
//!
//! ```toml
//! [message]
//! log_function = "console.debug"
//! delimiter = "|"
//! include_file_name = false
//!
//! [insertion]
//! tab_size = 4
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracepin_foundation::TracepinError;

/// File looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".tracepin.toml";

const ENV_PREFIX: &str = "TRACEPIN_";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TracepinConfig {
    /// How the debug statement is spelled.
    pub message: MessageConfig,
    /// Layout of inserted code.
    pub insertion: InsertionConfig,
    /// Diagnostics of tracepin itself.
    pub logging: LoggingConfig,
}

/// Content of the generated debug statement.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MessageConfig {
    /// Function called by the statement (`console.log`, `logger.debug`).
    pub log_function: String,
    /// Leading marker of the message label.
    pub prefix: String,
    /// Separator between label pieces; surrounding spaces are normalized.
    pub delimiter: String,
    /// Appended to the variable name inside the label.
    pub suffix: String,
    /// Quote character of the label string.
    pub quote: String,
    pub add_semicolon: bool,
    pub include_file_name: bool,
    pub include_line_number: bool,
    pub insert_enclosing_class: bool,
    pub insert_enclosing_function: bool,
    pub insert_empty_line_before: bool,
    pub insert_empty_line_after: bool,
    /// Surround the statement with two banner statements.
    pub wrap_log_message: bool,
}

/// Layout of inserted and rewritten code.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InsertionConfig {
    /// Spaces per indentation level.
    pub tab_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            log_function: "console.log".to_string(),
            prefix: "🚀".to_string(),
            delimiter: "~".to_string(),
            suffix: ":".to_string(),
            quote: "\"".to_string(),
            add_semicolon: true,
            include_file_name: true,
            include_line_number: true,
            insert_enclosing_class: true,
            insert_enclosing_function: true,
            insert_empty_line_before: false,
            insert_empty_line_after: false,
            wrap_log_message: false,
        }
    }
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self { tab_size: 2 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl TracepinConfig {
    /// Loads configuration from defaults, the workspace file and the environment.
    pub fn load(workspace_root: &Path) -> Result<Self, ConfigError> {
        let config_path = workspace_root.join(CONFIG_FILE_NAME);
        Self::load_from(&config_path)
    }

    /// Like [`TracepinConfig::load`] but with an explicit file path.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.insertion.tab_size == 0 || self.insertion.tab_size > 16 {
            return Err(ConfigError::InvalidValue {
                key: "insertion.tab_size".to_string(),
                reason: format!("must be between 1 and 16, got {}", self.insertion.tab_size),
            });
        }
        if !matches!(self.message.quote.as_str(), "\"" | "'" | "`") {
            return Err(ConfigError::InvalidValue {
                key: "message.quote".to_string(),
                reason: format!("must be one of \", ' or `, got {:?}", self.message.quote),
            });
        }
        if self.message.log_function.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "message.log_function".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Figment error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for TracepinError {
    fn from(err: ConfigError) -> Self {
        TracepinError::config(err.to_string())
    }
}

impl From<ConfigError> for figment::Error {
    fn from(err: ConfigError) -> figment::Error {
        use figment::error::Kind;
        figment::Error::from(Kind::Message(err.to_string()))
    }
}
