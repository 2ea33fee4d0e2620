//! Centralized logging initialization with environment variable support

use crate::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing subscriber with environment variable support
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_LEVEL`: Set log level (trace, debug, info, warn, error)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// # Examples
///
/// ```bash
/// # See every pipeline stage
/// LOG_LEVEL=debug tracepin insert src/app.ts --line 12 --variable user
///
/// # Only the resolver
/// RUST_LOG=tracepin_insert::resolver=trace tracepin insert src/app.ts --line 12 --variable user
/// ```
pub fn initialize(config: &LoggingConfig) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| config.level.clone());
    let log_level = level.parse().unwrap_or(tracing::Level::WARN);

    // RUST_LOG takes precedence over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("").add_directive(log_level.into()));

    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or_else(|| config.format.clone());

    // Always write to stderr; stdout carries command output
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed, keeping it");
    }
}

/// Span wrapping one pipeline invocation.
///
/// Every stage logs inside it, so the file and selection show up on each
/// event without repeating them.
pub fn invocation_span(file: &str, line: usize, variable: &str) -> tracing::Span {
    tracing::info_span!(
        "insert",
        file = %file,
        line = line,
        variable = %variable
    )
}
