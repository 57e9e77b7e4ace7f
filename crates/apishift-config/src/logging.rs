//! Centralized logging initialization with environment variable support

use crate::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resolve the effective output format; `LOG_FORMAT` overrides the config.
fn resolve_format(config: &LoggingConfig, env_override: Option<&str>) -> LogFormat {
    env_override
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or(config.format)
}

/// Resolve the effective level; `LOG_LEVEL` overrides the config.
fn resolve_level(config: &LoggingConfig, env_override: Option<&str>) -> tracing::Level {
    env_override
        .and_then(|level| level.parse().ok())
        .or_else(|| config.level.parse().ok())
        .unwrap_or(tracing::Level::INFO)
}

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
/// # See every planned edit
/// LOG_LEVEL=debug apishift --root .
///
/// # Machine-readable logs in CI
/// LOG_FORMAT=json apishift --root . --dry-run
///
/// # Module-specific filtering
/// RUST_LOG=apishift_services=debug,apishift_ast=trace apishift --root .
/// ```
///
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn initialize(config: &LoggingConfig) {
    let log_level = resolve_level(config, std::env::var("LOG_LEVEL").ok().as_deref());

    // RUST_LOG directives first, the resolved level as the default
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let format = resolve_format(config, std::env::var("LOG_FORMAT").ok().as_deref());

    // Always stderr: stdout carries the run summary
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "Tracing subscriber already installed");
    }
}
