//! apishift-config: layered migration configuration and logging setup

pub mod config;
pub mod logging;

pub use config::{LogFormat, LoggingConfig, MigrationConfig, CONFIG_FILE};
