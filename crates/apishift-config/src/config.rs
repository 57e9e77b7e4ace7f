//! Migration configuration

use apishift_foundation::{MigrationError, MigrationResult};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-relative location of the optional TOML configuration file.
pub const CONFIG_FILE: &str = ".apishift/config.toml";

const ENV_PREFIX: &str = "APISHIFT__";

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for CI pipelines
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Settings for one migration run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Path prefixes outside of which no file is ever modified
    pub scope_roots: Vec<String>,
    /// Tree path of the rule-set document
    pub rule_set_path: String,
    /// On-disk rule-set read when the tree has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_set_file: Option<PathBuf>,
    /// File-name segments recognised by the pattern expander
    pub segments: Vec<String>,
    /// Segments that may be omitted from a file name entirely
    pub removable_segments: Vec<String>,
    pub logging: LoggingConfig,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            scope_roots: strings(&["src/app/", "src/lib/"]),
            rule_set_path: "api-changes.json".to_string(),
            rule_set_file: None,
            segments: strings(&[
                "component",
                "directive",
                "service",
                "pipe",
                "module",
                "model",
                "interface",
            ]),
            removable_segments: strings(&[
                "component",
                "directive",
                "service",
                "model",
                "interface",
            ]),
            logging: LoggingConfig::default(),
        }
    }
}

impl MigrationConfig {
    /// Build the provider chain without extracting it.
    ///
    /// Priority (highest first): `APISHIFT__*` environment variables,
    /// `<project_root>/.apishift/config.toml`, built-in defaults.
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(MigrationConfig::default()));

        let toml_path = project_root.join(CONFIG_FILE);
        if toml_path.exists() {
            tracing::debug!(path = %toml_path.display(), "Loading TOML configuration");
            figment = figment.merge(Toml::file(&toml_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration for the project at `project_root`.
    pub fn load(project_root: &Path) -> MigrationResult<Self> {
        let config: MigrationConfig = Self::figment(project_root)
            .extract()
            .map_err(|e| MigrationError::config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;

        tracing::debug!(
            scope_roots = ?config.scope_roots,
            rule_set_path = %config.rule_set_path,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> MigrationResult<()> {
        if self.scope_roots.is_empty() {
            return Err(MigrationError::config(
                "At least one scope root must be configured",
            ));
        }

        if self.rule_set_path.trim().is_empty() {
            return Err(MigrationError::config("Rule-set path cannot be empty"));
        }

        if let Some(segment) = self
            .removable_segments
            .iter()
            .find(|s| !self.segments.contains(s))
        {
            return Err(MigrationError::config(format!(
                "Removable segment '{}' is not a known segment",
                segment
            )));
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(MigrationError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
