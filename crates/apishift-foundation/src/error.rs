//! Error handling for the migration engine

use thiserror::Error;

/// Error type used throughout apishift
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MigrationError {
    #[error("Invalid rule-set: {message}")]
    RuleSetInvalid { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Invalid replacement regex '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Edit conflict: {message}")]
    EditConflict { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MigrationError {
    /// Create a new invalid rule-set error
    pub fn rule_set_invalid(message: impl Into<String>) -> Self {
        Self::RuleSetInvalid {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid glob pattern error
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid regex error
    pub fn regex(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new parse error
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new edit conflict error
    pub fn edit_conflict(message: impl Into<String>) -> Self {
        Self::EditConflict {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the rule-set document itself is unusable.
    ///
    /// Malformed JSON, structural problems, bad globs and bad regexes all
    /// abort a run before any change set is applied.
    pub fn is_rule_set_error(&self) -> bool {
        matches!(
            self,
            Self::RuleSetInvalid { .. }
                | Self::Pattern { .. }
                | Self::Regex { .. }
                | Self::Json(_)
        )
    }
}

/// Result type alias for convenience
pub type MigrationResult<T> = Result<T, MigrationError>;
