//! AST error types

use apishift_foundation::{Edit, MigrationError};
use thiserror::Error;

/// AST operation errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AstError {
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Overlapping edits: {first} conflicts with {second}")]
    EditConflict { first: Edit, second: Edit },

    #[error("Edit {start}..{end} is outside the source ({len} bytes) or splits a character")]
    EditOutOfBounds { start: usize, end: usize, len: usize },
}

impl AstError {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn edit_conflict(first: Edit, second: Edit) -> Self {
        Self::EditConflict { first, second }
    }
}

impl From<AstError> for MigrationError {
    fn from(err: AstError) -> Self {
        match err {
            AstError::Parse { path, message } => MigrationError::parse(path, message),
            AstError::EditConflict { .. } => MigrationError::edit_conflict(err.to_string()),
            AstError::EditOutOfBounds { .. } => MigrationError::internal(err.to_string()),
        }
    }
}

/// Result type alias for AST operations
pub type AstResult<T> = Result<T, AstError>;
