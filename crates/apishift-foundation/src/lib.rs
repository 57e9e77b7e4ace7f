//! Foundation Layer - Core types shared by every apishift crate
//!
//! This crate provides the foundational building blocks for the migration engine:
//! - The error type and result alias used across the workspace
//! - The rule-set data model (replacements, change sets, categories)
//! - Edit planning types consumed by the edit applier

pub mod error;
pub mod model;
pub mod planning;

// Re-export commonly used types for convenience
pub use error::*;
pub use model::*;
pub use planning::*;
