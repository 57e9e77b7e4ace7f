//! apishift-ast: syntax-aware rewriting primitives for the migration engine
//!
//! This crate turns identifier replacements into located edits and splices
//! them back into source text. The syntax tree sits behind the narrow
//! [`SyntaxProvider`] capability so the passes can be exercised against a
//! fake parser; [`TypeScriptSyntax`] is the swc-backed implementation.

pub mod comments;
pub mod error;
pub mod parser;
pub mod rename;
pub mod transformer;

// Comment scanning
pub use comments::{find_comment_spans, CommentKind, CommentSpan};

// Error types
pub use error::{AstError, AstResult};

// Parser
pub use parser::{IdentifierNode, ParsedModule, SyntaxProvider, TypeScriptSyntax};

// Identifier and comment passes
pub use rename::{plan_comment_edits, plan_identifier_edits, plan_rename_edits};

// Edit application
pub use transformer::{apply_edits, TransformResult, TransformStatistics};
