//! Services that carry a migration from rule-set to written files

pub mod content;
pub mod migration;
pub mod patterns;
pub mod report;
pub mod selector;
pub mod tree;

pub use content::{apply_text_replacements, CompiledRules, ContentTransformer, FileKind, Transformed};
pub use migration::{MigrationRunner, PreparedChangeSet};
pub use patterns::PatternExpander;
pub use report::{FileChange, FileIssue, MigrationReport, RunOutcome, Strategy};
pub use selector::FileSelector;
pub use tree::{normalize_path, FileTree, FsTree, MemoryTree};
