//! Per-file rewriting: pick a strategy from the file kind and run it.

use super::report::Strategy;
use apishift_ast::{apply_edits, plan_rename_edits, AstResult, SyntaxProvider, TypeScriptSyntax};
use apishift_foundation::{ChangeSet, CompiledReplacement, MigrationResult, ReplacementKind};
use tracing::debug;

const CODE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".mts", ".cts"];
const MARKUP_EXTENSIONS: &[&str] = &[".html", ".htm"];

/// File classification, decided once from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Code,
    Markup,
    Other,
}

impl FileKind {
    pub fn classify(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if CODE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            FileKind::Code
        } else if MARKUP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            FileKind::Markup
        } else {
            FileKind::Other
        }
    }
}

/// A change set's replacements, compiled once per run.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub replacements: Vec<CompiledReplacement>,
    pub html_replacements: Vec<CompiledReplacement>,
}

impl CompiledRules {
    pub fn compile(change_set: &ChangeSet) -> MigrationResult<Self> {
        let (replacements, html_replacements) = change_set.compile_replacements()?;
        Ok(Self {
            replacements,
            html_replacements,
        })
    }
}

/// New content for one file. `content` equals the input when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub content: String,
    pub strategy: Strategy,
}

/// Rewrites file content according to a change set.
#[derive(Debug, Clone, Default)]
pub struct ContentTransformer<P = TypeScriptSyntax> {
    provider: P,
}

impl ContentTransformer<TypeScriptSyntax> {
    pub fn new() -> Self {
        Self::with_provider(TypeScriptSyntax::new())
    }
}

impl<P: SyntaxProvider> ContentTransformer<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// Transform `source` (the current content of `path`).
    ///
    /// Parse failures and conflicting edits are returned as errors; the
    /// caller leaves the file untouched in that case.
    pub fn transform(
        &self,
        path: &str,
        source: &str,
        rules: &CompiledRules,
    ) -> MigrationResult<Transformed> {
        let transformed = match FileKind::classify(path) {
            FileKind::Markup if !rules.html_replacements.is_empty() => Transformed {
                content: apply_text_replacements(source, &rules.html_replacements),
                strategy: Strategy::Markup,
            },
            FileKind::Code => Transformed {
                content: self.transform_code(path, source, &rules.replacements)?,
                strategy: Strategy::Code,
            },
            FileKind::Markup | FileKind::Other => Transformed {
                content: apply_text_replacements(source, &rules.replacements),
                strategy: Strategy::Text,
            },
        };
        Ok(transformed)
    }

    /// Run replacements over a code file in declared order.
    ///
    /// Consecutive identifier replacements share one parse. A replacement
    /// whose `from` is already renamed by (or produced by) the pending batch
    /// starts a new batch, so chained renames see the earlier result.
    fn transform_code(
        &self,
        path: &str,
        source: &str,
        replacements: &[CompiledReplacement],
    ) -> AstResult<String> {
        let mut text = source.to_string();
        let mut batch: Vec<&CompiledReplacement> = Vec::new();

        for rep in replacements {
            match rep.kind() {
                ReplacementKind::Identifier => {
                    let chained = batch
                        .iter()
                        .any(|pending| pending.from() == rep.from() || pending.to() == rep.from());
                    if chained {
                        text = self.rename(path, text, &batch)?;
                        batch.clear();
                    }
                    batch.push(rep);
                }
                ReplacementKind::Literal | ReplacementKind::RegexRule => {
                    text = self.rename(path, text, &batch)?;
                    batch.clear();
                    text = rep.apply_to_text(&text).into_owned();
                }
            }
        }

        self.rename(path, text, &batch)
    }

    fn rename(
        &self,
        path: &str,
        source: String,
        batch: &[&CompiledReplacement],
    ) -> AstResult<String> {
        if batch.is_empty() {
            return Ok(source);
        }
        let edits = plan_rename_edits(&self.provider, path, &source, batch)?;
        if edits.is_empty() {
            return Ok(source);
        }
        let result = apply_edits(&source, edits)?;
        let stats = &result.statistics;
        debug!(
            file_path = %path,
            applied = stats.applied_count,
            duplicates = stats.duplicate_count,
            lines_added = stats.lines_added,
            lines_removed = stats.lines_removed,
            characters_added = stats.characters_added,
            characters_removed = stats.characters_removed,
            "Applied rename edits"
        );
        Ok(result.transformed_source)
    }
}

/// Apply replacements to the whole text, left to right, without a syntax tree.
pub fn apply_text_replacements(source: &str, replacements: &[CompiledReplacement]) -> String {
    replacements
        .iter()
        .fold(source.to_string(), |text, rep| rep.apply_to_text(&text).into_owned())
}
