//! Migration orchestrator: load the rule-set, then run every change set
//! through selection, transformation and write-back.

use super::content::{CompiledRules, ContentTransformer};
use super::patterns::PatternExpander;
use super::report::{FileChange, FileIssue, MigrationReport, Strategy};
use super::selector::FileSelector;
use super::tree::FileTree;
use apishift_ast::{SyntaxProvider, TypeScriptSyntax};
use apishift_config::MigrationConfig;
use apishift_foundation::{MigrationError, MigrationResult, RuleSet};
use indexmap::IndexSet;
use tracing::{debug, error, info, warn};

/// A change set ready to run: patterns expanded, globs and rules compiled.
#[derive(Debug, Clone)]
pub struct PreparedChangeSet {
    pub category: String,
    pub label: String,
    pub patterns: IndexSet<String>,
    selector: FileSelector,
    rules: CompiledRules,
}

/// Runs one migration over a file tree.
pub struct MigrationRunner<P = TypeScriptSyntax> {
    config: MigrationConfig,
    expander: PatternExpander,
    transformer: ContentTransformer<P>,
}

impl MigrationRunner<TypeScriptSyntax> {
    pub fn new(config: MigrationConfig) -> Self {
        Self::with_provider(config, TypeScriptSyntax::new())
    }
}

impl<P: SyntaxProvider> MigrationRunner<P> {
    pub fn with_provider(config: MigrationConfig, provider: P) -> Self {
        Self {
            expander: PatternExpander::from_config(&config),
            transformer: ContentTransformer::with_provider(provider),
            config,
        }
    }

    /// Read the rule-set document: the tree first, then the configured
    /// on-disk file. `Ok(None)` means there is nothing to migrate.
    pub fn load_rule_set<T>(&self, tree: &T) -> MigrationResult<Option<RuleSet>>
    where
        T: FileTree + ?Sized,
    {
        let rule_set_path = self.config.rule_set_path.as_str();
        let text = match tree.read(rule_set_path) {
            Some(bytes) => {
                debug!(path = %rule_set_path, "Reading rule-set from tree");
                String::from_utf8(bytes).map_err(|_| {
                    MigrationError::rule_set_invalid(format!("{} is not valid UTF-8", rule_set_path))
                })?
            }
            None => match &self.config.rule_set_file {
                Some(file) if file.is_file() => {
                    debug!(path = %file.display(), "Reading rule-set from disk");
                    std::fs::read_to_string(file)?
                }
                _ => return Ok(None),
            },
        };

        RuleSet::from_json(&text).map(Some)
    }

    /// Expand patterns and compile every change set.
    ///
    /// Runs before anything is written so a bad glob or regex anywhere in
    /// the rule-set leaves the whole tree untouched.
    pub fn prepare(&self, rule_set: &RuleSet) -> MigrationResult<Vec<PreparedChangeSet>> {
        rule_set
            .change_sets()
            .map(|(category, change_set)| -> MigrationResult<PreparedChangeSet> {
                let patterns = self.expander.expand_all(&change_set.file_patterns);
                let selector = FileSelector::new(&self.config.scope_roots, &patterns)?;
                let rules = CompiledRules::compile(change_set)?;
                Ok(PreparedChangeSet {
                    category: category.to_string(),
                    label: change_set.label().to_string(),
                    patterns,
                    selector,
                    rules,
                })
            })
            .collect()
    }

    /// Run the whole migration and report what happened.
    pub fn run<T>(&self, tree: &mut T) -> MigrationReport
    where
        T: FileTree + ?Sized,
    {
        let rule_set_path = self.config.rule_set_path.as_str();

        let rule_set = match self.load_rule_set(&*tree) {
            Ok(Some(rule_set)) => rule_set,
            Ok(None) => {
                info!(path = %rule_set_path, "No {} found; skipping API migration", rule_set_path);
                return MigrationReport::no_rule_set();
            }
            Err(err) => {
                error!(path = %rule_set_path, error = %err, "Invalid {}", rule_set_path);
                return MigrationReport::invalid_rule_set(err.to_string());
            }
        };

        let prepared = match self.prepare(&rule_set) {
            Ok(prepared) => prepared,
            Err(err) => {
                error!(path = %rule_set_path, error = %err, "Invalid {}", rule_set_path);
                return MigrationReport::invalid_rule_set(err.to_string());
            }
        };

        info!(change_sets = prepared.len(), "Applying API changes");

        let mut report = MigrationReport::completed();
        for change_set in &prepared {
            self.apply(tree, change_set, &mut report);
        }

        info!(
            modified = report.modified_files().len(),
            issues = report.issues.len(),
            "API migration complete"
        );
        report
    }

    /// Run one prepared change set over every selected file.
    pub fn apply<T>(&self, tree: &mut T, change_set: &PreparedChangeSet, report: &mut MigrationReport)
    where
        T: FileTree + ?Sized,
    {
        let _span = tracing::debug_span!(
            "change_set",
            category = %change_set.category,
            change_set = %change_set.label
        )
        .entered();

        let paths: Vec<String> = change_set.selector.select(&*tree).collect();
        debug!(selected = paths.len(), "Selected files");

        for path in paths {
            let Some(bytes) = tree.read(&path) else {
                debug!(file_path = %path, "Skipping unreadable file");
                continue;
            };
            let Ok(source) = String::from_utf8(bytes) else {
                debug!(file_path = %path, "Skipping non UTF-8 file");
                continue;
            };

            let transformed = match self.transformer.transform(&path, &source, &change_set.rules) {
                Ok(transformed) => transformed,
                Err(err) => {
                    warn!(file_path = %path, error = %err, "Leaving file unchanged");
                    report.issues.push(FileIssue {
                        path,
                        change_set: change_set.label.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if transformed.content == source {
                continue;
            }

            if let Err(err) = tree.overwrite(&path, transformed.content.as_bytes()) {
                warn!(file_path = %path, error = %err, "Failed to write file");
                report.issues.push(FileIssue {
                    path,
                    change_set: change_set.label.clone(),
                    reason: err.to_string(),
                });
                continue;
            }

            match transformed.strategy {
                Strategy::Markup => info!(file_path = %path, "Applied HTML API changes"),
                Strategy::Code => info!(file_path = %path, "Applied TS API changes"),
                Strategy::Text => info!(file_path = %path, "Applied API changes"),
            }
            report.changes.push(FileChange {
                path,
                category: change_set.category.clone(),
                change_set: change_set.label.clone(),
                strategy: transformed.strategy,
            });
        }
    }
}
