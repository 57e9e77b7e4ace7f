//! Per-run report returned by the migration runner.

use serde::Serialize;
use std::fmt;

/// Which transformation path rewrote a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Markup file rewritten with the change set's markup replacements
    Markup,
    /// Code file rewritten through the syntax tree and comment pass
    Code,
    /// Whole-text literal/regex substitution
    Text,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Markup => "markup",
            Strategy::Code => "code",
            Strategy::Text => "text",
        };
        f.write_str(name)
    }
}

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RunOutcome {
    /// No rule-set document was found; nothing to migrate
    NoRuleSet,
    /// The rule-set could not be loaded; the tree was left untouched
    InvalidRuleSet { message: String },
    /// Every change set was applied
    Completed,
}

/// A file rewritten by one change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub path: String,
    pub category: String,
    pub change_set: String,
    pub strategy: Strategy,
}

/// A selected file that was left unchanged because it could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIssue {
    pub path: String,
    pub change_set: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub outcome: RunOutcome,
    pub changes: Vec<FileChange>,
    pub issues: Vec<FileIssue>,
}

impl MigrationReport {
    pub fn new(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            changes: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn no_rule_set() -> Self {
        Self::new(RunOutcome::NoRuleSet)
    }

    pub fn invalid_rule_set(message: impl Into<String>) -> Self {
        Self::new(RunOutcome::InvalidRuleSet {
            message: message.into(),
        })
    }

    pub fn completed() -> Self {
        Self::new(RunOutcome::Completed)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.outcome, RunOutcome::InvalidRuleSet { .. })
    }

    /// Distinct modified paths, in first-modified order.
    pub fn modified_files(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for change in &self.changes {
            if !seen.contains(&change.path.as_str()) {
                seen.push(change.path.as_str());
            }
        }
        seen
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        match &self.outcome {
            RunOutcome::NoRuleSet => "No rule-set found; nothing to migrate".to_string(),
            RunOutcome::InvalidRuleSet { message } => {
                format!("Invalid rule-set, no files modified: {}", message)
            }
            RunOutcome::Completed => format!(
                "Modified {} file(s) with {} change(s); {} file(s) skipped",
                self.modified_files().len(),
                self.changes.len(),
                self.issues.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn change(path: &str) -> FileChange {
        FileChange {
            path: path.to_string(),
            category: "components".to_string(),
            change_set: "Rename inputs".to_string(),
            strategy: Strategy::Code,
        }
    }

    #[test]
    fn test_modified_files_are_distinct() {
        let mut report = MigrationReport::completed();
        report.changes.push(change("src/app/a.ts"));
        report.changes.push(change("src/app/b.ts"));
        report.changes.push(change("src/app/a.ts"));

        assert_eq!(report.modified_files(), vec!["src/app/a.ts", "src/app/b.ts"]);
        assert_eq!(
            report.summary(),
            "Modified 2 file(s) with 3 change(s); 0 file(s) skipped"
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let report = MigrationReport::invalid_rule_set("bad");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "invalidRuleSet");
        assert_eq!(json["outcome"]["message"], "bad");
        assert!(report.is_invalid());
    }
}
