//! Change sets and the rule-set document that groups them into categories.

use crate::error::{MigrationError, MigrationResult};
use crate::model::replacement::{CompiledReplacement, Replacement};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

/// A named bundle of file patterns and replacements describing one API migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    /// Human-readable summary of the API change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Globs selecting the files this change set applies to
    pub file_patterns: Vec<String>,
    /// Replacements for code and plain-text files, in application order
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    /// Replacements used instead of `replacements` for markup files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_replacements: Option<Vec<Replacement>>,
}

impl ChangeSet {
    /// Label used in logs and reports.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .or_else(|| self.file_patterns.first().map(String::as_str))
            .unwrap_or("<unnamed change set>")
    }

    /// Check structural invariants and compile every replacement.
    ///
    /// Returns `(replacements, html_replacements)` in declared order.
    pub fn compile_replacements(
        &self,
    ) -> MigrationResult<(Vec<CompiledReplacement>, Vec<CompiledReplacement>)> {
        if self.file_patterns.is_empty() {
            return Err(MigrationError::rule_set_invalid(format!(
                "change set '{}' declares no file patterns",
                self.label()
            )));
        }
        if let Some(pattern) = self.file_patterns.iter().find(|p| p.trim().is_empty()) {
            return Err(MigrationError::pattern(pattern, "pattern is empty"));
        }

        let replacements = self
            .replacements
            .iter()
            .map(Replacement::compile)
            .collect::<MigrationResult<Vec<_>>>()?;
        let html_replacements = self
            .html_replacements
            .iter()
            .flatten()
            .map(Replacement::compile)
            .collect::<MigrationResult<Vec<_>>>()?;

        Ok((replacements, html_replacements))
    }
}

/// The full collection of change sets for one migration, keyed by category.
///
/// Category order is the document order of the JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    categories: IndexMap<String, Option<Vec<ChangeSet>>>,
}

impl RuleSet {
    /// Parse and validate a rule-set JSON document.
    ///
    /// The whole document is validated up front (structure, non-empty file
    /// patterns, regex syntax) so that a malformed rule-set never causes a
    /// partial migration.
    pub fn from_json(text: &str) -> MigrationResult<Self> {
        // Deserialize directly so category order survives
        let rule_set: RuleSet = serde_json::from_str(text).map_err(|e| match e.classify() {
            Category::Data => MigrationError::rule_set_invalid(format!(
                "expected an object mapping categories to change sets: {}",
                e
            )),
            Category::Io | Category::Syntax | Category::Eof => MigrationError::Json(e),
        })?;

        for (category, change_set) in rule_set.change_sets() {
            change_set.compile_replacements().map_err(|err| match err {
                MigrationError::RuleSetInvalid { message } => {
                    MigrationError::rule_set_invalid(format!("{}: {}", category, message))
                }
                other => other,
            })?;
        }

        Ok(rule_set)
    }

    /// Iterate categories in document order. Null categories are skipped.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[ChangeSet])> {
        self.categories
            .iter()
            .filter_map(|(name, sets)| sets.as_deref().map(|sets| (name.as_str(), sets)))
    }

    /// Iterate every change set with its category, in application order.
    pub fn change_sets(&self) -> impl Iterator<Item = (&str, &ChangeSet)> {
        self.categories()
            .flat_map(|(name, sets)| sets.iter().map(move |set| (name, set)))
    }

    pub fn len(&self) -> usize {
        self.change_sets().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_categories_keep_document_order() {
        let rule_set = RuleSet::from_json(
            r#"{
                "services": [{ "filePatterns": ["**/*.service.ts"], "replacements": [] }],
                "components": [{ "filePatterns": ["**/*.component.ts"], "replacements": [] }],
                "zzz-custom": [{ "filePatterns": ["**/*.txt"], "replacements": [] }]
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = rule_set.categories().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["services", "components", "zzz-custom"]);
    }

    #[test]
    fn test_null_category_is_skipped() {
        let rule_set = RuleSet::from_json(r#"{ "pipes": null }"#).unwrap();
        assert!(rule_set.is_empty());
    }

    #[test]
    fn test_regex_flag_spellings() {
        let rule_set = RuleSet::from_json(
            r#"{ "other": [{
                "filePatterns": ["**/*.ts"],
                "replacements": [
                    { "from": "a(b)", "to": "$1", "regex": true },
                    { "from": "c(d)", "to": "$1", "isRegex": true },
                    { "from": "plain", "to": "text" }
                ]
            }] }"#,
        )
        .unwrap();

        let (_, set) = rule_set.change_sets().next().unwrap();
        let flags: Vec<bool> = set.replacements.iter().map(|r| r.is_regex).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_empty_file_patterns_rejected() {
        let err = RuleSet::from_json(
            r#"{ "components": [{ "filePatterns": [], "replacements": [] }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::RuleSetInvalid { .. }));
        assert!(err.to_string().contains("components"));
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err = RuleSet::from_json("[1, 2, 3]").unwrap_err();
        assert!(err.is_rule_set_error());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = RuleSet::from_json("{ not json").unwrap_err();
        assert!(matches!(err, MigrationError::Json(_)));
        assert!(err.is_rule_set_error());
    }

    #[test]
    fn test_label_prefers_description() {
        let mut set = ChangeSet {
            description: Some("Rename inputs".to_string()),
            file_patterns: vec!["**/*.ts".to_string()],
            replacements: vec![],
            html_replacements: None,
        };
        assert_eq!(set.label(), "Rename inputs");
        set.description = None;
        assert_eq!(set.label(), "**/*.ts");
    }
}
