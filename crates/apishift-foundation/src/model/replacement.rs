//! Replacement rules and their compiled, classified form.

use crate::error::{MigrationError, MigrationResult};
use crate::model::template::ReplacementTemplate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single `from -> to` substitution declared in a change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Regex source when `is_regex`, otherwise a literal token or identifier
    pub from: String,
    /// Replacement text (a regex template when `is_regex`)
    pub to: String,
    /// Treat `from` as a regular expression
    #[serde(default, rename = "regex", alias = "isRegex")]
    pub is_regex: bool,
}

/// How a replacement is applied, decided once from its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplacementKind {
    /// Non-regex `from` with identifier syntax: renamed through the syntax tree
    Identifier,
    /// Non-regex `from` that is not an identifier: word-bounded text substitution
    Literal,
    /// Regex `from`: global regex substitution over the whole text
    RegexRule,
}

/// Check whether `name` is a syntactic identifier (`[A-Za-z_$][A-Za-z0-9_$]*`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Characters that can continue an identifier, and so break a whole-word match.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            is_regex: false,
        }
    }

    pub fn regex(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            is_regex: true,
        }
    }

    /// Classify this replacement.
    pub fn kind(&self) -> ReplacementKind {
        if self.is_regex {
            ReplacementKind::RegexRule
        } else if is_identifier(&self.from) {
            ReplacementKind::Identifier
        } else {
            ReplacementKind::Literal
        }
    }

    /// Validate and compile the matcher for this replacement.
    pub fn compile(&self) -> MigrationResult<CompiledReplacement> {
        if self.from.is_empty() {
            return Err(MigrationError::rule_set_invalid(
                "replacement 'from' must not be empty",
            ));
        }

        let kind = self.kind();
        let matcher = match kind {
            ReplacementKind::RegexRule => {
                let pattern =
                    Regex::new(&self.from).map_err(|e| MigrationError::regex(&self.from, e))?;
                let template = ReplacementTemplate::parse(&self.to, &pattern);
                Matcher::Pattern { pattern, template }
            }
            ReplacementKind::Identifier | ReplacementKind::Literal => Matcher::Word,
        };

        Ok(CompiledReplacement {
            from: self.from.clone(),
            to: self.to.clone(),
            kind,
            matcher,
        })
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Whole-word occurrences of `from`
    Word,
    Pattern {
        pattern: Regex,
        template: ReplacementTemplate,
    },
}

/// A replacement whose kind and matcher have been resolved.
#[derive(Debug, Clone)]
pub struct CompiledReplacement {
    from: String,
    to: String,
    kind: ReplacementKind,
    matcher: Matcher,
}

impl CompiledReplacement {
    pub fn kind(&self) -> ReplacementKind {
        self.kind
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// The identifier being renamed, if this is an identifier replacement.
    pub fn identifier(&self) -> Option<&str> {
        match self.kind {
            ReplacementKind::Identifier => Some(&self.from),
            ReplacementKind::Literal | ReplacementKind::RegexRule => None,
        }
    }

    /// Substitute every whole-word occurrence of `from`, inserting `to` verbatim.
    ///
    /// An edge of `from` that is an identifier character must not touch
    /// another identifier character (`$` included) in `text`.
    pub fn replace_words<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let from = self.from.as_str();
        let guard_start = from.starts_with(is_identifier_char);
        let guard_end = from.ends_with(is_identifier_char);

        let mut out = String::new();
        let mut copied = 0;
        let mut at = 0;
        while let Some(offset) = text[at..].find(from) {
            let start = at + offset;
            let end = start + from.len();
            let bounded = !(guard_start && text[..start].ends_with(is_identifier_char))
                && !(guard_end && text[end..].starts_with(is_identifier_char));
            if bounded {
                out.push_str(&text[copied..start]);
                out.push_str(&self.to);
                copied = end;
                at = end;
            } else {
                at = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
        }

        if copied == 0 {
            return Cow::Borrowed(text);
        }
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }

    /// Apply this replacement to a whole text without any syntax awareness.
    ///
    /// Regex rules expand `to` as a replacement template; the other kinds
    /// substitute whole words only.
    pub fn apply_to_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.matcher {
            Matcher::Pattern { pattern, template } => {
                pattern.replace_all(text, |caps: &Captures<'_>| template.expand(caps, text))
            }
            Matcher::Word => self.replace_words(text),
        }
    }
}
