//! Replacement templates for regex rules.
//!
//! Rule documents write `to` the way `String.prototype.replace` reads it:
//! `$1` and `$01` to `$99` for numbered groups, `$<name>` for named groups,
//! `$&` for the whole match, `` $` `` and `$'` for the text around it, and
//! `$$` for a literal dollar. A token that refers to a group the pattern does
//! not have stays literal text.

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Group(usize),
    Named(String),
    Match,
    Before,
    After,
}

/// A parsed `to` template, resolved against one compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTemplate {
    parts: Vec<Part>,
}

impl ReplacementTemplate {
    /// Parse `template` for matches of `pattern`.
    pub fn parse(template: &str, pattern: &Regex) -> Self {
        let group_count = pattern.captures_len() - 1;
        let has_named = pattern.capture_names().flatten().next().is_some();

        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = template;

        while let Some(dollar) = rest.find('$') {
            text.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            let (part, consumed) = match after.as_bytes() {
                [b'$', ..] => (Some(Part::Text("$".to_string())), 1),
                [b'&', ..] => (Some(Part::Match), 1),
                [b'`', ..] => (Some(Part::Before), 1),
                [b'\'', ..] => (Some(Part::After), 1),
                [b'<', ..] if has_named => match after.find('>') {
                    Some(close) => (Some(Part::Named(after[1..close].to_string())), close + 1),
                    None => (None, 0),
                },
                [first @ b'0'..=b'9', tail @ ..] => {
                    let single = usize::from(first - b'0');
                    let double = match tail.first() {
                        Some(second @ b'0'..=b'9') => Some(single * 10 + usize::from(second - b'0')),
                        _ => None,
                    };
                    match double {
                        Some(index) if (1..=group_count).contains(&index) => {
                            (Some(Part::Group(index)), 2)
                        }
                        _ if (1..=group_count).contains(&single) => (Some(Part::Group(single)), 1),
                        _ => (None, 0),
                    }
                }
                _ => (None, 0),
            };

            match part {
                Some(Part::Text(literal)) => text.push_str(&literal),
                Some(part) => {
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    parts.push(part);
                }
                None => text.push('$'),
            }
            rest = &after[consumed..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }
        Self { parts }
    }

    /// Expand the template for one match found in `haystack`.
    pub fn expand(&self, caps: &Captures<'_>, haystack: &str) -> String {
        let Some(whole) = caps.get(0) else {
            return String::new();
        };
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Group(index) => {
                    out.push_str(caps.get(*index).map_or("", |m| m.as_str()));
                }
                Part::Named(name) => {
                    out.push_str(caps.name(name).map_or("", |m| m.as_str()));
                }
                Part::Match => out.push_str(whole.as_str()),
                Part::Before => out.push_str(&haystack[..whole.start()]),
                Part::After => out.push_str(&haystack[whole.end()..]),
            }
        }
        out
    }
}
