use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Delimiter used to split free-text skill input when nothing else is configured.
pub const DEFAULT_SKILL_DELIMITER: char = ',';

/// Normalized, de-duplicated skill tokens.
///
/// Members are lowercase, trimmed and never empty. The first-occurrence order of the raw input
/// is kept for display, while matching only ever consults membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet {
    tokens: Vec<String>,
    index: HashSet<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from already-split raw tokens.
    pub fn from_tokens<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for token in raw {
            set.insert(token.as_ref());
        }
        set
    }

    /// Split free text on `delimiter` and normalize every piece.
    pub fn parse(text: &str, delimiter: char) -> Self {
        Self::from_tokens(text.split(delimiter))
    }

    fn insert(&mut self, raw: &str) -> bool {
        let token = normalize_token(raw);
        if token.is_empty() || self.index.contains(&token) {
            return false;
        }
        self.index.insert(token.clone());
        self.tokens.push(token);
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.index.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for SkillSet {}

impl From<Vec<String>> for SkillSet {
    fn from(raw: Vec<String>) -> Self {
        Self::from_tokens(raw)
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.tokens
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Raw skill input as it arrives from forms, uploads or CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillInput {
    Text(String),
    Tokens(Vec<String>),
}

impl SkillInput {
    pub fn normalize(&self, delimiter: char) -> SkillSet {
        normalize(self, delimiter)
    }
}

impl Default for SkillInput {
    fn default() -> Self {
        SkillInput::Tokens(Vec::new())
    }
}

/// Canonicalize raw skill input into a [`SkillSet`]. Never fails.
pub fn normalize(input: &SkillInput, delimiter: char) -> SkillSet {
    match input {
        SkillInput::Text(text) => SkillSet::parse(text, delimiter),
        SkillInput::Tokens(tokens) => SkillSet::from_tokens(tokens),
    }
}

pub(crate) fn normalize_token(raw: &str) -> String {
    let cleaned = raw.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}
