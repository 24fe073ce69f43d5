//! Query and vocabulary text canonicalization.
//!
//! Normalization is a two-stage process:
//!
//! 1. minimal cleanup: lowercase, every run of non-alphanumeric characters
//!    becomes a single space, surrounding whitespace is trimmed;
//! 2. token-wise acronym expansion against a merged map of built-in
//!    abbreviations overlaid by corpus-learned ones.
//!
//! Expansions are cleaned once and inserted as-is; they are never expanded
//! again, so a single pass always terminates.

use std::collections::{BTreeMap, BTreeSet};

use crate::acronyms::AcronymMap;

/// Connective words kept verbatim when they sit inside a phrase.
pub const STOP_WORDS: [&str; 9] = ["a", "an", "and", "the", "for", "in", "of", "on", "with"];

/// Hand-authored expansions applied regardless of the vocabulary.
const BUILTIN_ACRONYMS: [(&str, &str); 5] = [
    ("us", "ultrasound"),
    ("sono", "ultrasonography"),
    ("prom", "premature rupture of membranes"),
    ("ct", "computed tomography"),
    ("mri", "magnetic resonance imaging"),
];

/// Lowercase and collapse punctuation and whitespace, without acronym expansion.
pub fn normalize_minimal(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Normalizes `text` with the built-in acronyms overlaid by `acronyms`.
///
/// Builds the merged map on every call; hold a [`Normalizer`] when
/// normalizing many strings.
pub fn normalize_text(text: &str, acronyms: &AcronymMap) -> String {
    Normalizer::new(acronyms).normalize(text)
}

/// Deterministic text canonicalizer with a fixed acronym table.
#[derive(Debug, Clone)]
pub struct Normalizer {
    expansions: BTreeMap<String, String>,
}

impl Normalizer {
    /// Merges the built-in table with `learned`; learned entries win on collision.
    pub fn new(learned: &AcronymMap) -> Self {
        let mut expansions: BTreeMap<String, String> = BTreeMap::new();
        for (token, expansion) in BUILTIN_ACRONYMS {
            expansions.insert(token.to_string(), normalize_minimal(expansion));
        }
        for (token, expansion) in learned.iter() {
            expansions.insert(token.to_string(), normalize_minimal(expansion));
        }
        Self { expansions }
    }

    /// Normalizer using only the built-in table.
    pub fn builtin() -> Self {
        Self::new(&AcronymMap::default())
    }

    /// Cleaned expansion for `token`, if it is a known acronym.
    pub fn expansion(&self, token: &str) -> Option<&str> {
        self.expansions.get(token).map(String::as_str)
    }

    pub fn acronym_count(&self) -> usize {
        self.expansions.len()
    }

    pub fn normalize(&self, text: &str) -> String {
        let cleaned = normalize_minimal(text);
        let tokens: Vec<&str> = cleaned.split(' ').filter(|t| !t.is_empty()).collect();
        let last = tokens.len().saturating_sub(1);

        let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().copied().enumerate() {
            let interior = index > 0 && index < last;
            if interior && STOP_WORDS.contains(&token) {
                out.push(token);
                continue;
            }
            match self.expansions.get(token) {
                Some(expansion) => out.extend(expansion.split(' ').filter(|t| !t.is_empty())),
                None => out.push(token),
            }
        }
        out.join(" ")
    }

    /// Distinct tokens of the normalized form of `text`.
    pub fn tokens(&self, text: &str) -> BTreeSet<String> {
        self.normalize(text)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::builtin()
    }
}
