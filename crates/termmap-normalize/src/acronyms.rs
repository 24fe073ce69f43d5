//! Acronym dictionary learned from vocabulary display strings.
//!
//! Every multi-word display string proposes an acronym made of the initials
//! of its tokens of three or more characters ("computed tomography chest" ->
//! "ctc"). An acronym is kept once enough strings propose it, and maps to the
//! string that proposed it most often.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use termmap_model::VocabularyRow;
use tracing::debug;

use crate::normalize::normalize_minimal;

pub const DEFAULT_MIN_SUPPORT: usize = 3;
pub const DEFAULT_CAP: usize = 50_000;

/// Learned acronym -> expansion table. Absent tokens simply do not expand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcronymMap {
    entries: BTreeMap<String, String>,
}

impl AcronymMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, acronym: &str) -> Option<&str> {
        self.entries.get(acronym).map(String::as_str)
    }

    pub fn contains(&self, acronym: &str) -> bool {
        self.entries.contains_key(acronym)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for AcronymMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Initials of the tokens of three or more characters, if any.
pub fn make_acronym(text: &str) -> Option<String> {
    let acronym: String = normalize_minimal(text)
        .split(' ')
        .filter(|token| token.len() >= 3)
        .filter_map(|token| token.chars().next())
        .collect();
    (!acronym.is_empty()).then_some(acronym)
}

/// Support and size gates for acronym learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymLearner {
    /// Minimum number of source strings proposing an acronym.
    pub min_support: usize,
    /// Maximum number of acronyms kept, most supported first.
    pub cap: usize,
}

impl Default for AcronymLearner {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            cap: DEFAULT_CAP,
        }
    }
}

#[derive(Default)]
struct Tally {
    total: usize,
    /// Distinct source strings with their counts, in first-seen order.
    sources: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    fn record(&mut self, source: &str) {
        self.total += 1;
        if let Some(&position) = self.positions.get(source) {
            self.sources[position].1 += 1;
        } else {
            self.positions.insert(source.to_string(), self.sources.len());
            self.sources.push((source.to_string(), 1));
        }
    }

    /// Most frequent source; the first one seen wins ties.
    fn best(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.sources {
            if best.is_none_or(|current| entry.1 > current.1) {
                best = Some(entry);
            }
        }
        best.map(|(source, _)| source.as_str())
    }
}

impl AcronymLearner {
    pub fn new(min_support: usize, cap: usize) -> Self {
        Self { min_support, cap }
    }

    /// Learns acronyms from raw display strings.
    pub fn learn<'a, I>(&self, texts: I) -> AcronymMap
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut tallies: HashMap<String, Tally> = HashMap::new();

        for text in texts {
            let Some(acronym) = make_acronym(text) else {
                continue;
            };
            if !acronym.chars().all(|ch| ch.is_ascii_alphabetic()) {
                continue;
            }
            if normalize_minimal(text).split(' ').count() < 2 {
                continue;
            }
            let tally = tallies.entry(acronym.clone()).or_insert_with(|| {
                order.push(acronym);
                Tally::default()
            });
            tally.record(text);
        }

        let mut kept: Vec<(&str, &str, usize)> = order
            .iter()
            .filter_map(|acronym| {
                let tally = &tallies[acronym];
                if tally.total < self.min_support {
                    return None;
                }
                tally
                    .best()
                    .map(|best| (acronym.as_str(), best, tally.total))
            })
            .collect();
        // stable: equal support keeps first-seen order
        kept.sort_by(|a, b| b.2.cmp(&a.2));
        kept.truncate(self.cap);

        debug!(
            proposed = order.len(),
            kept = kept.len(),
            min_support = self.min_support,
            cap = self.cap,
            "acronyms learned"
        );
        kept.into_iter()
            .map(|(acronym, best, _)| (acronym, best))
            .collect()
    }

    pub fn learn_rows(&self, rows: &[VocabularyRow]) -> AcronymMap {
        self.learn(rows.iter().map(|row| row.text.as_str()))
    }
}

/// Learns acronyms from vocabulary rows with explicit gates.
pub fn learn_acronyms(rows: &[VocabularyRow], min_support: usize, cap: usize) -> AcronymMap {
    AcronymLearner::new(min_support, cap).learn_rows(rows)
}
