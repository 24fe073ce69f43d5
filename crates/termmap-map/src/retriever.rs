//! Lexical top-K retrieval over one vocabulary partition.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use termmap_model::{Candidate, SystemId, Vocabulary};
use termmap_normalize::Normalizer;
use tracing::{debug, info};

const BM25_K1: f64 = 1.2;
const BM25_B: f64 = 0.75;

/// Source of lexically plausible candidates for a normalized query.
///
/// The order of the returned candidates is advisory; the ranker derives its
/// own ordering.
pub trait Retriever: Send + Sync {
    fn system(&self) -> SystemId;

    /// At most `k` candidates; empty when nothing matches.
    fn retrieve(&self, normalized_query: &str, k: usize) -> Vec<Candidate>;
}

#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: u32,
    term_freq: u32,
}

/// Okapi BM25 index over the normalized display strings of a vocabulary.
///
/// Rows whose display strings normalize identically share one document,
/// resolved to the first such row. Later duplicates are unreachable through
/// this index, although display selection can still surface them.
#[derive(Debug)]
pub struct Bm25Retriever {
    vocabulary: Arc<Vocabulary>,
    /// Document id -> first row index with that normalized text.
    doc_rows: Vec<usize>,
    doc_lengths: Vec<u32>,
    avg_doc_len: f64,
    postings: HashMap<String, Vec<Posting>>,
    attach_scores: bool,
}

impl Bm25Retriever {
    pub fn new(vocabulary: Arc<Vocabulary>, normalizer: &Normalizer) -> Self {
        let mut seen: HashMap<String, u32> = HashMap::new();
        let mut doc_rows = Vec::new();
        let mut doc_lengths = Vec::new();
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut total_len: u64 = 0;

        for (row_index, row) in vocabulary.rows().iter().enumerate() {
            let normalized = normalizer.normalize(&row.text);
            if normalized.is_empty() || seen.contains_key(&normalized) {
                continue;
            }
            let doc = doc_rows.len() as u32;
            let mut term_freqs: HashMap<&str, u32> = HashMap::new();
            let mut length = 0u32;
            for token in normalized.split(' ') {
                *term_freqs.entry(token).or_default() += 1;
                length += 1;
            }
            for (token, term_freq) in term_freqs {
                postings
                    .entry(token.to_string())
                    .or_default()
                    .push(Posting { doc, term_freq });
            }
            doc_rows.push(row_index);
            doc_lengths.push(length);
            total_len += u64::from(length);
            seen.insert(normalized, doc);
        }

        let avg_doc_len = if doc_rows.is_empty() {
            0.0
        } else {
            total_len as f64 / doc_rows.len() as f64
        };
        info!(
            system = %vocabulary.system(),
            rows = vocabulary.len(),
            documents = doc_rows.len(),
            terms = postings.len(),
            "retrieval index built"
        );

        Self {
            vocabulary,
            doc_rows,
            doc_lengths,
            avg_doc_len,
            postings,
            attach_scores: false,
        }
    }

    /// Attach `bm25 / (bm25 + 2)` to every candidate instead of leaving the
    /// ranker to compute token overlap.
    #[must_use]
    pub fn with_scores(mut self, attach: bool) -> Self {
        self.attach_scores = attach;
        self
    }

    pub fn document_count(&self) -> usize {
        self.doc_rows.len()
    }

    fn score_documents(&self, normalized_query: &str) -> Vec<(u32, f64)> {
        let total_docs = self.doc_rows.len() as f64;
        let query_tokens: BTreeSet<&str> = normalized_query
            .split(' ')
            .filter(|t| !t.is_empty())
            .collect();

        let mut scores: HashMap<u32, f64> = HashMap::new();
        for token in query_tokens {
            let Some(postings) = self.postings.get(token) else {
                continue;
            };
            let df = postings.len() as f64;
            let idf = ((total_docs - df + 0.5) / (df + 0.5)).ln_1p().max(0.0);
            for posting in postings {
                let tf = f64::from(posting.term_freq);
                let doc_len = f64::from(self.doc_lengths[posting.doc as usize]);
                let length_norm = 1.0 - BM25_B + BM25_B * doc_len / self.avg_doc_len.max(1.0);
                let denom = tf + BM25_K1 * length_norm;
                if denom > 0.0 {
                    *scores.entry(posting.doc).or_default() += idf * (tf * (BM25_K1 + 1.0) / denom);
                }
            }
        }

        let mut ranked: Vec<(u32, f64)> = scores.into_iter().filter(|(_, s)| *s > 0.0).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }
}

impl Retriever for Bm25Retriever {
    fn system(&self) -> SystemId {
        self.vocabulary.system()
    }

    fn retrieve(&self, normalized_query: &str, k: usize) -> Vec<Candidate> {
        if k == 0 || self.doc_rows.is_empty() {
            return Vec::new();
        }
        let mut ranked = self.score_documents(normalized_query);
        ranked.truncate(k);
        debug!(system = %self.system(), hits = ranked.len(), k, "retrieved candidates");

        ranked
            .into_iter()
            .filter_map(|(doc, bm25)| {
                let row = self.vocabulary.get(self.doc_rows[doc as usize])?.clone();
                Some(if self.attach_scores {
                    Candidate::scored(row, bm25 / (bm25 + 2.0))
                } else {
                    Candidate::unscored(row)
                })
            })
            .collect()
    }
}
