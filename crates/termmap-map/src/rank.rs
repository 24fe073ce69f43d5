//! Candidate ranking.
//!
//! Each candidate's score starts from lexical similarity (the retriever's
//! score when it provides one, token-set Jaccard otherwise) and is adjusted
//! by:
//! - a prefix bonus for near-exact phrases,
//! - anatomical-site agreement (query tokens that are not generic imaging
//!   words must appear in the candidate),
//! - a penalty for contrast variants the query did not ask for,
//! - a per-system term-type bonus.
//!
//! For SNOMED, candidates are first gated by semantic type. The gate is
//! dropped when it would leave nothing, so a non-empty input never ranks to
//! an empty output.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use termmap_model::{Candidate, EntityQuery, EntityType, RankedCandidate, SystemId};
use termmap_normalize::Normalizer;
use tracing::warn;

use crate::params::ScoringParams;

/// Generic imaging and procedure words; every other query token names a site.
pub const IMAGING_WORDS: [&str; 13] = [
    "mri",
    "magnetic",
    "resonance",
    "ct",
    "ultrasound",
    "us",
    "x",
    "xray",
    "x-ray",
    "xr",
    "scan",
    "imaging",
    "tomography",
];

const CONTRAST_TOKENS: [&str; 3] = ["contrast", "gad", "gadolinium"];

/// A component contributing to a candidate's score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    /// Component name (e.g., "Token overlap").
    pub name: &'static str,
    /// Signed contribution.
    pub value: f64,
    pub description: String,
}

/// Score of one candidate. `components` is only filled in by
/// [`Ranker::explain`].
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Similarity after prefix, site and contrast adjustments.
    pub base: f64,
    pub term_type_bonus: f64,
    pub final_score: f64,
    pub components: Vec<ScoreComponent>,
}

impl CandidateScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}: {:+.3}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

struct QueryContext {
    normalized: String,
    tokens: BTreeSet<String>,
    site_tokens: BTreeSet<String>,
    wants_contrast: bool,
}

/// Orders candidates for one query. Holds only immutable state and may be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Ranker {
    normalizer: Arc<Normalizer>,
    params: ScoringParams,
}

impl Ranker {
    pub fn new(normalizer: Arc<Normalizer>, params: ScoringParams) -> Self {
        Self { normalizer, params }
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Ranks `candidates` best first.
    ///
    /// Ties on final score fall back to the term-type bonus, then the
    /// adjusted similarity, then the shorter display string; anything still
    /// tied keeps its input order.
    pub fn rank(
        &self,
        query: &EntityQuery,
        system: SystemId,
        candidates: Vec<Candidate>,
    ) -> Vec<RankedCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let candidates = match system {
            SystemId::Snomed => gate_semantic_types(&query.entity(), candidates),
            SystemId::RxNorm => candidates,
        };

        let context = self.query_context(&query.text);
        let mut scored: Vec<(Candidate, CandidateScore, usize)> = candidates
            .into_iter()
            .map(|candidate| {
                let score = self.score(&context, system, &candidate, false);
                let len = candidate.row.text_len();
                (candidate, score, len)
            })
            .collect();

        scored.sort_by(|(_, a, a_len), (_, b, b_len)| {
            descending(a.final_score, b.final_score)
                .then_with(|| descending(a.term_type_bonus, b.term_type_bonus))
                .then_with(|| descending(a.base, b.base))
                .then_with(|| a_len.cmp(b_len))
        });

        scored
            .into_iter()
            .map(|(candidate, score, _)| RankedCandidate::new(candidate, score.final_score))
            .collect()
    }

    /// Scores a single candidate without gating, for diagnostics.
    pub fn explain(&self, query: &EntityQuery, system: SystemId, candidate: &Candidate) -> CandidateScore {
        let context = self.query_context(&query.text);
        self.score(&context, system, candidate, true)
    }

    fn query_context(&self, text: &str) -> QueryContext {
        let normalized = self.normalizer.normalize(text);
        let tokens: BTreeSet<String> = split_tokens(&normalized).map(str::to_string).collect();
        let site_tokens = tokens
            .iter()
            .filter(|token| !IMAGING_WORDS.contains(&token.as_str()))
            .cloned()
            .collect();
        let wants_contrast = mentions_plus_c(&text.to_lowercase())
            || tokens
                .iter()
                .any(|token| CONTRAST_TOKENS.contains(&token.as_str()));
        QueryContext {
            normalized,
            tokens,
            site_tokens,
            wants_contrast,
        }
    }

    fn score(
        &self,
        context: &QueryContext,
        system: SystemId,
        candidate: &Candidate,
        explain: bool,
    ) -> CandidateScore {
        let params = &self.params;
        let row = &candidate.row;
        let normalized = self.normalizer.normalize(&row.text);
        let tokens: BTreeSet<&str> = split_tokens(&normalized).collect();
        let mut breakdown = Breakdown::new(explain);

        let mut base = match candidate.retrieval_score.value() {
            Some(score) => {
                breakdown.note("Retrieval score", score, || {
                    "score supplied by the retriever".into()
                });
                score
            }
            None => {
                let overlap = jaccard(&context.tokens, &tokens);
                breakdown.note("Token overlap", overlap, || {
                    format!("'{}' vs '{}'", context.normalized, normalized)
                });
                overlap
            }
        };

        if !context.normalized.is_empty()
            && !normalized.is_empty()
            && (normalized.starts_with(&context.normalized)
                || context.normalized.starts_with(&normalized))
        {
            base += params.prefix_bonus;
            breakdown.note("Prefix match", params.prefix_bonus, || {
                "one phrase starts with the other".into()
            });
        }

        let site_overlap = context
            .site_tokens
            .iter()
            .filter(|token| tokens.contains(token.as_str()))
            .count();
        if !context.site_tokens.is_empty() {
            if site_overlap == 0 {
                base -= params.site_miss_penalty;
                breakdown.note("Site mismatch", -params.site_miss_penalty, || {
                    "no query site token in candidate".into()
                });
            } else {
                let bonus = site_overlap.min(params.site_overlap_cap) as f64 * params.site_overlap_bonus;
                base += bonus;
                breakdown.note("Site match", bonus, || {
                    format!("{site_overlap} site token(s) shared")
                });
            }
        }

        let contrast_applies = context.site_tokens.is_empty() || site_overlap > 0;
        if !context.wants_contrast && contrast_applies && normalized.contains("contrast") {
            base -= params.contrast_penalty;
            breakdown.note("Unrequested contrast", -params.contrast_penalty, || {
                "candidate is a contrast variant".into()
            });
        }

        let rank = system.term_type_rank(&row.term_type);
        let term_type_bonus = params.term_type_bonus(system).for_rank(rank);
        if term_type_bonus > 0.0 {
            breakdown.note("Term type", term_type_bonus, || {
                format!("{} ranks {rank} in {system}", row.term_type)
            });
        }

        CandidateScore {
            base,
            term_type_bonus,
            final_score: base + term_type_bonus,
            components: breakdown.into_components(),
        }
    }
}

/// Score components, collected only when an explanation was asked for.
struct Breakdown {
    components: Option<Vec<ScoreComponent>>,
}

impl Breakdown {
    fn new(explain: bool) -> Self {
        Self {
            components: explain.then(Vec::new),
        }
    }

    fn note(&mut self, name: &'static str, value: f64, description: impl FnOnce() -> String) {
        if let Some(components) = &mut self.components {
            components.push(ScoreComponent {
                name,
                value,
                description: description(),
            });
        }
    }

    fn into_components(self) -> Vec<ScoreComponent> {
        self.components.unwrap_or_default()
    }
}

/// Keeps candidates whose semantic type suits `entity`, or all of them when
/// none do.
pub fn gate_semantic_types(entity: &EntityType, candidates: Vec<Candidate>) -> Vec<Candidate> {
    if entity.allowed_semantic_types().is_none() {
        return candidates;
    }
    if !candidates
        .iter()
        .any(|candidate| entity.admits(&candidate.row.semantic_type))
    {
        warn!(
            entity_type = %entity,
            candidates = candidates.len(),
            "semantic-type gate removed every candidate, ranking ungated"
        );
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|candidate| entity.admits(&candidate.row.semantic_type))
        .collect()
}

fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|token| !token.is_empty())
}

fn jaccard(query: &BTreeSet<String>, candidate: &BTreeSet<&str>) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let shared = query
        .iter()
        .filter(|token| candidate.contains(token.as_str()))
        .count();
    if shared == 0 {
        return 0.0;
    }
    let union = query.len() + candidate.len() - shared;
    shared as f64 / union as f64
}

/// `+c` shorthand, as in "ct abd +c", but not "+ca".
fn mentions_plus_c(lowered: &str) -> bool {
    lowered.match_indices("+c").any(|(index, _)| {
        !lowered[index + 2..]
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_alphanumeric())
    })
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jaccard_handles_empty_sets() {
        let query: BTreeSet<String> = ["knee".to_string()].into_iter().collect();
        assert_eq!(jaccard(&query, &BTreeSet::new()), 0.0);
        assert_eq!(jaccard(&BTreeSet::new(), &["knee"].into_iter().collect()), 0.0);
        let candidate: BTreeSet<&str> = ["knee", "joint"].into_iter().collect();
        assert!((jaccard(&query, &candidate) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn components_are_only_built_when_explaining() {
        let ranker = Ranker::new(Arc::new(Normalizer::builtin()), ScoringParams::default());
        let context = ranker.query_context("mri pelvis");
        let candidate = Candidate::unscored(termmap_model::VocabularyRow::new(
            SystemId::Snomed,
            "C1",
            "magnetic resonance imaging of pelvis",
            "diagnostic procedure",
            "PT",
        ));
        let quiet = ranker.score(&context, SystemId::Snomed, &candidate, false);
        let explained = ranker.score(&context, SystemId::Snomed, &candidate, true);
        assert!(quiet.components.is_empty());
        assert!(!explained.components.is_empty());
        assert_eq!(quiet.final_score, explained.final_score);
        assert_eq!(quiet.term_type_bonus, explained.term_type_bonus);
    }

    #[test]
    fn plus_c_needs_a_boundary() {
        assert!(mentions_plus_c("ct abdomen +c"));
        assert!(mentions_plus_c("ct abdomen +c/-c"));
        assert!(!mentions_plus_c("vitamin +ca"));
        assert!(!mentions_plus_c("ct abdomen"));
    }
}
