//! End-to-end mapping of entity queries to vocabulary codes.
//!
//! The pipeline owns the per-system vocabularies and indexes, all built once
//! and read-only afterwards, so batches are mapped in parallel.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use termmap_model::{Candidate, EntityQuery, Prediction, RankedCandidate, SystemId, Vocabulary};
use termmap_normalize::{AcronymMap, Normalizer};
use tracing::{debug, info, warn};

use crate::display::select_display;
use crate::params::ScoringParams;
use crate::rank::{CandidateScore, Ranker};
use crate::retriever::{Bm25Retriever, Retriever};

pub const DEFAULT_TOP_K: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
    /// Candidates retrieved per query.
    pub top_k: usize,
    /// Rank on retriever scores instead of token overlap.
    pub attach_retrieval_scores: bool,
    pub scoring: ScoringParams,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            attach_retrieval_scores: false,
            scoring: ScoringParams::default(),
        }
    }
}

/// Ranked, display-resolved candidates for one query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub system: SystemId,
    pub normalized_query: String,
    pub ranked: Vec<RankedCandidate>,
}

impl QueryOutcome {
    pub fn prediction(&self) -> Prediction {
        match self.ranked.first() {
            Some(top) => Prediction {
                system: self.system,
                code: top.row.code.clone(),
                description: top.row.text.clone(),
            },
            None => Prediction::unmatched(self.system),
        }
    }
}

/// A display-resolved candidate with its score breakdown.
#[derive(Debug, Clone)]
pub struct ExplainedCandidate {
    pub candidate: RankedCandidate,
    /// Display string of the retrieved row the score was computed on.
    pub matched_text: String,
    pub score: CandidateScore,
}

struct SystemIndex {
    vocabulary: Arc<Vocabulary>,
    retriever: Box<dyn Retriever>,
}

pub struct MappingPipeline {
    normalizer: Arc<Normalizer>,
    ranker: Ranker,
    systems: BTreeMap<SystemId, SystemIndex>,
    options: PipelineOptions,
}

impl MappingPipeline {
    /// Indexes each vocabulary with a BM25 retriever.
    ///
    /// A later vocabulary for the same system replaces an earlier one.
    pub fn new(vocabularies: Vec<Vocabulary>, acronyms: &AcronymMap, options: PipelineOptions) -> Self {
        let normalizer = Arc::new(Normalizer::new(acronyms));
        let mut systems = BTreeMap::new();
        for vocabulary in vocabularies {
            let system = vocabulary.system();
            let vocabulary = Arc::new(vocabulary);
            let retriever = Bm25Retriever::new(Arc::clone(&vocabulary), &normalizer)
                .with_scores(options.attach_retrieval_scores);
            systems.insert(
                system,
                SystemIndex {
                    vocabulary,
                    retriever: Box::new(retriever),
                },
            );
        }
        info!(
            systems = systems.len(),
            acronyms = normalizer.acronym_count(),
            top_k = options.top_k,
            "mapping pipeline ready"
        );
        Self {
            ranker: Ranker::new(Arc::clone(&normalizer), options.scoring),
            normalizer,
            systems,
            options,
        }
    }

    /// Replaces the retriever of an indexed system.
    pub fn with_retriever(mut self, retriever: Box<dyn Retriever>) -> Self {
        match self.systems.get_mut(&retriever.system()) {
            Some(index) => index.retriever = retriever,
            None => warn!(system = %retriever.system(), "no vocabulary for retriever, ignored"),
        }
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn has_system(&self, system: SystemId) -> bool {
        self.systems.contains_key(&system)
    }

    pub fn rank_query(&self, query: &EntityQuery) -> QueryOutcome {
        let (outcome, _) = self.rank_with_sources(query);
        outcome
    }

    /// The best `limit` candidates of [`rank_query`](Self::rank_query), each
    /// with the score breakdown of the row that retrieval actually matched.
    pub fn explain_query(&self, query: &EntityQuery, limit: usize) -> Vec<ExplainedCandidate> {
        let (outcome, sources) = self.rank_with_sources(query);
        let entity = query.entity();
        outcome
            .ranked
            .into_iter()
            .take(limit)
            .filter_map(|ranked| {
                let source = sources.iter().find(|c| c.row.code == ranked.row.code)?;
                let score = self.ranker.explain(query, outcome.system, source);
                Some(ExplainedCandidate {
                    matched_text: source.row.text.clone(),
                    candidate: ranked,
                    score,
                })
            })
            .inspect(|explained| {
                debug!(
                    entity_type = %entity,
                    code = %explained.candidate.row.code,
                    explanation = %explained.score.explain(),
                    "candidate explained"
                );
            })
            .collect()
    }

    /// Display-resolved outcome plus the ranked candidates as retrieved.
    fn rank_with_sources(&self, query: &EntityQuery) -> (QueryOutcome, Vec<Candidate>) {
        let system = query.system();
        let normalized_query = self.normalizer.normalize(&query.text);
        let Some(index) = self.systems.get(&system) else {
            warn!(%system, "no vocabulary loaded for system");
            let outcome = QueryOutcome {
                system,
                normalized_query,
                ranked: Vec::new(),
            };
            return (outcome, Vec::new());
        };

        let candidates = index.retriever.retrieve(&normalized_query, self.options.top_k);
        let retrieved = candidates.len();
        let ranked = self.ranker.rank(query, system, candidates);
        let sources = ranked
            .iter()
            .map(|c| Candidate {
                row: c.row.clone(),
                retrieval_score: c.retrieval_score,
            })
            .collect();
        let ranked = select_display(system, ranked, &index.vocabulary, &query.entity());
        debug!(
            %system,
            retrieved,
            ranked = ranked.len(),
            top_score = ranked.first().map(|c| c.final_score),
            "query ranked"
        );
        let outcome = QueryOutcome {
            system,
            normalized_query,
            ranked,
        };
        (outcome, sources)
    }

    pub fn map_query(&self, query: &EntityQuery) -> Prediction {
        self.rank_query(query).prediction()
    }

    /// Maps every query; predictions come back in input order.
    pub fn map_all(&self, queries: &[EntityQuery]) -> Vec<Prediction> {
        self.map_all_with(queries, |_, _| {})
    }

    /// Like [`map_all`](Self::map_all), calling `observe` as each query
    /// completes. Calls arrive from worker threads in completion order.
    pub fn map_all_with<F>(&self, queries: &[EntityQuery], observe: F) -> Vec<Prediction>
    where
        F: Fn(&EntityQuery, &Prediction) + Sync,
    {
        queries
            .par_iter()
            .map(|query| {
                let prediction = self.map_query(query);
                observe(query, &prediction);
                prediction
            })
            .collect()
    }
}
