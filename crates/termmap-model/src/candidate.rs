use serde::{Deserialize, Serialize};

use crate::vocabulary::VocabularyRow;

/// Relevance attached by a retriever, if it provides one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RetrievalScore {
    Scored(f64),
    #[default]
    Unscored,
}

impl RetrievalScore {
    /// Numeric value of a scored candidate; non-finite scores read as 0.0.
    pub fn value(self) -> Option<f64> {
        match self {
            RetrievalScore::Scored(score) if score.is_finite() => Some(score),
            RetrievalScore::Scored(_) => Some(0.0),
            RetrievalScore::Unscored => None,
        }
    }
}

/// A retrieved vocabulary row awaiting ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub row: VocabularyRow,
    pub retrieval_score: RetrievalScore,
}

impl Candidate {
    pub fn scored(row: VocabularyRow, score: f64) -> Self {
        Self {
            row,
            retrieval_score: RetrievalScore::Scored(score),
        }
    }

    pub fn unscored(row: VocabularyRow) -> Self {
        Self {
            row,
            retrieval_score: RetrievalScore::Unscored,
        }
    }
}

/// A candidate with its final ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub row: VocabularyRow,
    pub retrieval_score: RetrievalScore,
    pub final_score: f64,
}

impl RankedCandidate {
    pub fn new(candidate: Candidate, final_score: f64) -> Self {
        Self {
            row: candidate.row,
            retrieval_score: candidate.retrieval_score,
            final_score,
        }
    }
}
