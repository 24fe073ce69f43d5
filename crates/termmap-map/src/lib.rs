#![deny(unsafe_code)]

pub mod display;
pub mod params;
pub mod pipeline;
pub mod rank;
pub mod retriever;

pub use crate::display::select_display;
pub use crate::params::{ScoringParams, TermTypeBonus};
pub use crate::pipeline::{
    DEFAULT_TOP_K, ExplainedCandidate, MappingPipeline, PipelineOptions, QueryOutcome,
};
pub use crate::rank::{CandidateScore, Ranker, ScoreComponent};
pub use crate::retriever::{Bm25Retriever, Retriever};
