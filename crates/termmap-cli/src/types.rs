use std::path::PathBuf;
use std::time::Duration;

use termmap_map::ExplainedCandidate;
use termmap_model::SystemId;

#[derive(Debug)]
pub struct MapResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub acronyms: usize,
    pub systems: Vec<SystemSummary>,
    /// Per-query candidate breakdowns, empty unless requested.
    pub explanations: Vec<QueryExplanation>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct QueryExplanation {
    /// Query text, redacted unless data logging is enabled.
    pub query: String,
    pub entity_type: String,
    pub system: SystemId,
    pub candidates: Vec<ExplainedCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSummary {
    pub system: SystemId,
    pub vocabulary_rows: usize,
    pub queries: usize,
    pub matched: usize,
}

impl SystemSummary {
    pub fn unmatched(&self) -> usize {
        self.queries - self.matched
    }
}

#[derive(Debug)]
pub struct AcronymReport {
    pub total: usize,
    /// Listed entries, at most the requested limit.
    pub entries: Vec<(String, String)>,
    /// Each requested text with its normalized form.
    pub normalized: Vec<(String, String)>,
}
