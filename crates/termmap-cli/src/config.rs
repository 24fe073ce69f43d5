//! Mapper settings from a TOML file, overridable on the command line.
//!
//! ```toml
//! top_k = 40
//! min_support = 4
//!
//! [scoring]
//! site_miss_penalty = 0.8
//!
//! [scoring.rxnorm_term_type]
//! max = 0.25
//! step = 0.05
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use termmap_map::{DEFAULT_TOP_K, PipelineOptions, ScoringParams};
use termmap_normalize::AcronymLearner;
use termmap_normalize::acronyms::{DEFAULT_CAP, DEFAULT_MIN_SUPPORT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Candidates retrieved per query.
    pub top_k: usize,
    pub attach_retrieval_scores: bool,
    /// Minimum sources proposing an acronym before it is learned.
    pub min_support: usize,
    /// Maximum number of learned acronyms.
    pub acronym_cap: usize,
    pub scoring: ScoringParams,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            attach_retrieval_scores: false,
            min_support: DEFAULT_MIN_SUPPORT,
            acronym_cap: DEFAULT_CAP,
            scoring: ScoringParams::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub top_k: Option<usize>,
    /// Only ever switches retrieval scores on.
    pub attach_retrieval_scores: bool,
    pub min_support: Option<usize>,
    pub acronym_cap: Option<usize>,
}

impl MapperConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parse config: {}", path.display()))
    }

    /// File settings (or defaults when `path` is `None`) with `overrides`
    /// applied on top.
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }
        if overrides.attach_retrieval_scores {
            self.attach_retrieval_scores = true;
        }
        if let Some(min_support) = overrides.min_support {
            self.min_support = min_support;
        }
        if let Some(cap) = overrides.acronym_cap {
            self.acronym_cap = cap;
        }
        self
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            top_k: self.top_k,
            attach_retrieval_scores: self.attach_retrieval_scores,
            scoring: self.scoring,
        }
    }

    pub fn learner(&self) -> AcronymLearner {
        AcronymLearner::new(self.min_support, self.acronym_cap)
    }
}
