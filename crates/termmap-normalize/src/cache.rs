//! Disk cache for learned acronym maps.
//!
//! The map is stored as pretty JSON next to a fingerprint of the corpus it
//! was learned from. A stored map is only reused while the fingerprint still
//! matches, so a vocabulary update triggers a rebuild on the next run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use termmap_model::VocabularyRow;
use tracing::{info, warn};

use crate::acronyms::{AcronymLearner, AcronymMap};
use crate::error::CacheError;
use crate::hash::corpus_fingerprint;

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV_VAR: &str = "TERMMAP_CACHE_DIR";

const CACHE_FILE_NAME: &str = "acronym_map.json";

/// Cached map with the metadata needed to decide whether it is stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAcronymMap {
    pub fingerprint: String,
    pub min_support: usize,
    pub cap: usize,
    pub row_count: usize,
    /// RFC 3339 build timestamp.
    pub built_at: String,
    pub acronyms: AcronymMap,
}

/// Directory-backed acronym cache.
#[derive(Debug, Clone)]
pub struct AcronymCache {
    dir: PathBuf,
}

/// Default cache directory: `TERMMAP_CACHE_DIR`, else `data/.cache`.
pub fn default_cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CACHE_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }
    PathBuf::from("data").join(".cache")
}

impl AcronymCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE_NAME)
    }

    /// Reads the stored map, `None` when no cache file exists.
    pub fn load(&self) -> Result<Option<StoredAcronymMap>, CacheError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|e| CacheError::io(&path, e))?;
        let stored = serde_json::from_str(&contents).map_err(|e| CacheError::Json {
            path: path.clone(),
            source: e,
        })?;
        Ok(Some(stored))
    }

    pub fn save(&self, stored: &StoredAcronymMap) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;
        let path = self.path();
        let json = serde_json::to_string_pretty(stored).map_err(|e| CacheError::Json {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| CacheError::io(&path, e))?;
        Ok(path)
    }

    /// Returns the cached map for this corpus, learning and storing it when
    /// the cache is missing, unreadable or stale.
    ///
    /// Rows may span several vocabularies; they are walked twice, once to
    /// fingerprint and once to learn. Cache write failures are logged and do
    /// not prevent returning the map.
    pub fn load_or_build<'a, I>(&self, rows: I, learner: &AcronymLearner) -> AcronymMap
    where
        I: IntoIterator<Item = &'a VocabularyRow>,
        I::IntoIter: Clone,
    {
        let rows = rows.into_iter();
        let fingerprint = corpus_fingerprint(
            rows.clone().map(|row| row.text.as_str()),
            learner.min_support,
            learner.cap,
        );

        match self.load() {
            Ok(Some(stored)) if stored.fingerprint == fingerprint => {
                info!(
                    path = %self.path().display(),
                    acronyms = stored.acronyms.len(),
                    "acronym cache hit"
                );
                return stored.acronyms;
            }
            Ok(Some(_)) => {
                info!(path = %self.path().display(), "acronym cache stale, rebuilding");
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "acronym cache unreadable, rebuilding");
            }
        }

        let row_count = rows.clone().count();
        let acronyms = learner.learn(rows.map(|row| row.text.as_str()));
        let stored = StoredAcronymMap {
            fingerprint,
            min_support: learner.min_support,
            cap: learner.cap,
            row_count,
            built_at: chrono::Utc::now().to_rfc3339(),
            acronyms,
        };
        match self.save(&stored) {
            Ok(path) => info!(
                path = %path.display(),
                acronyms = stored.acronyms.len(),
                "acronym cache written"
            ),
            Err(error) => warn!(%error, "could not save acronym cache"),
        }
        stored.acronyms
    }
}
