#![deny(unsafe_code)]

pub mod acronyms;
pub mod cache;
pub mod error;
pub mod hash;
pub mod normalize;

pub use crate::acronyms::{AcronymLearner, AcronymMap, learn_acronyms, make_acronym};
pub use crate::cache::{AcronymCache, CACHE_DIR_ENV_VAR, StoredAcronymMap, default_cache_dir};
pub use crate::error::CacheError;
pub use crate::normalize::{Normalizer, STOP_WORDS, normalize_minimal, normalize_text};
