pub mod candidate;
pub mod entity;
pub mod error;
pub mod query;
pub mod system;
pub mod vocabulary;

pub use candidate::{Candidate, RankedCandidate, RetrievalScore};
pub use entity::EntityType;
pub use error::{ModelError, Result};
pub use query::{EntityQuery, Prediction};
pub use system::{RXNORM_TERM_TYPES, SNOMED_TERM_TYPES, SystemId};
pub use vocabulary::{Vocabulary, VocabularyRow};
