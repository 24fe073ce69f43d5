use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::system::SystemId;

/// A free-text description to be mapped, with its caller-supplied category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityQuery {
    pub text: String,
    pub entity_type: String,
}

impl EntityQuery {
    pub fn new(text: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_type: entity_type.into(),
        }
    }

    pub fn entity(&self) -> EntityType {
        EntityType::parse(&self.entity_type)
    }

    /// Coding system this query routes to.
    pub fn system(&self) -> SystemId {
        self.entity().system()
    }
}

/// Top-1 mapping result for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub system: SystemId,
    pub code: String,
    pub description: String,
}

impl Prediction {
    /// Result for a query that produced no candidates.
    pub fn unmatched(system: SystemId) -> Self {
        Self {
            system,
            code: String::new(),
            description: String::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        !self.code.is_empty()
    }
}
