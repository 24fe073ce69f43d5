//! Entity types supplied by callers alongside query text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::system::SystemId;

const DIAGNOSIS_SEMANTIC_TYPES: &[&str] = &[
    "disease or syndrome",
    "mental or behavioral dysfunction",
    "neoplastic process",
    "anatomical abnormality",
    "acquired abnormality",
    "finding",
    "sign or symptom",
    "pathologic function",
    "injury or poisoning",
    "congenital abnormality",
    "cell or molecular dysfunction",
];

const PROCEDURE_SEMANTIC_TYPES: &[&str] = &[
    "therapeutic or preventive procedure",
    "diagnostic procedure",
    "laboratory procedure",
    "health care activity",
    "drug delivery device",
    "medical device",
    "clinical drug",
];

const LAB_SEMANTIC_TYPES: &[&str] = &[
    "laboratory or test result",
    "laboratory procedure",
    "diagnostic procedure",
    "clinical attribute",
    "quantitative concept",
    "indicator, reagent, or diagnostic aid",
    "chemical viewed functionally",
    "chemical viewed structurally",
    "body substance",
];

/// Free-text entity category, matched case- and whitespace-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Diagnosis,
    Procedure,
    Lab,
    Medicine,
    /// Anything else, kept in its normalized (trimmed, lowercase) form.
    Other(String),
}

impl EntityType {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_lowercase();
        match key.as_str() {
            "diagnosis" => EntityType::Diagnosis,
            "procedure" => EntityType::Procedure,
            "lab" => EntityType::Lab,
            "medicine" => EntityType::Medicine,
            _ => EntityType::Other(key),
        }
    }

    /// Coding system a query of this type is mapped into.
    pub fn system(&self) -> SystemId {
        match self {
            EntityType::Medicine => SystemId::RxNorm,
            _ => SystemId::Snomed,
        }
    }

    /// Semantic types considered plausible for this entity type.
    ///
    /// `None` means candidates are not gated at all.
    pub fn allowed_semantic_types(&self) -> Option<&'static [&'static str]> {
        match self {
            EntityType::Diagnosis => Some(DIAGNOSIS_SEMANTIC_TYPES),
            EntityType::Procedure => Some(PROCEDURE_SEMANTIC_TYPES),
            EntityType::Lab => Some(LAB_SEMANTIC_TYPES),
            EntityType::Medicine | EntityType::Other(_) => None,
        }
    }

    /// Whether a row with `semantic_type` passes the ranking gate.
    ///
    /// Ungated entity types and rows without a semantic type always pass.
    pub fn admits(&self, semantic_type: &str) -> bool {
        let Some(allowed) = self.allowed_semantic_types() else {
            return true;
        };
        let key = semantic_type.trim().to_lowercase();
        key.is_empty() || allowed.contains(&key.as_str())
    }

    /// Strict allowlist membership, used when choosing display rows.
    pub fn lists(&self, semantic_type: &str) -> bool {
        let key = semantic_type.trim().to_lowercase();
        self.allowed_semantic_types()
            .is_some_and(|allowed| allowed.contains(&key.as_str()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Diagnosis => "diagnosis",
            EntityType::Procedure => "procedure",
            EntityType::Lab => "lab",
            EntityType::Medicine => "medicine",
            EntityType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EntityType {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
