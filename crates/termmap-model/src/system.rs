//! Coding systems and their term-type conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// RxNorm term types, standard clinical-drug forms first.
pub const RXNORM_TERM_TYPES: [&str; 23] = [
    "SCD", "SBD", "GPCK", "BPCK", "SCDC", "SCDG", "SCDF", "SCDGP", "SBDF", "SBDFP", "SBDC", "SBDG",
    "SCDFP", "MIN", "PIN", "IN", "PSN", "BN", "DF", "DFG", "SY", "TMSY", "ET",
];

/// SNOMED CT term types: preferred term, synonym, fully specified name.
pub const SNOMED_TERM_TYPES: [&str; 3] = ["PT", "SY", "FN"];

/// A controlled vocabulary that codes can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemId {
    #[serde(rename = "SNOMEDCT_US")]
    Snomed,
    #[serde(rename = "RXNORM")]
    RxNorm,
}

impl SystemId {
    pub const ALL: [SystemId; 2] = [SystemId::Snomed, SystemId::RxNorm];

    /// Canonical label used in vocabulary files and outputs.
    pub fn as_str(self) -> &'static str {
        match self {
            SystemId::Snomed => "SNOMEDCT_US",
            SystemId::RxNorm => "RXNORM",
        }
    }

    /// Term types in display priority order, best first.
    pub fn term_type_order(self) -> &'static [&'static str] {
        match self {
            SystemId::Snomed => &SNOMED_TERM_TYPES,
            SystemId::RxNorm => &RXNORM_TERM_TYPES,
        }
    }

    /// Position of `term_type` in the priority order.
    ///
    /// Unknown term types rank after every known one.
    pub fn term_type_rank(self, term_type: &str) -> usize {
        let order = self.term_type_order();
        let key = term_type.trim();
        order
            .iter()
            .position(|tty| tty.eq_ignore_ascii_case(key))
            .unwrap_or(order.len())
    }

    pub fn is_known_term_type(self, term_type: &str) -> bool {
        self.term_type_rank(term_type) < self.term_type_order().len()
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SNOMEDCT_US" | "SNOMEDCT" | "SNOMED" => Ok(SystemId::Snomed),
            "RXNORM" => Ok(SystemId::RxNorm),
            _ => Err(ModelError::UnknownSystem(s.trim().to_string())),
        }
    }
}
