//! Tunable constants of the ranking model.

use serde::{Deserialize, Serialize};
use termmap_model::SystemId;

/// Linear term-type bonus: `max - step * rank`, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermTypeBonus {
    pub max: f64,
    pub step: f64,
}

impl TermTypeBonus {
    pub fn for_rank(&self, rank: usize) -> f64 {
        (self.max - self.step * rank as f64).max(0.0)
    }
}

/// Bonuses and penalties applied on top of lexical similarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringParams {
    /// Added when either normalized string is a prefix of the other.
    pub prefix_bonus: f64,
    /// Subtracted when the query names a site the candidate lacks.
    pub site_miss_penalty: f64,
    /// Added per overlapping site token.
    pub site_overlap_bonus: f64,
    /// Overlapping site tokens beyond this count earn nothing.
    pub site_overlap_cap: usize,
    /// Subtracted from contrast variants the query did not ask for.
    pub contrast_penalty: f64,
    /// RxNorm: wide enough to separate standard from non-standard forms.
    pub rxnorm_term_type: TermTypeBonus,
    /// SNOMED: a last-resort tie-break only.
    pub snomed_term_type: TermTypeBonus,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            prefix_bonus: 0.12,
            site_miss_penalty: 1.0,
            site_overlap_bonus: 0.12,
            site_overlap_cap: 2,
            contrast_penalty: 0.10,
            rxnorm_term_type: TermTypeBonus {
                max: 0.30,
                step: 0.04,
            },
            snomed_term_type: TermTypeBonus {
                max: 0.02,
                step: 0.01,
            },
        }
    }
}

impl ScoringParams {
    pub fn term_type_bonus(&self, system: SystemId) -> TermTypeBonus {
        match system {
            SystemId::RxNorm => self.rxnorm_term_type,
            SystemId::Snomed => self.snomed_term_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_decreases_and_floors_at_zero() {
        let params = ScoringParams::default();
        let rx = params.term_type_bonus(SystemId::RxNorm);
        assert!((rx.for_rank(0) - 0.30).abs() < 1e-9);
        assert!((rx.for_rank(1) - 0.26).abs() < 1e-9);
        assert!(rx.for_rank(7) > 0.0);
        assert_eq!(rx.for_rank(8), 0.0);
        assert_eq!(rx.for_rank(23), 0.0);

        let sn = params.term_type_bonus(SystemId::Snomed);
        assert!((sn.for_rank(0) - 0.02).abs() < 1e-9);
        assert!((sn.for_rank(1) - 0.01).abs() < 1e-9);
        assert_eq!(sn.for_rank(2), 0.0);
        assert_eq!(sn.for_rank(3), 0.0);
    }

    #[test]
    fn partial_params_fill_defaults() {
        let params: ScoringParams =
            serde_json::from_str(r#"{"contrast_penalty": 0.2}"#).expect("parse params");
        assert_eq!(params.contrast_penalty, 0.2);
        assert_eq!(params.site_overlap_cap, 2);
    }
}
