//! Canonical display selection for ranked codes.
//!
//! Retrieval may surface any synonym of a code. After ranking, each code is
//! shown with its best row from the full vocabulary: term-type priority
//! first, shortest display string second, earliest row last. Ordering and
//! scores are left untouched.

use std::collections::BTreeSet;

use termmap_model::{EntityType, RankedCandidate, SystemId, Vocabulary, VocabularyRow};
use tracing::debug;

/// Term-type tier weight; larger than any display length so tiers never mix.
const TERM_TYPE_TIER: usize = 1_000_000;

fn display_score(system: SystemId, row: &VocabularyRow) -> usize {
    system.term_type_rank(&row.term_type) * TERM_TYPE_TIER + row.text_len()
}

fn pick_best<'a>(
    system: SystemId,
    rows: impl Iterator<Item = &'a VocabularyRow>,
) -> Option<&'a VocabularyRow> {
    let mut best: Option<(usize, &'a VocabularyRow)> = None;
    for row in rows {
        let score = display_score(system, row);
        if best.is_none_or(|(current, _)| score < current) {
            best = Some((score, row));
        }
    }
    best.map(|(_, row)| row)
}

/// Best display row for `code`, if the vocabulary has one.
///
/// For SNOMED, rows whose semantic type is on the entity type's allowlist are
/// preferred; when none are, every row of the code is eligible.
pub fn best_display_row<'a>(
    system: SystemId,
    vocabulary: &'a Vocabulary,
    code: &str,
    entity: &EntityType,
) -> Option<&'a VocabularyRow> {
    if system == SystemId::Snomed && entity.allowed_semantic_types().is_some() {
        let gated = pick_best(
            system,
            vocabulary
                .rows_for_code(code)
                .filter(|row| entity.lists(&row.semantic_type)),
        );
        if gated.is_some() {
            return gated;
        }
    }
    pick_best(system, vocabulary.rows_for_code(code))
}

/// Rewrites each candidate's display string and term type to its code's best
/// row, keeping the first (best-ranked) candidate per code.
///
/// Codes missing from `vocabulary` keep their original display.
pub fn select_display(
    system: SystemId,
    ranked: Vec<RankedCandidate>,
    vocabulary: &Vocabulary,
    entity: &EntityType,
) -> Vec<RankedCandidate> {
    if ranked.is_empty() {
        return ranked;
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(ranked.len());
    let mut collapsed = 0usize;

    for mut candidate in ranked {
        if !seen.insert(candidate.row.code.clone()) {
            collapsed += 1;
            continue;
        }
        if let Some(best) = best_display_row(system, vocabulary, &candidate.row.code, entity) {
            candidate.row.text.clone_from(&best.text);
            candidate.row.term_type.clone_from(&best.term_type);
        }
        out.push(candidate);
    }

    if collapsed > 0 {
        debug!(%system, collapsed, "merged candidates sharing a code");
    }
    out
}
