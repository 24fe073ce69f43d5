use termmap_map::select_display;
use termmap_model::{
    EntityType, RankedCandidate, RetrievalScore, SystemId, Vocabulary, VocabularyRow,
};

fn ranked(system: SystemId, code: &str, text: &str, tty: &str, score: f64) -> RankedCandidate {
    RankedCandidate {
        row: VocabularyRow::new(system, code, text, "", tty),
        retrieval_score: RetrievalScore::Unscored,
        final_score: score,
    }
}

fn snomed_vocabulary() -> Vocabulary {
    Vocabulary::new(
        SystemId::Snomed,
        vec![
            VocabularyRow::new(
                SystemId::Snomed,
                "C1",
                "Magnetic resonance imaging of pelvis (procedure)",
                "diagnostic procedure",
                "FN",
            ),
            VocabularyRow::new(SystemId::Snomed, "C1", "MRI of pelvis", "diagnostic procedure", "SY"),
            VocabularyRow::new(
                SystemId::Snomed,
                "C1",
                "Magnetic resonance imaging of pelvis",
                "diagnostic procedure",
                "PT",
            ),
            VocabularyRow::new(SystemId::Snomed, "C2", "Pelvis", "body part", "PT"),
            VocabularyRow::new(SystemId::Snomed, "C2", "Pelvic structure", "diagnostic procedure", "SY"),
        ],
    )
}

#[test]
fn term_type_dominates_length() {
    let out = select_display(
        SystemId::Snomed,
        vec![ranked(SystemId::Snomed, "C1", "MRI of pelvis", "SY", 0.9)],
        &snomed_vocabulary(),
        &EntityType::Procedure,
    );
    assert_eq!(out[0].row.text, "Magnetic resonance imaging of pelvis");
    assert_eq!(out[0].row.term_type, "PT");
    assert_eq!(out[0].final_score, 0.9);
}

#[test]
fn snomed_prefers_allowlisted_rows_per_code() {
    let out = select_display(
        SystemId::Snomed,
        vec![ranked(SystemId::Snomed, "C2", "Pelvis", "PT", 0.5)],
        &snomed_vocabulary(),
        &EntityType::Procedure,
    );
    assert_eq!(out[0].row.text, "Pelvic structure");
    assert_eq!(out[0].row.term_type, "SY");
}

#[test]
fn gated_display_falls_back_to_all_rows() {
    let out = select_display(
        SystemId::Snomed,
        vec![ranked(SystemId::Snomed, "C2", "Pelvic structure", "SY", 0.5)],
        &snomed_vocabulary(),
        &EntityType::Diagnosis,
    );
    assert_eq!(out[0].row.text, "Pelvis");
}

#[test]
fn order_and_scores_are_preserved() {
    let input = vec![
        ranked(SystemId::Snomed, "C2", "Pelvis", "PT", 0.7),
        ranked(SystemId::Snomed, "C1", "MRI of pelvis", "SY", 0.3),
    ];
    let out = select_display(
        SystemId::Snomed,
        input,
        &snomed_vocabulary(),
        &EntityType::Other("imaging".into()),
    );
    let summary: Vec<(&str, f64)> = out
        .iter()
        .map(|c| (c.row.code.as_str(), c.final_score))
        .collect();
    assert_eq!(summary, vec![("C2", 0.7), ("C1", 0.3)]);
}

#[test]
fn duplicate_codes_collapse_to_first() {
    let out = select_display(
        SystemId::Snomed,
        vec![
            ranked(SystemId::Snomed, "C1", "MRI of pelvis", "SY", 0.9),
            ranked(SystemId::Snomed, "C2", "Pelvis", "PT", 0.8),
            ranked(SystemId::Snomed, "C1", "Magnetic resonance imaging of pelvis", "PT", 0.4),
        ],
        &snomed_vocabulary(),
        &EntityType::Procedure,
    );
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].row.code, "C1");
    assert_eq!(out[0].final_score, 0.9);
    assert_eq!(out[1].row.code, "C2");
}

#[test]
fn unknown_codes_keep_their_display() {
    let out = select_display(
        SystemId::Snomed,
        vec![ranked(SystemId::Snomed, "C404", "Something else", "SY", 0.1)],
        &snomed_vocabulary(),
        &EntityType::Procedure,
    );
    assert_eq!(out[0].row.text, "Something else");
    assert_eq!(out[0].row.term_type, "SY");
}

#[test]
fn rxnorm_uses_its_own_priority_list() {
    let vocabulary = Vocabulary::new(
        SystemId::RxNorm,
        vec![
            VocabularyRow::new(SystemId::RxNorm, "243670", "Aspirin 81 MG Oral Tablet", "clinical drug", "PSN"),
            VocabularyRow::new(SystemId::RxNorm, "243670", "aspirin 81 MG Oral Tablet", "clinical drug", "SCD"),
            VocabularyRow::new(SystemId::RxNorm, "243670", "ASA 81mg tab", "clinical drug", "SY"),
        ],
    );
    let out = select_display(
        SystemId::RxNorm,
        vec![ranked(SystemId::RxNorm, "243670", "ASA 81mg tab", "SY", 1.0)],
        &vocabulary,
        &EntityType::Medicine,
    );
    assert_eq!(out[0].row.text, "aspirin 81 MG Oral Tablet");
    assert!(SystemId::RxNorm.is_known_term_type(&out[0].row.term_type));
}

#[test]
fn equal_scores_pick_the_earliest_row() {
    let vocabulary = Vocabulary::new(
        SystemId::RxNorm,
        vec![
            VocabularyRow::new(SystemId::RxNorm, "1", "abc", "", "IN"),
            VocabularyRow::new(SystemId::RxNorm, "1", "xyz", "", "IN"),
        ],
    );
    let out = select_display(
        SystemId::RxNorm,
        vec![ranked(SystemId::RxNorm, "1", "xyz", "IN", 1.0)],
        &vocabulary,
        &EntityType::Medicine,
    );
    assert_eq!(out[0].row.text, "abc");
}

#[test]
fn empty_input_is_returned_unchanged() {
    let out = select_display(
        SystemId::Snomed,
        Vec::new(),
        &snomed_vocabulary(),
        &EntityType::Procedure,
    );
    assert!(out.is_empty());
}
