use termmap_model::{EntityQuery, EntityType, SystemId, Vocabulary, VocabularyRow};

fn row(code: &str, text: &str, sty: &str, tty: &str) -> VocabularyRow {
    VocabularyRow::new(SystemId::Snomed, code, text, sty, tty)
}

#[test]
fn entity_types_route_to_systems() {
    assert_eq!(EntityType::parse(" Medicine ").system(), SystemId::RxNorm);
    assert_eq!(EntityType::parse("Diagnosis").system(), SystemId::Snomed);
    assert_eq!(EntityType::parse("Lab").system(), SystemId::Snomed);
    assert_eq!(EntityType::parse("RandomText").system(), SystemId::Snomed);
    assert_eq!(
        EntityType::parse("  RandomText"),
        EntityType::Other("randomtext".to_string())
    );
}

#[test]
fn gating_admits_missing_semantic_types() {
    let procedure = EntityType::Procedure;
    assert!(procedure.admits("Diagnostic Procedure"));
    assert!(procedure.admits(""));
    assert!(!procedure.admits("disease or syndrome"));
    assert!(EntityType::Medicine.admits("anything"));

    assert!(procedure.lists("diagnostic procedure"));
    assert!(!procedure.lists(""));
    assert!(!EntityType::Medicine.lists("clinical drug"));
}

#[test]
fn vocabulary_indexes_rows_by_code_in_load_order() {
    let vocabulary = Vocabulary::new(
        SystemId::Snomed,
        vec![
            row("C1", "Magnetic resonance imaging of pelvis", "diagnostic procedure", "FN"),
            row("C2", "MRI of head", "diagnostic procedure", "PT"),
            row("C1", "MRI pelvis", "diagnostic procedure", "PT"),
        ],
    );

    assert_eq!(vocabulary.len(), 3);
    assert_eq!(vocabulary.code_count(), 2);
    let texts: Vec<&str> = vocabulary
        .rows_for_code("C1")
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Magnetic resonance imaging of pelvis", "MRI pelvis"]);
    assert_eq!(vocabulary.rows_for_code("C9").count(), 0);
}

#[test]
fn vocabulary_retags_rows_with_its_system() {
    let vocabulary = Vocabulary::new(
        SystemId::RxNorm,
        vec![row("1191", "aspirin", "", "IN")],
    );
    assert_eq!(vocabulary.rows()[0].system, SystemId::RxNorm);
}

#[test]
fn query_routes_through_entity_type() {
    let query = EntityQuery::new("aspirin 81 mg tablet", "MEDICINE");
    assert_eq!(query.entity(), EntityType::Medicine);
    assert_eq!(query.system(), SystemId::RxNorm);
}
