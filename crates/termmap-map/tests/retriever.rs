use std::sync::Arc;

use termmap_map::{Bm25Retriever, Retriever};
use termmap_model::{RetrievalScore, SystemId, Vocabulary, VocabularyRow};
use termmap_normalize::Normalizer;

fn vocabulary() -> Arc<Vocabulary> {
    let row = |code: &str, text: &str, tty: &str| {
        VocabularyRow::new(SystemId::RxNorm, code, text, "clinical drug", tty)
    };
    Arc::new(Vocabulary::new(
        SystemId::RxNorm,
        vec![
            row("R1", "Aspirin 81 MG Oral Tablet", "SCD"),
            row("R2", "aspirin 81 mg oral tablet", "SY"),
            row("R3", "Ibuprofen 200 MG Oral Tablet", "SCD"),
            row("R4", "aspirin", "IN"),
        ],
    ))
}

fn retriever() -> Bm25Retriever {
    Bm25Retriever::new(vocabulary(), &Normalizer::builtin())
}

#[test]
fn identical_normalized_strings_share_a_document() {
    let retriever = retriever();
    assert_eq!(retriever.document_count(), 3);

    let hits = retriever.retrieve("aspirin", 10);
    let codes: Vec<&str> = hits.iter().map(|c| c.row.code.as_str()).collect();
    assert_eq!(codes.len(), 2);
    assert!(codes.contains(&"R1"));
    assert!(codes.contains(&"R4"));
    assert!(!codes.contains(&"R2"));
}

#[test]
fn shorter_documents_score_higher() {
    let hits = retriever().retrieve("aspirin", 10);
    assert_eq!(hits[0].row.code, "R4");
}

#[test]
fn results_are_limited_to_k() {
    let retriever = retriever();
    assert_eq!(retriever.retrieve("oral tablet", 1).len(), 1);
    assert_eq!(retriever.retrieve("oral tablet", 10).len(), 2);
    assert!(retriever.retrieve("oral tablet", 0).is_empty());
}

#[test]
fn unmatched_and_empty_queries_retrieve_nothing() {
    let retriever = retriever();
    assert!(retriever.retrieve("", 5).is_empty());
    assert!(retriever.retrieve("warfarin", 5).is_empty());
}

#[test]
fn candidates_are_unscored_by_default() {
    let hits = retriever().retrieve("aspirin tablet", 5);
    assert!(!hits.is_empty());
    assert!(
        hits.iter()
            .all(|c| c.retrieval_score == RetrievalScore::Unscored)
    );
}

#[test]
fn attached_scores_are_squashed_into_unit_range() {
    let hits = retriever().with_scores(true).retrieve("aspirin tablet", 5);
    assert!(!hits.is_empty());
    for hit in &hits {
        let score = hit.retrieval_score.value().expect("scored candidate");
        assert!(score > 0.0 && score < 1.0, "score {score} out of range");
    }
    let scores: Vec<f64> = hits
        .iter()
        .filter_map(|c| c.retrieval_score.value())
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn empty_vocabulary_retrieves_nothing() {
    let empty = Arc::new(Vocabulary::new(SystemId::Snomed, Vec::new()));
    let retriever = Bm25Retriever::new(empty, &Normalizer::builtin());
    assert_eq!(retriever.system(), SystemId::Snomed);
    assert!(retriever.retrieve("anything", 5).is_empty());
}
