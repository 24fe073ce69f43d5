use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, info_span};

use termmap_ingest::{load_vocabulary_csv, read_queries_csv, write_predictions_csv};
use termmap_map::MappingPipeline;
use termmap_model::{EntityQuery, Prediction, SystemId, Vocabulary};
use termmap_normalize::{AcronymCache, AcronymMap, Normalizer, default_cache_dir};

use termmap_cli::config::{ConfigOverrides, MapperConfig};
use termmap_cli::logging::redact_value;

use crate::cli::{AcronymsArgs, MapArgs, VocabularyArgs};
use crate::types::{AcronymReport, MapResult, QueryExplanation, SystemSummary};

pub fn run_map(args: &MapArgs) -> Result<MapResult> {
    let start = Instant::now();
    let config = resolve_config(
        &args.vocabulary,
        ConfigOverrides {
            top_k: args.k,
            attach_retrieval_scores: args.retrieval_scores,
            ..ConfigOverrides::default()
        },
    )?;

    let vocabularies = load_vocabularies(&args.vocabulary)?;
    let acronyms = acronyms_for(&args.vocabulary, &config, &vocabularies);
    let vocabulary_rows: Vec<(SystemId, usize)> = vocabularies
        .iter()
        .map(|vocabulary| (vocabulary.system(), vocabulary.len()))
        .collect();

    let table = read_queries_csv(&args.input)
        .with_context(|| format!("read queries: {}", args.input.display()))?;
    let pipeline = {
        let _span = info_span!("index").entered();
        MappingPipeline::new(vocabularies, &acronyms, config.pipeline_options())
    };

    let progress = progress_bar(table.len());
    let predictions = {
        let _span = info_span!("map", queries = table.len()).entered();
        pipeline.map_all_with(&table.queries, |query, prediction| {
            debug!(
                query = redact_value(&query.text),
                system = %prediction.system,
                code = %prediction.code,
                "query mapped"
            );
            progress.inc(1);
        })
    };
    progress.finish_and_clear();
    let explanations = explain_queries(&pipeline, &table.queries, args.show_candidates);

    write_predictions_csv(&args.output, table.queries.iter().zip(&predictions))
        .with_context(|| format!("write predictions: {}", args.output.display()))?;

    let systems = summarize(&vocabulary_rows, &predictions);
    info!(
        queries = predictions.len(),
        matched = predictions.iter().filter(|p| p.is_match()).count(),
        "mapping complete"
    );
    Ok(MapResult {
        input: args.input.clone(),
        output: args.output.clone(),
        acronyms: acronyms.len(),
        systems,
        explanations,
        elapsed: start.elapsed(),
    })
}

pub fn run_acronyms(args: &AcronymsArgs) -> Result<AcronymReport> {
    let config = resolve_config(&args.vocabulary, ConfigOverrides::default())?;
    let vocabularies = load_vocabularies(&args.vocabulary)?;
    let acronyms = acronyms_for(&args.vocabulary, &config, &vocabularies);
    let normalizer = Normalizer::new(&acronyms);

    let entries = acronyms
        .iter()
        .take(args.limit)
        .map(|(acronym, expansion)| (acronym.to_string(), expansion.to_string()))
        .collect();
    let normalized = args
        .texts
        .iter()
        .map(|text| (text.clone(), normalizer.normalize(text)))
        .collect();
    Ok(AcronymReport {
        total: acronyms.len(),
        entries,
        normalized,
    })
}

fn resolve_config(args: &VocabularyArgs, overrides: ConfigOverrides) -> Result<MapperConfig> {
    let overrides = ConfigOverrides {
        min_support: args.min_support,
        acronym_cap: args.acronym_cap,
        ..overrides
    };
    let config = MapperConfig::resolve(args.config.as_deref(), overrides)?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn load_vocabularies(args: &VocabularyArgs) -> Result<Vec<Vocabulary>> {
    let _span = info_span!("load_vocabularies").entered();
    let snomed = load_vocabulary_csv(&args.snomed, SystemId::Snomed)
        .with_context(|| format!("load SNOMED CT vocabulary: {}", args.snomed.display()))?;
    let rxnorm = load_vocabulary_csv(&args.rxnorm, SystemId::RxNorm)
        .with_context(|| format!("load RxNorm vocabulary: {}", args.rxnorm.display()))?;
    Ok(vec![snomed, rxnorm])
}

/// Acronyms learned over every loaded vocabulary, through the cache unless
/// it is disabled.
fn acronyms_for(args: &VocabularyArgs, config: &MapperConfig, vocabularies: &[Vocabulary]) -> AcronymMap {
    let _span = info_span!("acronyms").entered();
    let learner = config.learner();
    let rows = vocabularies.iter().flat_map(Vocabulary::rows);
    if args.no_cache {
        return learner.learn(rows.map(|row| row.text.as_str()));
    }
    let dir = args.cache_dir.clone().unwrap_or_else(default_cache_dir);
    AcronymCache::new(dir).load_or_build(rows, &learner)
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map(|style| style.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
}

/// The best `limit` candidates of every query, in input order.
fn explain_queries(pipeline: &MappingPipeline, queries: &[EntityQuery], limit: usize) -> Vec<QueryExplanation> {
    if limit == 0 {
        return Vec::new();
    }
    let _span = info_span!("explain", limit).entered();
    queries
        .iter()
        .map(|query| QueryExplanation {
            query: redact_value(&query.text).to_string(),
            entity_type: query.entity_type.clone(),
            system: query.system(),
            candidates: pipeline.explain_query(query, limit),
        })
        .collect()
}

/// Query and match counts per system, in `SystemId` order.
pub fn summarize(vocabulary_rows: &[(SystemId, usize)], predictions: &[Prediction]) -> Vec<SystemSummary> {
    SystemId::ALL
        .iter()
        .map(|&system| {
            let routed = predictions.iter().filter(|p| p.system == system);
            SystemSummary {
                system,
                vocabulary_rows: vocabulary_rows
                    .iter()
                    .find(|(s, _)| *s == system)
                    .map_or(0, |(_, rows)| *rows),
                queries: routed.clone().count(),
                matched: routed.filter(|p| p.is_match()).count(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use termmap_cli::logging::REDACTED_VALUE;
    use termmap_map::PipelineOptions;
    use termmap_model::VocabularyRow;

    use super::*;

    fn imaging_pipeline() -> MappingPipeline {
        let row = |code: &str, text: &str, tty: &str| {
            VocabularyRow::new(SystemId::Snomed, code, text, "diagnostic procedure", tty)
        };
        let snomed = Vocabulary::new(
            SystemId::Snomed,
            vec![
                row("C1", "Magnetic resonance imaging of pelvis", "PT"),
                row("C2", "Magnetic resonance imaging of head", "PT"),
                row("C3", "Computed tomography of chest", "PT"),
            ],
        );
        MappingPipeline::new(vec![snomed], &AcronymMap::new(), PipelineOptions::default())
    }

    #[test]
    fn candidates_are_explained_with_redacted_queries() {
        let queries = vec![
            EntityQuery::new("MRI pelvis", "Procedure"),
            EntityQuery::new("zzzz", "Procedure"),
        ];
        let explanations = explain_queries(&imaging_pipeline(), &queries, 2);

        assert_eq!(explanations.len(), 2);
        let first = &explanations[0];
        assert_eq!(first.query, REDACTED_VALUE);
        assert_eq!(first.entity_type, "Procedure");
        assert_eq!(first.system, SystemId::Snomed);
        assert!(!first.candidates.is_empty() && first.candidates.len() <= 2);
        assert_eq!(first.candidates[0].candidate.row.code, "C1");
        assert!(!first.candidates[0].score.explain().is_empty());
        assert!(explanations[1].candidates.is_empty());
    }

    #[test]
    fn no_candidates_are_explained_by_default() {
        let queries = vec![EntityQuery::new("MRI pelvis", "Procedure")];
        assert!(explain_queries(&imaging_pipeline(), &queries, 0).is_empty());
    }

    #[test]
    fn summary_counts_queries_per_system() {
        let predictions = vec![
            Prediction {
                system: SystemId::Snomed,
                code: "C1".to_string(),
                description: "x".to_string(),
            },
            Prediction::unmatched(SystemId::Snomed),
            Prediction::unmatched(SystemId::RxNorm),
        ];
        let summary = summarize(&[(SystemId::Snomed, 10), (SystemId::RxNorm, 4)], &predictions);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].system, SystemId::Snomed);
        assert_eq!((summary[0].queries, summary[0].matched), (2, 1));
        assert_eq!(summary[0].unmatched(), 1);
        assert_eq!(summary[0].vocabulary_rows, 10);
        assert_eq!((summary[1].queries, summary[1].matched), (1, 0));
    }
}
