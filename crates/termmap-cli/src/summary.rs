use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use termmap_map::ExplainedCandidate;

use crate::types::{AcronymReport, MapResult};

pub fn print_map_summary(result: &MapResult) {
    for explanation in &result.explanations {
        println!(
            "Query: {} [{}] -> {}",
            explanation.query, explanation.entity_type, explanation.system
        );
        if explanation.candidates.is_empty() {
            println!("  no candidates");
        } else {
            println!("{}", candidate_table(&explanation.candidates));
        }
    }
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    println!("Acronyms: {}", result.acronyms);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("System"),
        header_cell("Vocabulary rows"),
        header_cell("Queries"),
        header_cell("Matched"),
        header_cell("Unmatched"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_queries = 0usize;
    let mut total_matched = 0usize;
    for summary in &result.systems {
        total_queries += summary.queries;
        total_matched += summary.matched;
        table.add_row(vec![
            Cell::new(summary.system.as_str()).add_attribute(Attribute::Bold),
            Cell::new(summary.vocabulary_rows),
            Cell::new(summary.queries),
            count_cell(summary.matched, Color::Green),
            count_cell(summary.unmatched(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_queries).add_attribute(Attribute::Bold),
        count_cell(total_matched, Color::Green).add_attribute(Attribute::Bold),
        count_cell(total_queries - total_matched, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Elapsed: {:.1}s", result.elapsed.as_secs_f64());
}

pub fn print_acronym_report(report: &AcronymReport) {
    println!(
        "Learned acronyms: {} (showing {})",
        report.total,
        report.entries.len()
    );
    if !report.entries.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Acronym"), header_cell("Expansion")]);
        apply_table_style(&mut table);
        for (acronym, expansion) in &report.entries {
            table.add_row(vec![
                Cell::new(acronym).add_attribute(Attribute::Bold),
                Cell::new(expansion),
            ]);
        }
        println!("{table}");
    }
    if !report.normalized.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Text"), header_cell("Normalized")]);
        apply_table_style(&mut table);
        for (text, normalized) in &report.normalized {
            table.add_row(vec![Cell::new(text), Cell::new(normalized)]);
        }
        println!("{table}");
    }
}

fn candidate_table(candidates: &[ExplainedCandidate]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("TTY"),
        header_cell("Code"),
        header_cell("Description"),
        header_cell("Score"),
        header_cell("Explanation"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for explained in candidates {
        let row = &explained.candidate.row;
        table.add_row(vec![
            dim_cell(&row.term_type),
            Cell::new(&row.code).add_attribute(Attribute::Bold),
            Cell::new(&row.text),
            Cell::new(format!("{:.3}", explained.candidate.final_score)),
            Cell::new(explained.score.explain()),
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use termmap_map::{CandidateScore, ScoreComponent};
    use termmap_model::{Candidate, RankedCandidate, SystemId, VocabularyRow};

    use super::*;

    #[test]
    fn candidate_table_lists_breakdowns() {
        let row = VocabularyRow::new(
            SystemId::Snomed,
            "C1",
            "Magnetic resonance imaging of pelvis",
            "diagnostic procedure",
            "PT",
        );
        let explained = ExplainedCandidate {
            candidate: RankedCandidate::new(Candidate::scored(row, 0.0), 1.25),
            matched_text: "MRI of pelvis".to_string(),
            score: CandidateScore {
                base: 0.75,
                term_type_bonus: 0.5,
                final_score: 1.25,
                components: vec![ScoreComponent {
                    name: "Site match",
                    value: 0.25,
                    description: "pelvis".to_string(),
                }],
            },
        };
        let rendered = candidate_table(&[explained]).to_string();
        assert!(rendered.contains("C1"));
        assert!(rendered.contains("1.250"));
        assert!(rendered.contains("Site match: +0.250"));
    }
}
