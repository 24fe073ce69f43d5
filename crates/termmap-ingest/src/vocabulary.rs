//! Vocabulary partitions from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use termmap_model::{SystemId, Vocabulary, VocabularyRow};
use tracing::{info, warn};

use crate::error::IngestError;
use crate::header::{cell, find_column, normalize_header};

/// Required vocabulary headers, matched case-insensitively.
pub const VOCABULARY_COLUMNS: [&str; 4] = ["CODE", "STR", "STY", "TTY"];

/// Loads one system's vocabulary. A `System` column, if present, is ignored.
pub fn load_vocabulary_csv(path: &Path, system: SystemId) -> Result<Vocabulary, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    read_vocabulary(file, path, system)
}

/// Reads vocabulary rows from `reader`; `origin` names the source in errors.
///
/// Rows without a code are skipped.
pub fn read_vocabulary<R: Read>(
    reader: R,
    origin: &Path,
    system: SystemId,
) -> Result<Vocabulary, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::csv(origin, e))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut positions = [0usize; 4];
    let mut missing = Vec::new();
    for (slot, name) in positions.iter_mut().zip(VOCABULARY_COLUMNS) {
        match find_column(&headers, name) {
            Some(index) => *slot = index,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            path: origin.to_path_buf(),
            columns: missing,
        });
    }
    let [code_idx, str_idx, sty_idx, tty_idx] = positions;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(origin, e))?;
        let code = cell(&record, code_idx);
        if code.is_empty() {
            skipped += 1;
            continue;
        }
        rows.push(VocabularyRow::new(
            system,
            code,
            cell(&record, str_idx),
            cell(&record, sty_idx),
            cell(&record, tty_idx),
        ));
    }

    if skipped > 0 {
        warn!(path = %origin.display(), skipped, "skipped vocabulary rows without a code");
    }
    let vocabulary = Vocabulary::new(system, rows);
    info!(
        %system,
        path = %origin.display(),
        rows = vocabulary.len(),
        codes = vocabulary.code_count(),
        "vocabulary loaded"
    );
    Ok(vocabulary)
}
