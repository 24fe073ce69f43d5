//! Entity queries from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use termmap_model::EntityQuery;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::header::{cell, find_column, normalize_header};

/// Text column names in preference order; the first column is the fallback.
pub const TEXT_COLUMN_CANDIDATES: [&str; 2] = ["Input Entity Description", "Entity Description"];

pub const ENTITY_TYPE_COLUMN: &str = "Entity Type";

/// Queries in file order, with the columns they were read from.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTable {
    pub text_column: String,
    pub type_column: Option<String>,
    pub queries: Vec<EntityQuery>,
}

impl QueryTable {
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

pub fn read_queries_csv(path: &Path) -> Result<QueryTable, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    read_queries(file, path)
}

/// Reads queries from `reader`. Rows with empty cells are kept so output rows
/// line up with data rows; fully blank lines are skipped.
pub fn read_queries<R: Read>(reader: R, origin: &Path) -> Result<QueryTable, IngestError> {
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

    let text_idx = TEXT_COLUMN_CANDIDATES
        .iter()
        .find_map(|name| find_column(&headers, name))
        .or_else(|| (!headers.is_empty()).then_some(0))
        .ok_or_else(|| IngestError::MissingColumns {
            path: origin.to_path_buf(),
            columns: vec![TEXT_COLUMN_CANDIDATES[0].to_string()],
        })?;
    let type_idx = find_column(&headers, ENTITY_TYPE_COLUMN);
    debug!(
        text_column = %headers[text_idx],
        type_column = ?type_idx.map(|i| &headers[i]),
        "query columns resolved"
    );

    let mut queries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(origin, e))?;
        let text = cell(&record, text_idx);
        let entity_type = type_idx.map(|i| cell(&record, i)).unwrap_or_default();
        queries.push(EntityQuery::new(text, entity_type));
    }
    info!(path = %origin.display(), queries = queries.len(), "queries loaded");

    Ok(QueryTable {
        text_column: headers[text_idx].clone(),
        type_column: type_idx.map(|i| headers[i].clone()),
        queries,
    })
}
