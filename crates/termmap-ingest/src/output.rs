//! Prediction CSV output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use termmap_model::{EntityQuery, Prediction};
use tracing::info;

use crate::error::IngestError;

pub const OUTPUT_COLUMNS: [&str; 5] = [
    "Input Entity Description",
    "Entity Type",
    "Output Coding System",
    "Output Target Code",
    "Output Target Description",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes a BOM-prefixed CSV with one row per query, in iteration order.
pub fn write_predictions<'a, W, I>(writer: W, rows: I) -> Result<usize, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = (&'a EntityQuery, &'a Prediction)>,
{
    let mut writer = writer;
    writer.write_all(UTF8_BOM)?;
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(OUTPUT_COLUMNS)?;
    let mut written = 0usize;
    for (query, prediction) in rows {
        csv.write_record([
            query.text.as_str(),
            query.entity_type.as_str(),
            prediction.system.as_str(),
            prediction.code.as_str(),
            prediction.description.as_str(),
        ])?;
        written += 1;
    }
    csv.flush()?;
    Ok(written)
}

/// Writes predictions to `path`, creating parent directories.
pub fn write_predictions_csv<'a, I>(path: &Path, rows: I) -> Result<usize, IngestError>
where
    I: IntoIterator<Item = (&'a EntityQuery, &'a Prediction)>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    let written =
        write_predictions(BufWriter::new(file), rows).map_err(|e| IngestError::csv(path, e))?;
    info!(path = %path.display(), rows = written, "predictions written");
    Ok(written)
}
