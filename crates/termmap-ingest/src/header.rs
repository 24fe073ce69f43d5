//! Header and cell cleanup shared by the CSV readers.

pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Position of the first header equal to `name`, ignoring case.
pub(crate) fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

pub(crate) fn cell(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).map(normalize_cell).unwrap_or_default()
}
