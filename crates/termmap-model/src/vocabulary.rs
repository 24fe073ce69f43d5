use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::system::SystemId;

/// One display string for a code, as loaded from a vocabulary source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRow {
    pub system: SystemId,
    pub code: String,
    /// Display string (STR).
    pub text: String,
    /// Semantic type (STY); empty when the source has none.
    pub semantic_type: String,
    /// Term type (TTY).
    pub term_type: String,
}

impl VocabularyRow {
    pub fn new(
        system: SystemId,
        code: impl Into<String>,
        text: impl Into<String>,
        semantic_type: impl Into<String>,
        term_type: impl Into<String>,
    ) -> Self {
        Self {
            system,
            code: code.into(),
            text: text.into(),
            semantic_type: semantic_type.into(),
            term_type: term_type.into(),
        }
    }

    /// Display length in characters, used as a shortest-string tie-break.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// All rows of a single coding system, immutable once built.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    system: SystemId,
    rows: Vec<VocabularyRow>,
    by_code: BTreeMap<String, Vec<usize>>,
}

impl Vocabulary {
    /// Builds a partition, tagging every row with `system`.
    pub fn new(system: SystemId, rows: Vec<VocabularyRow>) -> Self {
        let mut rows = rows;
        let mut by_code: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, row) in rows.iter_mut().enumerate() {
            row.system = system;
            by_code.entry(row.code.clone()).or_default().push(index);
        }
        Self {
            system,
            rows,
            by_code,
        }
    }

    pub fn system(&self) -> SystemId {
        self.system
    }

    pub fn rows(&self) -> &[VocabularyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VocabularyRow> {
        self.rows.get(index)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Rows sharing `code`, in load order.
    pub fn rows_for_code<'a>(
        &'a self,
        code: &str,
    ) -> impl Iterator<Item = &'a VocabularyRow> + use<'a> {
        self.by_code
            .get(code)
            .into_iter()
            .flatten()
            .map(|&index| &self.rows[index])
    }

    pub fn code_count(&self) -> usize {
        self.by_code.len()
    }
}
