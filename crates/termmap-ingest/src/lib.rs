#![deny(unsafe_code)]

pub mod error;
pub mod output;
pub mod queries;
pub mod vocabulary;

mod header;

pub use error::IngestError;
pub use output::{OUTPUT_COLUMNS, write_predictions, write_predictions_csv};
pub use queries::{
    ENTITY_TYPE_COLUMN, QueryTable, TEXT_COLUMN_CANDIDATES, read_queries, read_queries_csv,
};
pub use vocabulary::{VOCABULARY_COLUMNS, load_vocabulary_csv, read_vocabulary};
