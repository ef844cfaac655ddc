//! wb-results: persisted wellbeing table, companion files and build manifest.

pub mod codec;
pub mod hash;
pub mod metadata;
pub mod store;
pub mod types;

pub use codec::{read_table, read_table_csv, write_table, write_table_csv};
pub use hash::{compute_build_id, hash_bytes};
pub use metadata::render_metadata;
pub use store::TableStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table invariant violated: {0}")]
    Core(#[from] wb_core::CoreError),

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid value in row {row}, column {column}: {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Build not found in {path}")]
    BuildNotFound { path: String },
}
