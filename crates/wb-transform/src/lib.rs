//! wb-transform: offline build of the normalized wellbeing table.
//!
//! Raw OECD-style observations (one row per country x measure x year x
//! demographic slice) are reduced to one normalized row per country,
//! with a composite index and per-dimension gaps from the cross-country mean.

pub mod checks;
pub mod pipeline;
pub mod profile;
pub mod raw;

pub use checks::{ValidationCheck, validate_table};
pub use pipeline::{BuildReport, FillRecord, MeasurePresence, TransformOutput, build_table};
pub use profile::{DomainProfile, MeasureProfile, RawProfile, YearCompleteness, profile_raw};
pub use raw::{RawObservation, read_raw_csv, read_raw_from_reader};

pub type TransformResult<T> = Result<T, TransformError>;

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table invariant violated: {0}")]
    Core(#[from] wb_core::CoreError),

    #[error("No configured measure is present in the raw data")]
    NoDimensions,

    #[error("No country survived the missing-data filter")]
    NoCountries,
}
