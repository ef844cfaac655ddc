use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Unknown dimension key: {key}")]
    UnknownDimension { key: String },

    #[error("Duplicate {what}: {value}")]
    DuplicateKey { what: &'static str, value: String },

    #[error("Value out of range for {country}/{column}: {value}")]
    OutOfRange {
        country: String,
        column: String,
        value: f64,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
