//! wb-core: stable foundation for the wellbeing explorer.
//!
//! Contains:
//! - numeric (Real + tolerances + rounding + summary statistics)
//! - dimension (closed set of wellbeing dimensions + per-dimension storage)
//! - table (normalized per-country records and the shared table)
//! - error (shared error types)

pub mod dimension;
pub mod error;
pub mod numeric;
pub mod table;

// Re-exports: nice ergonomics for downstream crates
pub use dimension::{Dimension, DimensionScores};
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use table::{WellbeingRecord, WellbeingTable};
