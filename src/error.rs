use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the growth computations and record ingestion.
#[derive(Debug, Error, PartialEq)]
pub enum GrowthError {
    /// No healthy observation with a defined weight difference was found,
    /// so the mean is undefined.
    #[error("no healthy observations with a defined weight difference")]
    NoHealthyObservations,

    /// A row lacks a field the computations cannot do without.
    #[error("row {row} is missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    #[error("no records for subject {0}")]
    UnknownSubject(u32),

    #[error("unsupported records format {0:?}")]
    UnsupportedFormat(PathBuf),
}
