//! Error types for MDF parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading model parameters from an MDF file.
#[derive(Debug, Error)]
pub enum MdfError {
    /// I/O error reading the file.
    #[error("cannot read model definition file {path}: {source}")]
    Io {
        /// Path of the MDF file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required key is not present.
    #[error("model definition file has no '{0}' entry")]
    MissingKey(&'static str),

    /// A numeric entry could not be parsed.
    #[error("invalid number for '{key}': '{value}'")]
    InvalidNumber {
        /// Key of the entry.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// The reference date is not an 8-digit calendar date.
    #[error("invalid reference date '{0}' (expected YYYY-MM-DD or YYYYMMDD)")]
    InvalidReferenceDate(String),

    /// The model uses a time unit other than minutes.
    #[error("unsupported time unit '{0}' (only minutes are supported)")]
    UnsupportedTimeUnit(String),

    /// Start time lies after stop time.
    #[error("Tstart ({start}) is after Tstop ({stop})")]
    InvertedTimeRange {
        start: f64,
        stop: f64,
    },
}
