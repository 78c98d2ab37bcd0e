//! Error types for formatting and writing boundary files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while formatting values or writing a `.bct` file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A NaN was formatted while the formatter rejects missing values.
    #[error("value is NaN")]
    NotANumber,

    /// Infinite values have no scientific-notation form.
    #[error("cannot format non-finite value {0}")]
    NonFinite(f64),

    /// Formatter settings out of range.
    #[error("invalid formatter settings: {0}")]
    InvalidFormatter(String),

    /// Time axis step must be positive and finite.
    #[error("invalid time step {0} (must be positive and finite)")]
    InvalidStep(f64),

    /// Time axis stop lies before its start.
    #[error("time axis stop {stop} is before start {start}")]
    InvertedAxis {
        /// Axis start.
        start: f64,
        /// Axis stop.
        stop: f64,
    },

    /// The axis would hold more records than can be written.
    #[error("time axis {start}..{stop} with step {step} exceeds {limit} records")]
    TooManyRecords {
        /// Axis start.
        start: f64,
        /// Axis stop.
        stop: f64,
        /// Axis step.
        step: f64,
        /// Largest accepted record count.
        limit: usize,
    },

    /// A level series does not have one value per time step.
    #[error("section '{section}' end {end}: {actual} values for {expected} time steps")]
    LengthMismatch {
        /// Section name.
        section: String,
        /// Which end (`A` or `B`).
        end: char,
        /// Number of time steps.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Formatting a value of a section failed.
    #[error("section '{section}', row {row}: {source}")]
    Row {
        /// Section name.
        section: String,
        /// 1-based row number within the section.
        row: usize,
        /// Underlying error.
        #[source]
        source: Box<FormatError>,
    },

    /// Output file could not be removed, created or written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to an output stream failed.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),
}
