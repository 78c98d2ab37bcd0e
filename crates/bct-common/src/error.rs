//! Error types for boundary table handling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or pairing boundary points.
#[derive(Debug, Error)]
pub enum CommonError {
    /// The boundary table could not be opened.
    #[error("cannot read boundary table {path}: {source}")]
    Io {
        /// Path of the table.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A row could not be parsed as `name,easting,northing`.
    #[error("malformed boundary table: {0}")]
    Csv(#[from] csv::Error),

    /// The table contains no rows.
    #[error("boundary table is empty")]
    EmptyTable,

    /// A point name does not end in `a` or `b`, or has nothing before the suffix.
    #[error("row {row}: boundary name '{name}' must end in 'a' or 'b'")]
    InvalidSuffix {
        /// 1-based row number.
        row: usize,
        /// Offending name.
        name: String,
    },

    /// An `a` end without its `b`, or a `b` end without a preceding `a`.
    #[error("row {row}: boundary end '{name}' has no matching {missing} end")]
    UnpairedEnd {
        /// 1-based row number.
        row: usize,
        /// Offending name.
        name: String,
        /// The end that was expected (`a` or `b`).
        missing: char,
    },

    /// The `a` and `b` rows of a pair name different sections.
    #[error("row {row}: '{name_b}' does not belong to the section of '{name_a}'")]
    SectionMismatch {
        /// 1-based row number of the `b` end.
        row: usize,
        /// Name of the `a` end.
        name_a: String,
        /// Name of the `b` end.
        name_b: String,
    },

    /// The same section appears twice in the table.
    #[error("boundary section '{0}' is defined more than once")]
    DuplicateSection(String),
}
