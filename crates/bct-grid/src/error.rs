//! Error types for the grid crate.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur when reading or querying a water-level grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// netCDF library error.
    #[cfg(feature = "netcdf")]
    #[error("netCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// The crate was built without a dataset reader.
    #[error("netCDF support is not available (build with the `netcdf` feature)")]
    BackendUnavailable,

    /// A required variable is missing from the dataset.
    #[error("dataset has no variable '{0}'")]
    MissingVariable(String),

    /// The data variable does not have the expected time dimension.
    #[error("variable '{variable}' has no dimension '{dimension}'")]
    MissingDimension {
        /// Data variable name.
        variable: String,
        /// Expected dimension name.
        dimension: String,
    },

    /// The dataset layout is not one we can address by latitude/longitude.
    #[error("unsupported dataset layout: {0}")]
    InvalidLayout(String),

    /// Value count does not match the grid dimensions.
    #[error("grid holds {actual} values, expected {expected}")]
    ShapeMismatch {
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        actual: usize,
    },

    /// The time variable's `units` attribute is missing or not CF-style.
    #[error("invalid time units '{0}' (expected '<unit> since <date>')")]
    InvalidTimeUnits(String),

    /// A time-window bound could not be parsed.
    #[error("invalid timestamp '{0}' (expected YYYY-MM-DD[ HH:MM[:SS]])")]
    InvalidTimestamp(String),

    /// Window start lies after window end.
    #[error("time window start {start} is after end {end}")]
    InvertedWindow {
        /// Window start.
        start: NaiveDateTime,
        /// Window end.
        end: NaiveDateTime,
    },

    /// No dataset time step falls inside the window.
    #[error("no dataset time steps between {start} and {end}")]
    EmptyTimeWindow {
        /// Window start.
        start: NaiveDateTime,
        /// Window end.
        end: NaiveDateTime,
    },

    /// No grid cell could be found for a coordinate.
    #[error("no grid cell found for coordinate ({lat}, {lon}): {reason}")]
    LookupFailed {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
        /// Why the lookup failed.
        reason: String,
    },

    /// The nearest cell is farther away than the configured limit.
    #[error("nearest grid cell to ({lat}, {lon}) is {distance:.4} deg away (limit {limit} deg)")]
    TooFar {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
        /// Distance to the nearest cell in degrees.
        distance: f64,
        /// Configured maximum distance in degrees.
        limit: f64,
    },

    /// A point series has fewer samples than the output table has rows.
    #[error("series for '{name}' has {available} samples but {needed} rows are required")]
    SeriesTooShort {
        /// Boundary point name.
        name: String,
        /// Number of rows in the output table.
        needed: usize,
        /// Number of samples in the time window.
        available: usize,
    },

    /// Lookup of a named boundary point failed.
    #[error("boundary point '{name}': {source}")]
    Point {
        /// Boundary point name.
        name: String,
        /// Underlying error.
        #[source]
        source: Box<GridError>,
    },
}
