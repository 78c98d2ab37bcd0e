//! Error types for coordinate conversion.

use thiserror::Error;

/// Errors that can occur when projecting coordinates.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A coordinate component is outside the range the projection accepts.
    #[error("{quantity} {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending quantity (e.g. "easting").
        quantity: &'static str,
        /// Offending value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Zone number outside 1-60.
    #[error("Invalid UTM zone number {0} (must be 1-60)")]
    InvalidZone(u8),

    /// Hemisphere designator that is neither north nor south.
    #[error("Invalid hemisphere '{0}' (expected 'N' or 'S')")]
    InvalidHemisphere(String),

    /// Conversion of a named boundary point failed.
    #[error("cannot project boundary point '{name}': {source}")]
    Point {
        /// Boundary point name.
        name: String,
        /// Underlying projection error.
        #[source]
        source: Box<GeoError>,
    },
}
