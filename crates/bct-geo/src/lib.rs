//! # bct-geo
//!
//! Conversion of projected UTM coordinates to geographic latitude/longitude.
//!
//! Boundary tables list points as easting/northing in a single UTM zone. The
//! water-level dataset is addressed by latitude/longitude, so every point is
//! projected back before the grid lookup.
//!
//! ```
//! use bct_geo::{utm_to_lat_lon, UtmZone};
//!
//! let coord = utm_to_lat_lon(500_000.0, 5_900_000.0, UtmZone::default())?;
//! assert!((coord.lon - 9.0).abs() < 1e-9);
//! # Ok::<(), bct_geo::GeoError>(())
//! ```

mod error;
mod utm;

pub use error::GeoError;
pub use utm::{lat_lon_to_utm, utm_to_lat_lon, Hemisphere, UtmZone};

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, GeoError>;
