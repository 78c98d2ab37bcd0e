//! # bct-common
//!
//! Shared types for the bctgen workspace and loading of the boundary table.
//!
//! The boundary table is a headerless CSV with one row per boundary end point:
//!
//! ```text
//! North_a,452301.5,5934120.0
//! North_b,455880.2,5936002.7
//! ```
//!
//! Rows come in pairs. A name ending in `a` opens a boundary section and the
//! next row must be the matching `b` end. The section is named after the shared
//! stem (`North` above).
//!
//! ```no_run
//! use bct_common::load_boundary_pairs;
//!
//! let pairs = load_boundary_pairs("boundaries.csv")?;
//! for pair in &pairs {
//!     println!("{}: {} / {}", pair.section, pair.end_a.name, pair.end_b.name);
//! }
//! # Ok::<(), bct_common::CommonError>(())
//! ```

mod boundary_table;
mod error;
mod types;

pub use boundary_table::{
    load_boundary_pairs, load_boundary_points, pair_boundary_points, read_boundary_points,
    section_name,
};
pub use error::CommonError;
pub use types::{BoundaryPair, BoundaryPoint, GeoCoord, LocatedPoint, PairEnd};

/// Result type for boundary table operations.
pub type Result<T> = std::result::Result<T, CommonError>;
