//! # bct-grid
//!
//! Gridded water-level datasets: loading from netCDF, time-window selection,
//! nearest-cell lookup and per-point series extraction.
//!
//! ## Example
//!
//! ```no_run
//! use bct_common::GeoCoord;
//! use bct_grid::{open_dataset, DatasetSpec, TimeWindow};
//!
//! let grid = open_dataset("easygsh_2015.nc", &DatasetSpec::default())?;
//! let window = TimeWindow::parse("2015-01-01", "2015-01-02")?;
//! let day = grid.select_window(&window)?;
//!
//! let levels = day.series_at(GeoCoord::new(54.05, 8.12))?;
//! println!("{} samples", levels.len());
//! # Ok::<(), bct_grid::GridError>(())
//! ```
//!
//! Reading files needs the `netcdf` feature (on by default). Without it,
//! [`open_dataset`] returns [`GridError::BackendUnavailable`] and grids can
//! still be built in memory with [`WaterLevelGrid::new`].

mod dataset;
mod error;
mod extract;
mod grid;
mod time;

pub use dataset::{backend_available, open_dataset, DatasetSpec, LAT_CANDIDATES, LON_CANDIDATES};
pub use error::GridError;
pub use extract::{extract_series, PointSeries, SeriesAlignment};
pub use grid::{CellLayout, WaterLevelGrid};
pub use time::{minutes_after, parse_timestamp, CfTimeUnits, TimeWindow};

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
