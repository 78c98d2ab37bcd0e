//! # bct-runner
//!
//! Generates Delft3D-FLOW water-level boundary files (`.bct`) from a model
//! definition file, a boundary table and a netCDF water-level dataset.
//!
//! The run has four stages:
//!
//! 1. read `Tstart`, `Tstop` and `Itdate` from the MDF file,
//! 2. load the boundary table and project each end point from UTM,
//! 3. cut the dataset to the time window and take the nearest cell's series
//!    for every end point,
//! 4. write one table per boundary section on a uniform time axis.
//!
//! ```no_run
//! use bct_runner::{generate_bct, JobConfig};
//!
//! let job = JobConfig::new(
//!     "boundaries.csv",
//!     "easygsh_2015.nc",
//!     "elbe.mdf",
//!     "2015-01-01",
//!     "2015-01-31",
//!     20.0,
//! );
//! let summary = generate_bct(&job)?;
//! println!("{}", summary);
//! # Ok::<(), bct_runner::PipelineError>(())
//! ```

pub mod config;
pub mod pipeline;

pub use config::{ConfigError, JobConfig, JobOverrides};
pub use pipeline::{generate_bct, generate_bct_with_grid, PipelineError, RunSummary};
