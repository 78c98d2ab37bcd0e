//! # bct-mdf
//!
//! Reads the run parameters a BCT file depends on from a Delft3D-FLOW model
//! definition (MDF) file:
//!
//! - `Tstart` / `Tstop`: simulation start and stop, in minutes after the
//!   reference date
//! - `Itdate`: the reference date, e.g. `#2015-01-01#`
//!
//! ```no_run
//! use bct_mdf::ModelParameters;
//!
//! let params = ModelParameters::load("elbe.mdf")?;
//! println!("{} .. {} minutes after {}", params.start, params.stop, params.reference_date);
//! # Ok::<(), bct_mdf::MdfError>(())
//! ```

mod error;
mod params;
mod parser;

pub use error::MdfError;
pub use params::{ModelParameters, ReferenceDate, KEY_ITDATE, KEY_TSTART, KEY_TSTOP, KEY_TUNIT};
pub use parser::MdfFile;

/// Result type for MDF operations.
pub type Result<T> = std::result::Result<T, MdfError>;
