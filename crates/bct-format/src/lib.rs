//! # bct-format
//!
//! Text output for Delft3D-FLOW boundary condition (`.bct`) files.
//!
//! A `.bct` file holds one table per boundary section. Every table starts with
//! an 11-line header followed by one record per time step: time in minutes
//! after the reference date, then the water level at end A and end B, all in
//! fixed-width scientific notation. Lines end in `\r\n` regardless of platform.
//!
//! ```no_run
//! use bct_format::{BctWriter, BoundarySection, SciFormatter, TimeAxis};
//!
//! let axis = TimeAxis::new(0.0, 1440.0, 20.0)?;
//! let levels = vec![0.0; axis.len()];
//! let section = BoundarySection::new("North", &axis, levels.clone(), levels)?;
//!
//! let writer = BctWriter::new("20150101", SciFormatter::default());
//! writer.write_file("model.bct", &[section])?;
//! # Ok::<(), bct_format::FormatError>(())
//! ```

mod error;
mod sci;
mod section;
mod time_axis;
mod writer;

pub use error::FormatError;
pub use sci::{pad_positive, NanPolicy, SciFormatter, MAX_EXP_DIGITS, MAX_PRECISION};
pub use section::BoundarySection;
pub use time_axis::{TimeAxis, MAX_RECORDS};
pub use writer::{BctWriter, LINE_ENDING};

/// Result type for formatting and writing.
pub type Result<T> = std::result::Result<T, FormatError>;
