//! Uniform output time axis in minutes after the reference date.

use crate::{FormatError, Result};

/// Relative slack when deciding whether the last step still reaches `stop`.
const STOP_TOLERANCE: f64 = 1e-9;

/// Largest number of records a single axis may hold.
pub const MAX_RECORDS: usize = 10_000_000;

/// Offsets `start, start + step, ...` up to and including `stop`.
///
/// Each value is computed as `start + i * step`, so long axes do not drift.
/// A final step that would land past `stop` is not generated.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    start: f64,
    stop: f64,
    step: f64,
    values: Vec<f64>,
}

impl TimeAxis {
    /// Build the axis; `step` must be positive and `stop` not before `start`.
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        for bound in [start, stop] {
            if !bound.is_finite() {
                return Err(FormatError::NonFinite(bound));
            }
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(FormatError::InvalidStep(step));
        }
        if stop < start {
            return Err(FormatError::InvertedAxis { start, stop });
        }

        let span = (stop - start) / step;
        if !span.is_finite() || span >= MAX_RECORDS as f64 {
            return Err(FormatError::TooManyRecords {
                start,
                stop,
                step,
                limit: MAX_RECORDS,
            });
        }
        let steps = (span + STOP_TOLERANCE * span.max(1.0)).floor() as usize;
        let values = (0..=steps).map(|i| start + i as f64 * step).collect();

        Ok(Self {
            start,
            stop,
            step,
            values,
        })
    }

    /// First offset.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Requested end; the last offset may fall short of it.
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Spacing between records.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// All offsets in ascending order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of records in every section's table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; an axis holds at least `start`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
