//! One boundary section: a shared time axis and the levels at both ends.

use crate::{FormatError, Result, TimeAxis};

/// Rows of one boundary section, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySection {
    name: String,
    times: Vec<f64>,
    level_a: Vec<f64>,
    level_b: Vec<f64>,
}

impl BoundarySection {
    /// Build a section; both level series need one value per axis step.
    pub fn new(
        name: impl Into<String>,
        axis: &TimeAxis,
        level_a: Vec<f64>,
        level_b: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        for (end, levels) in [('A', &level_a), ('B', &level_b)] {
            if levels.len() != axis.len() {
                return Err(FormatError::LengthMismatch {
                    section: name,
                    end,
                    expected: axis.len(),
                    actual: levels.len(),
                });
            }
        }

        Ok(Self {
            name,
            times: axis.values().to_vec(),
            level_a,
            level_b,
        })
    }

    /// Section identifier written to the `location` header line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the section has no records.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `(time, level_a, level_b)` per record.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.times
            .iter()
            .zip(&self.level_a)
            .zip(&self.level_b)
            .map(|((&t, &a), &b)| (t, a, b))
    }

    /// Number of NaN levels at either end.
    pub fn missing_levels(&self) -> usize {
        self.level_a
            .iter()
            .chain(&self.level_b)
            .filter(|v| v.is_nan())
            .count()
    }
}
