//! Per-point series extraction and alignment to an output time axis.

use crate::{GridError, Result, WaterLevelGrid};
use bct_common::{GeoCoord, LocatedPoint};
use chrono::NaiveDateTime;
use rayon::prelude::*;
use tracing::debug;

/// How a point series is matched to the rows of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeriesAlignment {
    /// Row `i` takes the `i`-th sample of the time window.
    #[default]
    ByIndex,
    /// Row `i` takes the sample whose timestamp is closest to the row's time.
    NearestTime,
}

/// The water-level series picked for one boundary point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub name: String,
    /// Index of the grid cell the series was read from.
    pub cell: usize,
    /// Coordinate of that cell.
    pub cell_coord: Option<GeoCoord>,
    pub values: Vec<f64>,
}

impl PointSeries {
    /// Match the series to `row_times`, the timestamps of the output rows.
    ///
    /// `sample_times` are the timestamps of `values`.
    pub fn align(
        &self,
        sample_times: &[NaiveDateTime],
        row_times: &[NaiveDateTime],
        alignment: SeriesAlignment,
    ) -> Result<Vec<f64>> {
        match alignment {
            SeriesAlignment::ByIndex => {
                if self.values.len() < row_times.len() {
                    return Err(GridError::SeriesTooShort {
                        name: self.name.clone(),
                        needed: row_times.len(),
                        available: self.values.len(),
                    });
                }
                if self.values.len() > row_times.len() {
                    debug!(
                        "{}: ignoring {} samples past the end of the table",
                        self.name,
                        self.values.len() - row_times.len()
                    );
                }
                Ok(self.values[..row_times.len()].to_vec())
            }
            SeriesAlignment::NearestTime => {
                if sample_times.is_empty() || sample_times.len() != self.values.len() {
                    return Err(GridError::SeriesTooShort {
                        name: self.name.clone(),
                        needed: row_times.len(),
                        available: self.values.len().min(sample_times.len()),
                    });
                }
                Ok(row_times
                    .iter()
                    .map(|&t| self.values[nearest_time(sample_times, t)])
                    .collect())
            }
        }
    }
}

/// Index of the sample closest to `target`; ties go to the earlier sample.
fn nearest_time(times: &[NaiveDateTime], target: NaiveDateTime) -> usize {
    let mut best = 0;
    let mut best_gap = (times[0] - target).num_milliseconds().abs();
    for (idx, &t) in times.iter().enumerate().skip(1) {
        let gap = (t - target).num_milliseconds().abs();
        if gap < best_gap {
            best = idx;
            best_gap = gap;
        }
    }
    best
}

/// Extract the series of the nearest cell for every point.
///
/// Lookups run in parallel; the result keeps the order of `points`.
pub fn extract_series(grid: &WaterLevelGrid, points: &[LocatedPoint]) -> Result<Vec<PointSeries>> {
    points
        .par_iter()
        .map(|point| -> Result<PointSeries> {
            let cell = grid.nearest_cell(point.coord).map_err(|e| GridError::Point {
                name: point.name.clone(),
                source: Box::new(e),
            })?;
            let cell_coord = grid.layout().cell_coord(cell);

            debug!(
                "{} ({:.5}, {:.5}) -> cell {} at {:?}",
                point.name, point.coord.lat, point.coord.lon, cell, cell_coord
            );

            Ok(PointSeries {
                name: point.name.clone(),
                cell,
                cell_coord,
                values: grid.series(cell),
            })
        })
        .collect()
}
