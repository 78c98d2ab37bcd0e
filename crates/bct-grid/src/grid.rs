//! In-memory water-level grid and nearest-cell lookup.

use crate::{GridError, Result, TimeWindow};
use bct_common::GeoCoord;
use chrono::NaiveDateTime;

/// Spatial arrangement of the grid cells.
#[derive(Debug, Clone, PartialEq)]
pub enum CellLayout {
    /// Regular grid with 1-D latitude and longitude axes.
    ///
    /// Cell `(i, j)` has index `i * lons.len() + j`.
    Rectilinear {
        /// Latitude of each grid row.
        lats: Vec<f64>,
        /// Longitude of each grid column.
        lons: Vec<f64>,
    },
    /// One coordinate pair per cell (mesh faces, or a flattened curvilinear grid).
    Unstructured {
        /// Latitude of each cell.
        lats: Vec<f64>,
        /// Longitude of each cell.
        lons: Vec<f64>,
    },
}

impl CellLayout {
    /// Number of addressable cells.
    pub fn cell_count(&self) -> usize {
        match self {
            CellLayout::Rectilinear { lats, lons } => lats.len() * lons.len(),
            CellLayout::Unstructured { lats, .. } => lats.len(),
        }
    }

    /// Coordinate of a cell.
    pub fn cell_coord(&self, cell: usize) -> Option<GeoCoord> {
        match self {
            CellLayout::Rectilinear { lats, lons } => {
                if lons.is_empty() {
                    return None;
                }
                let (i, j) = (cell / lons.len(), cell % lons.len());
                Some(GeoCoord::new(*lats.get(i)?, lons[j]))
            }
            CellLayout::Unstructured { lats, lons } => {
                Some(GeoCoord::new(*lats.get(cell)?, *lons.get(cell)?))
            }
        }
    }

    /// Index of the cell nearest to a coordinate.
    ///
    /// Rectilinear grids pick the nearest row and column independently; on an
    /// exact tie the larger coordinate value wins. Unstructured grids use the
    /// Euclidean distance in (lon, lat) degrees; ties go to the lowest index.
    /// Cells with non-finite coordinates are never selected.
    pub fn nearest(&self, coord: GeoCoord) -> Option<usize> {
        if !coord.is_finite() {
            return None;
        }

        match self {
            CellLayout::Rectilinear { lats, lons } => {
                let i = nearest_on_axis(lats, coord.lat)?;
                let j = nearest_on_axis(lons, coord.lon)?;
                Some(i * lons.len() + j)
            }
            CellLayout::Unstructured { lats, lons } => {
                let mut best: Option<(usize, f64)> = None;
                for (idx, (&lat, &lon)) in lats.iter().zip(lons.iter()).enumerate() {
                    if !lat.is_finite() || !lon.is_finite() {
                        continue;
                    }
                    let d2 = (lon - coord.lon).powi(2) + (lat - coord.lat).powi(2);
                    if best.map_or(true, |(_, best_d2)| d2 < best_d2) {
                        best = Some((idx, d2));
                    }
                }
                best.map(|(idx, _)| idx)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if let CellLayout::Unstructured { lats, lons } = self {
            if lats.len() != lons.len() {
                return Err(GridError::InvalidLayout(format!(
                    "{} latitudes but {} longitudes",
                    lats.len(),
                    lons.len()
                )));
            }
        }
        Ok(())
    }
}

/// Nearest position on a 1-D coordinate axis.
fn nearest_on_axis(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in axis.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let d = (value - target).abs();
        let better = match best {
            None => true,
            Some((best_idx, best_d)) => d < best_d || (d == best_d && value > axis[best_idx]),
        };
        if better {
            best = Some((idx, d));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Water levels on a set of cells over a sequence of time steps.
///
/// Values are stored time-major: the level of cell `c` at step `t` is
/// `values[t * cell_count + c]`. Missing data is stored as NaN.
#[derive(Debug, Clone)]
pub struct WaterLevelGrid {
    times: Vec<NaiveDateTime>,
    layout: CellLayout,
    values: Vec<f64>,
    /// Lookups farther than this (in degrees) fail instead of returning a cell.
    max_distance_deg: Option<f64>,
}

impl WaterLevelGrid {
    /// Create a grid, checking that the value count matches the dimensions.
    pub fn new(times: Vec<NaiveDateTime>, layout: CellLayout, values: Vec<f64>) -> Result<Self> {
        layout.validate()?;

        let expected = times.len() * layout.cell_count();
        if values.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            times,
            layout,
            values,
            max_distance_deg: None,
        })
    }

    /// Reject lookups whose nearest cell is farther than `limit` degrees.
    pub fn with_max_distance(mut self, limit: Option<f64>) -> Self {
        self.max_distance_deg = limit;
        self
    }

    /// Time labels, one per step, in UTC.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Cell coordinates.
    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }

    /// Number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.layout.cell_count()
    }

    /// Number of time steps.
    pub fn time_len(&self) -> usize {
        self.times.len()
    }

    /// First and last time label, if the grid has any time steps.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = *self.times.iter().min()?;
        let last = *self.times.iter().max()?;
        Some((first, last))
    }

    /// Restrict the grid to the time steps inside `window` (inclusive).
    ///
    /// Time steps keep their original order.
    pub fn select_window(&self, window: &TimeWindow) -> Result<WaterLevelGrid> {
        let n = self.cell_count();
        let keep: Vec<usize> = self
            .times
            .iter()
            .enumerate()
            .filter(|(_, t)| window.contains(**t))
            .map(|(i, _)| i)
            .collect();

        if keep.is_empty() {
            return Err(GridError::EmptyTimeWindow {
                start: window.start,
                end: window.end,
            });
        }

        let times = keep.iter().map(|&i| self.times[i]).collect();
        let mut values = Vec::with_capacity(keep.len() * n);
        for &i in &keep {
            values.extend_from_slice(&self.values[i * n..(i + 1) * n]);
        }

        Ok(WaterLevelGrid {
            times,
            layout: self.layout.clone(),
            values,
            max_distance_deg: self.max_distance_deg,
        })
    }

    /// Index of the cell nearest to `coord`.
    pub fn nearest_cell(&self, coord: GeoCoord) -> Result<usize> {
        let lookup_failed = |reason: &str| GridError::LookupFailed {
            lat: coord.lat,
            lon: coord.lon,
            reason: reason.to_string(),
        };

        if self.cell_count() == 0 {
            return Err(lookup_failed("grid has no cells"));
        }
        if !coord.is_finite() {
            return Err(lookup_failed("coordinate is not finite"));
        }

        let cell = self
            .layout
            .nearest(coord)
            .ok_or_else(|| lookup_failed("no cell has valid coordinates"))?;

        if let Some(limit) = self.max_distance_deg {
            let distance = self.distance_to_cell(coord, cell);
            if distance > limit {
                return Err(GridError::TooFar {
                    lat: coord.lat,
                    lon: coord.lon,
                    distance,
                    limit,
                });
            }
        }

        Ok(cell)
    }

    /// Euclidean distance in degrees between a coordinate and a cell center.
    pub fn distance_to_cell(&self, coord: GeoCoord, cell: usize) -> f64 {
        match self.layout.cell_coord(cell) {
            Some(c) => ((c.lat - coord.lat).powi(2) + (c.lon - coord.lon).powi(2)).sqrt(),
            None => f64::INFINITY,
        }
    }

    /// All values of one cell in time order.
    pub fn series(&self, cell: usize) -> Vec<f64> {
        let n = self.cell_count();
        (0..self.times.len())
            .map(|t| self.values[t * n + cell])
            .collect()
    }

    /// The value series of the cell nearest to `coord`.
    pub fn series_at(&self, coord: GeoCoord) -> Result<Vec<f64>> {
        let cell = self.nearest_cell(coord)?;
        Ok(self.series(cell))
    }
}
