//! Loading water-level grids from netCDF files.
//!
//! The default names match the EasyGSH-DB UGRID products
//! (`Mesh2_face_Wasserstand_2d` over `nMesh2_data_time`), but any dataset with
//! a leading time dimension and latitude/longitude coordinate variables can be
//! read.

use crate::{Result, WaterLevelGrid};
use std::path::Path;

/// Names of the variables and dimensions to read from a dataset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatasetSpec {
    /// Water-level variable, with time as its first dimension.
    pub variable: String,
    /// Name of the time dimension.
    pub time_dimension: String,
    /// Time coordinate variable; defaults to the time dimension's name.
    pub time_variable: Option<String>,
    /// Latitude coordinate variable; searched among common names if unset.
    pub lat_variable: Option<String>,
    /// Longitude coordinate variable; searched among common names if unset.
    pub lon_variable: Option<String>,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            variable: "Mesh2_face_Wasserstand_2d".to_string(),
            time_dimension: "nMesh2_data_time".to_string(),
            time_variable: None,
            lat_variable: None,
            lon_variable: None,
        }
    }
}

/// Latitude variable names tried in order when none is configured.
pub const LAT_CANDIDATES: &[&str] = &["lat", "latitude", "Mesh2_face_y", "Mesh2_face_lat"];
/// Longitude variable names tried in order when none is configured.
pub const LON_CANDIDATES: &[&str] = &["lon", "longitude", "Mesh2_face_x", "Mesh2_face_lon"];

/// Whether this build can read netCDF files.
pub const fn backend_available() -> bool {
    cfg!(feature = "netcdf")
}

/// Open a netCDF dataset and load the configured water-level variable.
///
/// Fill values (`_FillValue`, `missing_value`) become NaN; `scale_factor` and
/// `add_offset` are applied. Time labels are decoded from the CF `units`
/// attribute and normalized to UTC.
#[cfg(feature = "netcdf")]
pub fn open_dataset<P: AsRef<Path>>(path: P, spec: &DatasetSpec) -> Result<WaterLevelGrid> {
    reader::open(path.as_ref(), spec)
}

/// Without the `netcdf` feature every open fails immediately.
#[cfg(not(feature = "netcdf"))]
pub fn open_dataset<P: AsRef<Path>>(_path: P, _spec: &DatasetSpec) -> Result<WaterLevelGrid> {
    Err(crate::GridError::BackendUnavailable)
}

#[cfg(feature = "netcdf")]
mod reader {
    use super::{DatasetSpec, LAT_CANDIDATES, LON_CANDIDATES};
    use crate::{CellLayout, CfTimeUnits, GridError, Result, WaterLevelGrid};
    use chrono::NaiveDateTime;
    use netcdf::{AttributeValue, File, Variable};
    use std::path::Path;
    use tracing::{debug, info};

    pub(super) fn open(path: &Path, spec: &DatasetSpec) -> Result<WaterLevelGrid> {
        let file = netcdf::open(path)?;

        let var = file
            .variable(&spec.variable)
            .ok_or_else(|| GridError::MissingVariable(spec.variable.clone()))?;
        let dims: Vec<(String, usize)> = var
            .dimensions()
            .iter()
            .map(|d| (d.name(), d.len()))
            .collect();

        match dims.iter().position(|(name, _)| *name == spec.time_dimension) {
            Some(0) => {}
            Some(_) => {
                return Err(GridError::InvalidLayout(format!(
                    "time dimension '{}' must be the first dimension of '{}'",
                    spec.time_dimension, spec.variable
                )))
            }
            None => {
                return Err(GridError::MissingDimension {
                    variable: spec.variable.clone(),
                    dimension: spec.time_dimension.clone(),
                })
            }
        }

        let time_name = spec
            .time_variable
            .as_deref()
            .unwrap_or(&spec.time_dimension);
        let time_var = file
            .variable(time_name)
            .ok_or_else(|| GridError::MissingVariable(time_name.to_string()))?;
        let times = read_times(&time_var)?;

        let lat_var = find_coordinate(&file, spec.lat_variable.as_deref(), LAT_CANDIDATES)?;
        let lon_var = find_coordinate(&file, spec.lon_variable.as_deref(), LON_CANDIDATES)?;
        let lat_dims = dim_names(&lat_var);
        let lon_dims = dim_names(&lon_var);
        let lats = lat_var.get_values::<f64, _>(..)?;
        let lons = lon_var.get_values::<f64, _>(..)?;

        let mut values = read_values(&var)?;

        let spatial: Vec<&str> = dims[1..].iter().map(|(name, _)| name.as_str()).collect();
        let layout = match spatial.as_slice() {
            [face] if dims_are(&lat_dims, &[face]) && dims_are(&lon_dims, &[face]) => {
                CellLayout::Unstructured { lats, lons }
            }
            [d1, d2] if dims_are(&lat_dims, &[d1]) && dims_are(&lon_dims, &[d2]) => {
                CellLayout::Rectilinear { lats, lons }
            }
            [d1, d2] if dims_are(&lat_dims, &[d2]) && dims_are(&lon_dims, &[d1]) => {
                // stored as (time, lon, lat); reorder to (time, lat, lon)
                values = swap_spatial_axes(&values, times.len(), dims[1].1, dims[2].1);
                CellLayout::Rectilinear { lats, lons }
            }
            [d1, d2] if dims_are(&lat_dims, &[d1, d2]) && dims_are(&lon_dims, &[d1, d2]) => {
                // curvilinear grid: every cell has its own coordinate pair
                CellLayout::Unstructured { lats, lons }
            }
            _ => {
                return Err(GridError::InvalidLayout(format!(
                    "cannot match dimensions {:?} of '{}' with latitude {:?} / longitude {:?}",
                    spatial, spec.variable, lat_dims, lon_dims
                )))
            }
        };

        let grid = WaterLevelGrid::new(times, layout, values)?;
        info!(
            "Opened {}: {} time steps, {} cells",
            path.display(),
            grid.time_len(),
            grid.cell_count()
        );
        if let Some((first, last)) = grid.time_range() {
            debug!("Dataset covers {} .. {}", first, last);
        }

        Ok(grid)
    }

    fn dim_names(var: &Variable) -> Vec<String> {
        var.dimensions().iter().map(|d| d.name()).collect()
    }

    fn dims_are(dims: &[String], names: &[&str]) -> bool {
        dims.len() == names.len() && dims.iter().zip(names).all(|(a, b)| a == b)
    }

    fn find_coordinate<'f>(
        file: &'f File,
        explicit: Option<&str>,
        candidates: &[&str],
    ) -> Result<Variable<'f>> {
        if let Some(name) = explicit {
            return file
                .variable(name)
                .ok_or_else(|| GridError::MissingVariable(name.to_string()));
        }

        candidates
            .iter()
            .find_map(|name| file.variable(name))
            .ok_or_else(|| GridError::MissingVariable(candidates.join(" | ")))
    }

    fn read_times(var: &Variable) -> Result<Vec<NaiveDateTime>> {
        let units = attr_str(var, "units")
            .ok_or_else(|| GridError::InvalidTimeUnits(format!("<no units on '{}'>", var.name())))?;
        let decoder = CfTimeUnits::parse(&units)?;

        var.get_values::<f64, _>(..)?
            .into_iter()
            .map(|raw| {
                decoder
                    .decode(raw)
                    .ok_or_else(|| GridError::InvalidTimeUnits(format!("{} (value {})", units, raw)))
            })
            .collect()
    }

    fn read_values(var: &Variable) -> Result<Vec<f64>> {
        let fill = attr_f64(var, "_FillValue").or_else(|| attr_f64(var, "missing_value"));
        let scale = attr_f64(var, "scale_factor").unwrap_or(1.0);
        let offset = attr_f64(var, "add_offset").unwrap_or(0.0);

        let mut values = var.get_values::<f64, _>(..)?;
        let mut missing = 0usize;
        for v in values.iter_mut() {
            if fill.is_some_and(|f| *v == f) {
                *v = f64::NAN;
                missing += 1;
            } else {
                *v = *v * scale + offset;
            }
        }
        if missing > 0 {
            debug!("{}: {} fill values replaced by NaN", var.name(), missing);
        }

        Ok(values)
    }

    fn swap_spatial_axes(values: &[f64], steps: usize, n1: usize, n2: usize) -> Vec<f64> {
        let n = n1 * n2;
        let mut out = vec![f64::NAN; values.len()];
        for t in 0..steps {
            for i in 0..n1 {
                for j in 0..n2 {
                    out[t * n + j * n1 + i] = values[t * n + i * n2 + j];
                }
            }
        }
        out
    }

    fn attr_f64(var: &Variable, name: &str) -> Option<f64> {
        match var.attribute(name)?.value().ok()? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(v as f64),
            AttributeValue::Doubles(v) => v.first().copied(),
            AttributeValue::Floats(v) => v.first().map(|&x| x as f64),
            AttributeValue::Int(v) => Some(v as f64),
            AttributeValue::Short(v) => Some(v as f64),
            AttributeValue::Longlong(v) => Some(v as f64),
            _ => None,
        }
    }

    fn attr_str(var: &Variable, name: &str) -> Option<String> {
        match var.attribute(name)?.value().ok()? {
            AttributeValue::Str(s) => Some(s),
            AttributeValue::Strs(v) => v.into_iter().next(),
            _ => None,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_swap_spatial_axes() {
            // one step, stored as 2 lons x 3 lats
            let stored = vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
            let swapped = swap_spatial_axes(&stored, 1, 2, 3);
            // now 3 lats x 2 lons
            assert_eq!(swapped, vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0]);
        }

        #[test]
        fn test_dims_are() {
            let dims = vec!["lat".to_string(), "lon".to_string()];
            assert!(dims_are(&dims, &["lat", "lon"]));
            assert!(!dims_are(&dims, &["lon", "lat"]));
            assert!(!dims_are(&dims, &["lat"]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_matches_easygsh() {
        let spec = DatasetSpec::default();
        assert_eq!(spec.variable, "Mesh2_face_Wasserstand_2d");
        assert_eq!(spec.time_dimension, "nMesh2_data_time");
        assert!(spec.time_variable.is_none());
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_open_without_backend_fails_fast() {
        let err = open_dataset("any.nc", &DatasetSpec::default()).unwrap_err();
        assert!(matches!(err, crate::GridError::BackendUnavailable));
        assert!(!backend_available());
    }
}
