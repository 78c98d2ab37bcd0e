//! Job configuration: YAML job files and command line overrides.

use bct_format::{NanPolicy, SciFormatter};
use bct_geo::{Hemisphere, UtmZone};
use bct_grid::{DatasetSpec, SeriesAlignment};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors in job configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read job file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse job file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required setting was given neither in the job file nor on the command line.
    #[error("missing required setting '{0}'")]
    MissingField(&'static str),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

fn default_precision() -> usize {
    7
}

fn default_exp_digits() -> usize {
    3
}

/// Everything needed for one `.bct` generation run.
///
/// ```yaml
/// boundaries: boundaries.csv
/// dataset: easygsh_2015.nc
/// mdf: elbe.mdf
/// window_start: 2015-01-01
/// window_end: 2015-01-31
/// step: 20
/// utm_zone: { number: 32, hemisphere: north }
/// nan_policy: reject
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Boundary table (CSV of name, easting, northing).
    pub boundaries: PathBuf,
    /// netCDF water-level dataset.
    pub dataset: PathBuf,
    /// Model definition file supplying `Tstart`, `Tstop` and `Itdate`.
    pub mdf: PathBuf,
    /// First dataset time step to use.
    pub window_start: String,
    /// Last dataset time step to use (inclusive).
    pub window_end: String,
    /// Output time step in minutes.
    pub step: f64,
    /// Output file; defaults to the MDF path with a `.bct` extension.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub utm_zone: UtmZone,
    /// Variable and dimension names inside the dataset.
    #[serde(default)]
    pub variables: DatasetSpec,
    #[serde(default)]
    pub nan_policy: NanPolicy,
    #[serde(default)]
    pub alignment: SeriesAlignment,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_exp_digits")]
    pub exp_digits: usize,
    /// Fail lookups whose nearest grid cell is farther than this (degrees).
    #[serde(default)]
    pub max_distance_deg: Option<f64>,
}

impl JobConfig {
    /// A job with the required settings and defaults for everything else.
    pub fn new(
        boundaries: impl Into<PathBuf>,
        dataset: impl Into<PathBuf>,
        mdf: impl Into<PathBuf>,
        window_start: impl Into<String>,
        window_end: impl Into<String>,
        step: f64,
    ) -> Self {
        Self {
            boundaries: boundaries.into(),
            dataset: dataset.into(),
            mdf: mdf.into(),
            window_start: window_start.into(),
            window_end: window_end.into(),
            step,
            output: None,
            utm_zone: UtmZone::default(),
            variables: DatasetSpec::default(),
            nan_policy: NanPolicy::default(),
            alignment: SeriesAlignment::default(),
            precision: default_precision(),
            exp_digits: default_exp_digits(),
            max_distance_deg: None,
        }
    }

    /// Load a YAML job file. Relative paths are taken relative to the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: JobConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        for p in [&mut self.boundaries, &mut self.dataset, &mut self.mdf] {
            *p = rebase_path(base, p);
        }
        if let Some(output) = self.output.as_mut() {
            *output = rebase_path(base, output);
        }
    }

    /// Where the `.bct` file is written.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.mdf.with_extension("bct"))
    }

    /// The number formatter described by this job.
    pub fn formatter(&self) -> Result<SciFormatter, ConfigError> {
        SciFormatter::new(self.precision, self.exp_digits, self.nan_policy)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check settings that can be checked without touching any input file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "step must be a positive number of minutes, got {}",
                self.step
            )));
        }
        if let Some(limit) = self.max_distance_deg {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "max_distance_deg must be positive, got {}",
                    limit
                )));
            }
        }
        self.utm_zone
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.formatter()?;
        Ok(())
    }
}

fn rebase_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Settings given on the command line. Each one that is set replaces the
/// job file's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobOverrides {
    pub boundaries: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub mdf: Option<PathBuf>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub step: Option<f64>,
    pub output: Option<PathBuf>,
    pub utm_zone: Option<u8>,
    pub hemisphere: Option<Hemisphere>,
    pub variable: Option<String>,
    pub time_dimension: Option<String>,
    pub nan_policy: Option<NanPolicy>,
    pub alignment: Option<SeriesAlignment>,
    pub precision: Option<usize>,
    pub exp_digits: Option<usize>,
    pub max_distance_deg: Option<f64>,
}

impl JobOverrides {
    /// Apply every set override to `config`.
    pub fn apply(self, config: &mut JobConfig) {
        if let Some(v) = self.boundaries {
            config.boundaries = v;
        }
        if let Some(v) = self.dataset {
            config.dataset = v;
        }
        if let Some(v) = self.mdf {
            config.mdf = v;
        }
        if let Some(v) = self.window_start {
            config.window_start = v;
        }
        if let Some(v) = self.window_end {
            config.window_end = v;
        }
        if let Some(v) = self.step {
            config.step = v;
        }
        if let Some(v) = self.output {
            config.output = Some(v);
        }
        if let Some(v) = self.utm_zone {
            config.utm_zone.number = v;
        }
        if let Some(v) = self.hemisphere {
            config.utm_zone.hemisphere = v;
        }
        if let Some(v) = self.variable {
            config.variables.variable = v;
        }
        if let Some(v) = self.time_dimension {
            config.variables.time_dimension = v;
        }
        if let Some(v) = self.nan_policy {
            config.nan_policy = v;
        }
        if let Some(v) = self.alignment {
            config.alignment = v;
        }
        if let Some(v) = self.precision {
            config.precision = v;
        }
        if let Some(v) = self.exp_digits {
            config.exp_digits = v;
        }
        if let Some(v) = self.max_distance_deg {
            config.max_distance_deg = Some(v);
        }
    }

    /// Build the final job: the job file (if any) with these overrides applied.
    ///
    /// Without a job file the required settings must all be present here.
    pub fn resolve(self, job_file: Option<&Path>) -> Result<JobConfig, ConfigError> {
        let mut config = match job_file {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::new(
                self.boundaries.clone().ok_or(ConfigError::MissingField("boundaries"))?,
                self.dataset.clone().ok_or(ConfigError::MissingField("dataset"))?,
                self.mdf.clone().ok_or(ConfigError::MissingField("mdf"))?,
                self.window_start.clone().ok_or(ConfigError::MissingField("window_start"))?,
                self.window_end.clone().ok_or(ConfigError::MissingField("window_end"))?,
                self.step.ok_or(ConfigError::MissingField("step"))?,
            ),
        };
        self.apply(&mut config);
        Ok(config)
    }
}
