//! Simulation parameters consumed by the BCT generator.

use crate::{MdfError, MdfFile, Result};
use chrono::NaiveDate;
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const KEY_TSTART: &str = "Tstart";
pub const KEY_TSTOP: &str = "Tstop";
pub const KEY_ITDATE: &str = "Itdate";
pub const KEY_TUNIT: &str = "Tunit";

/// Reference date of a model run, written to BCT headers as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceDate(NaiveDate);

impl ReferenceDate {
    /// Reference date from a calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse an `Itdate` value as found in an MDF file.
    ///
    /// The first character is a delimiter (`#` or a quote) and is skipped; the
    /// next ten characters hold the date. Hyphens and surrounding blanks are
    /// dropped and the remaining token must be eight digits forming a real
    /// calendar date.
    pub fn from_itdate(value: &str) -> Result<Self> {
        let window: String = value.chars().skip(1).take(10).collect();
        let token: String = window.chars().filter(|&c| c != '-').collect();
        let token = token.trim();

        if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MdfError::InvalidReferenceDate(value.to_string()));
        }

        NaiveDate::parse_from_str(token, "%Y%m%d")
            .map(Self)
            .map_err(|_| MdfError::InvalidReferenceDate(value.to_string()))
    }

    /// The calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The 8-digit `YYYYMMDD` token.
    pub fn token(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// Start/stop offsets (minutes after the reference date) and reference date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    pub start: f64,
    pub stop: f64,
    pub reference_date: ReferenceDate,
}

impl ModelParameters {
    /// Extract the parameters from parsed MDF entries.
    pub fn from_mdf(mdf: &MdfFile) -> Result<Self> {
        check_time_unit(mdf)?;

        let start = parse_number(KEY_TSTART, mdf.require(KEY_TSTART)?)?;
        let stop = parse_number(KEY_TSTOP, mdf.require(KEY_TSTOP)?)?;
        let reference_date = ReferenceDate::from_itdate(mdf.require(KEY_ITDATE)?)?;

        if start > stop {
            return Err(MdfError::InvertedTimeRange { start, stop });
        }

        Ok(Self {
            start,
            stop,
            reference_date,
        })
    }

    /// Read an MDF file and extract the parameters.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let params = Self::from_mdf(&MdfFile::from_path(path)?)?;
        debug!(
            "Model parameters from {}: Tstart={} Tstop={} Itdate={}",
            path.display(),
            params.start,
            params.stop,
            params.reference_date
        );
        Ok(params)
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MdfError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

/// BCT tables are written in minutes; reject models that run in another unit.
fn check_time_unit(mdf: &MdfFile) -> Result<()> {
    let Some(raw) = mdf.get(KEY_TUNIT) else {
        return Ok(());
    };

    let unit = raw.trim_matches(|c: char| c == '#' || c == '\'' || c == '"' || c.is_whitespace());
    if unit.eq_ignore_ascii_case("m") {
        Ok(())
    } else {
        Err(MdfError::UnsupportedTimeUnit(raw.to_string()))
    }
}
