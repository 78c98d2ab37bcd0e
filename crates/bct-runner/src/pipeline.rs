//! The generation pipeline: parameters, coordinates, series, output.

use crate::config::{ConfigError, JobConfig};
use bct_common::{load_boundary_pairs, BoundaryPair, CommonError, LocatedPoint};
use bct_format::{BctWriter, BoundarySection, FormatError, TimeAxis};
use bct_geo::GeoError;
use bct_grid::{
    backend_available, extract_series, minutes_after, open_dataset, GridError, SeriesAlignment,
    TimeWindow, WaterLevelGrid,
};
use bct_mdf::{MdfError, ModelParameters};
use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from a generation run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("model parameters: {0}")]
    Mdf(#[from] MdfError),

    #[error("boundary table: {0}")]
    Boundary(#[from] CommonError),

    #[error("coordinates: {0}")]
    Geo(#[from] GeoError),

    #[error("water levels: {0}")]
    Grid(#[from] GridError),

    #[error("output: {0}")]
    Format(#[from] FormatError),

    /// A time axis offset does not map to a representable timestamp.
    #[error("time offset {minutes} min after {origin} is out of range")]
    TimeOutOfRange {
        origin: NaiveDateTime,
        minutes: f64,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub sections: usize,
    pub records_in_table: usize,
    /// `YYYYMMDD` written to every header.
    pub reference_date: String,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} boundary sections with {} records each to {} (reference date {})",
            self.sections,
            self.records_in_table,
            self.output.display(),
            self.reference_date
        )
    }
}

/// Inputs read before the dataset is touched.
struct Prepared {
    params: ModelParameters,
    pairs: Vec<BoundaryPair<LocatedPoint>>,
    axis: TimeAxis,
    window: TimeWindow,
}

/// Run the whole pipeline and write the `.bct` file.
pub fn generate_bct(config: &JobConfig) -> Result<RunSummary> {
    config.validate()?;
    if !backend_available() {
        return Err(GridError::BackendUnavailable.into());
    }

    let prepared = prepare(config)?;

    info!("Opening dataset {}", config.dataset.display());
    let grid = open_dataset(&config.dataset, &config.variables)?;

    emit(config, prepared, &grid)
}

/// Run the pipeline against a grid that is already in memory.
///
/// `config.dataset` and `config.variables` are ignored.
pub fn generate_bct_with_grid(config: &JobConfig, grid: &WaterLevelGrid) -> Result<RunSummary> {
    config.validate()?;
    let prepared = prepare(config)?;
    emit(config, prepared, grid)
}

fn prepare(config: &JobConfig) -> Result<Prepared> {
    let params = ModelParameters::load(&config.mdf)?;
    info!(
        "Model runs from {} to {} min after {}",
        params.start, params.stop, params.reference_date
    );

    let pairs = load_boundary_pairs(&config.boundaries)?;
    let pairs = config.utm_zone.locate_pairs(pairs)?;
    info!(
        "Loaded {} boundary sections from {} (UTM zone {})",
        pairs.len(),
        config.boundaries.display(),
        config.utm_zone
    );

    let axis = TimeAxis::new(params.start, params.stop, config.step)?;
    let window = TimeWindow::parse(&config.window_start, &config.window_end)?;

    Ok(Prepared {
        params,
        pairs,
        axis,
        window,
    })
}

fn emit(config: &JobConfig, prepared: Prepared, grid: &WaterLevelGrid) -> Result<RunSummary> {
    let Prepared {
        params,
        pairs,
        axis,
        window,
    } = prepared;

    let windowed = grid
        .select_window(&window)?
        .with_max_distance(config.max_distance_deg);
    info!(
        "Time window {} .. {}: {} dataset steps for {} records",
        window.start,
        window.end,
        windowed.time_len(),
        axis.len()
    );
    if config.alignment == SeriesAlignment::ByIndex && windowed.time_len() > axis.len() {
        warn!(
            "Time window holds {} steps but the table has {} records; later steps are ignored",
            windowed.time_len(),
            axis.len()
        );
    }

    let points: Vec<LocatedPoint> = pairs
        .iter()
        .flat_map(|pair| [pair.end_a.clone(), pair.end_b.clone()])
        .collect();
    let series = extract_series(&windowed, &points)?;

    let origin = params.reference_date.date().and_time(NaiveTime::MIN);
    let row_times = axis
        .values()
        .iter()
        .map(|&minutes| {
            minutes_after(origin, minutes).ok_or(PipelineError::TimeOutOfRange { origin, minutes })
        })
        .collect::<Result<Vec<_>>>()?;

    let sections = pairs
        .iter()
        .zip(series.chunks_exact(2))
        .map(|(pair, ends)| -> Result<BoundarySection> {
            let level_a = ends[0].align(windowed.times(), &row_times, config.alignment)?;
            let level_b = ends[1].align(windowed.times(), &row_times, config.alignment)?;
            debug!(
                "Section {}: end A cell {}, end B cell {}",
                pair.section, ends[0].cell, ends[1].cell
            );
            Ok(BoundarySection::new(pair.section.clone(), &axis, level_a, level_b)?)
        })
        .collect::<Result<Vec<_>>>()?;

    let output = config.output_path();
    let reference_date = params.reference_date.token();
    let writer = BctWriter::new(reference_date.clone(), config.formatter()?);
    writer.write_file(&output, &sections)?;

    let summary = RunSummary {
        output,
        sections: sections.len(),
        records_in_table: axis.len(),
        reference_date,
    };
    info!("{}", summary);
    Ok(summary)
}
