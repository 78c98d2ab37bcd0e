//! bctgen - write Delft3D water-level boundary files from netCDF data.

use bct_format::NanPolicy;
use bct_geo::Hemisphere;
use bct_grid::SeriesAlignment;
use bct_runner::{generate_bct, JobOverrides, PipelineError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bctgen")]
#[command(version)]
#[command(about = "Generate Delft3D .bct water-level boundary files from netCDF data")]
struct Cli {
    /// YAML job file; the options below override its values
    #[arg(short, long)]
    job: Option<PathBuf>,

    /// Boundary table (CSV: name, easting, northing)
    #[arg(short, long)]
    boundaries: Option<PathBuf>,

    /// netCDF water-level dataset
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Model definition file (Tstart, Tstop, Itdate)
    #[arg(short, long)]
    mdf: Option<PathBuf>,

    /// First dataset time step (YYYY-MM-DD[ HH:MM[:SS]])
    #[arg(long)]
    start: Option<String>,

    /// Last dataset time step, inclusive
    #[arg(long)]
    end: Option<String>,

    /// Output time step in minutes
    #[arg(long)]
    step: Option<f64>,

    /// Output file [default: MDF path with .bct extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// UTM zone number of the boundary coordinates [default: 32]
    #[arg(long)]
    utm_zone: Option<u8>,

    /// UTM hemisphere (N or S) [default: N]
    #[arg(long)]
    hemisphere: Option<Hemisphere>,

    /// Water-level variable in the dataset
    #[arg(long)]
    variable: Option<String>,

    /// Time dimension of the water-level variable
    #[arg(long)]
    time_dimension: Option<String>,

    /// How to write missing water levels
    #[arg(long, value_enum)]
    nan_policy: Option<NanArg>,

    /// How dataset samples are matched to table records
    #[arg(long, value_enum)]
    alignment: Option<AlignmentArg>,

    /// Mantissa decimals
    #[arg(long)]
    precision: Option<usize>,

    /// Exponent digits
    #[arg(long)]
    exp_digits: Option<usize>,

    /// Fail if a boundary point's nearest grid cell is farther than this (degrees)
    #[arg(long)]
    max_distance: Option<f64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NanArg {
    /// Write 0.0
    Zero,
    /// Abort the run
    Reject,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlignmentArg {
    /// i-th sample of the window for the i-th record
    Index,
    /// Sample nearest in time to each record
    Nearest,
}

impl Cli {
    fn overrides(&self) -> JobOverrides {
        JobOverrides {
            boundaries: self.boundaries.clone(),
            dataset: self.dataset.clone(),
            mdf: self.mdf.clone(),
            window_start: self.start.clone(),
            window_end: self.end.clone(),
            step: self.step,
            output: self.output.clone(),
            utm_zone: self.utm_zone,
            hemisphere: self.hemisphere,
            variable: self.variable.clone(),
            time_dimension: self.time_dimension.clone(),
            nan_policy: self.nan_policy.map(|p| match p {
                NanArg::Zero => NanPolicy::SubstituteZero,
                NanArg::Reject => NanPolicy::Reject,
            }),
            alignment: self.alignment.map(|a| match a {
                AlignmentArg::Index => SeriesAlignment::ByIndex,
                AlignmentArg::Nearest => SeriesAlignment::NearestTime,
            }),
            precision: self.precision,
            exp_digits: self.exp_digits,
            max_distance_deg: self.max_distance,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let config = cli.overrides().resolve(cli.job.as_deref())?;
    debug!("Job: {:?}", config);

    let summary = generate_bct(&config)?;
    println!("{}", summary);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
