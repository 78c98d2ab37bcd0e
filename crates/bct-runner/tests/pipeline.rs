//! End-to-end runs against in-memory grids.

use approx::assert_relative_eq;
use bct_common::GeoCoord;
use bct_format::NanPolicy;
use bct_geo::{utm_to_lat_lon, UtmZone};
use bct_grid::{CellLayout, GridError, SeriesAlignment, WaterLevelGrid};
use bct_runner::{generate_bct_with_grid, JobConfig, PipelineError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MDF: &str = "Ident  = #Delft3D-FLOW 3.59.01.57433#\r\n\
Itdate = #2015-01-01#\r\n\
Tunit  = #M#\r\n\
Tstart =  0.0000000e+000\r\n\
Tstop  =  6.0000000e+001\r\n\
Dt     = 1\r\n";

const POINTS: &[(&str, f64, f64)] = &[
    ("North_a", 450_000.0, 5_990_000.0),
    ("North_b", 460_000.0, 5_990_000.0),
    ("West_a", 430_000.0, 5_970_000.0),
    ("West_b", 430_000.0, 5_980_000.0),
];

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn write_inputs(dir: &Path, rows: &[(&str, f64, f64)]) -> JobConfig {
    let mdf = dir.join("elbe.mdf");
    fs::write(&mdf, MDF).unwrap();

    let csv: String = rows
        .iter()
        .map(|(name, e, n)| format!("{},{},{}\n", name, e, n))
        .collect();
    let boundaries = dir.join("boundaries.csv");
    fs::write(&boundaries, csv).unwrap();

    JobConfig::new(
        boundaries,
        dir.join("unused.nc"),
        mdf,
        "2015-01-01 00:00",
        "2015-01-01 01:00",
        20.0,
    )
}

/// One cell exactly at every boundary point plus a far-away decoy, with
/// 20-minute steps from 2015-01-01 00:00. Level of cell `c` at step `t` is
/// `c + t / 100`.
fn grid(steps: usize) -> WaterLevelGrid {
    let zone = UtmZone::default();
    let mut coords: Vec<GeoCoord> = POINTS
        .iter()
        .map(|(_, e, n)| utm_to_lat_lon(*e, *n, zone).unwrap())
        .collect();
    coords.push(GeoCoord::new(50.0, 2.0));

    let layout = CellLayout::Unstructured {
        lats: coords.iter().map(|c| c.lat).collect(),
        lons: coords.iter().map(|c| c.lon).collect(),
    };
    let cells = coords.len();
    let times = (0..steps as i64).map(|i| t0() + Duration::minutes(20 * i)).collect();
    let values = (0..steps)
        .flat_map(|t| (0..cells).map(move |c| c as f64 + t as f64 / 100.0))
        .collect();
    WaterLevelGrid::new(times, layout, values).unwrap()
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .split("\r\n")
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_two_sections() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path(), POINTS);

    let summary = generate_bct_with_grid(&config, &grid(6)).unwrap();

    assert_eq!(summary.output, dir.path().join("elbe.bct"));
    assert_eq!(summary.sections, 2);
    assert_eq!(summary.records_in_table, 4);
    assert_eq!(summary.reference_date, "20150101");

    let lines = lines(&summary.output);
    assert_eq!(lines.len(), 2 * (11 + 4));
    assert_eq!(lines[2], "location             'North              '");
    assert_eq!(lines[4], "reference-time       20150101");
    assert_eq!(lines[10], "records-in-table     4");
    assert_eq!(lines[11], " 0.0000000e+000  0.0000000e+000  1.0000000e+000");
    assert_eq!(lines[14], " 6.0000000e+001  3.0000000e-002  1.0300000e+000");
    assert_eq!(lines[17], "location             'West              '");
    assert_eq!(lines[26], " 0.0000000e+000  2.0000000e+000  3.0000000e+000");
}

#[test]
fn test_single_pair_section() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(
        dir.path(),
        &[("P1a", 450_000.0, 5_990_000.0), ("P1b", 460_000.0, 5_990_000.0)],
    );

    let summary = generate_bct_with_grid(&config, &grid(6)).unwrap();
    assert_eq!(summary.sections, 1);

    let lines = lines(&summary.output);
    assert_eq!(lines[2], "location             'P1              '");
    let rows = &lines[11..];
    assert_eq!(rows.len(), summary.records_in_table);
    for row in rows {
        assert_eq!(row.split_whitespace().count(), 3);
    }

    let last: Vec<f64> = rows[rows.len() - 1]
        .split_whitespace()
        .map(|v| v.parse().unwrap())
        .collect();
    assert_relative_eq!(last[0], 60.0);
    assert_relative_eq!(last[1], 0.03, epsilon = 1e-9);
    assert_relative_eq!(last[2], 1.03, epsilon = 1e-9);
}

#[test]
fn test_rerun_overwrites() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path(), POINTS);

    let summary = generate_bct_with_grid(&config, &grid(6)).unwrap();
    let once = fs::metadata(&summary.output).unwrap().len();
    generate_bct_with_grid(&config, &grid(6)).unwrap();
    let twice = fs::metadata(&summary.output).unwrap().len();

    assert_eq!(once, twice);
}

#[test]
fn test_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(dir.path(), POINTS);
    config.output = Some(dir.path().join("custom.bct"));

    let summary = generate_bct_with_grid(&config, &grid(6)).unwrap();
    assert_eq!(summary.output, dir.path().join("custom.bct"));
    assert!(!dir.path().join("elbe.bct").exists());
}

#[test]
fn test_window_too_short_for_table() {
    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(dir.path(), POINTS);
    config.window_end = "2015-01-01 00:40".to_string();

    let err = generate_bct_with_grid(&config, &grid(6)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Grid(GridError::SeriesTooShort { needed: 4, available: 3, .. })
    ));
}

#[test]
fn test_nearest_time_alignment() {
    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(dir.path(), POINTS);
    config.alignment = SeriesAlignment::NearestTime;
    config.step = 10.0;

    let summary = generate_bct_with_grid(&config, &grid(6)).unwrap();
    assert_eq!(summary.records_in_table, 7);

    let lines = lines(&summary.output);
    // 10 min lies between the 0 and 20 min samples; the earlier one wins
    assert_eq!(lines[12], " 1.0000000e+001  0.0000000e+000  1.0000000e+000");
    assert_eq!(lines[13], " 2.0000000e+001  1.0000000e-002  1.0100000e+000");
}

#[test]
fn test_missing_levels() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path(), POINTS);

    let source = grid(4);
    let mut values: Vec<f64> = (0..4).flat_map(|t| step_values(&source, t)).collect();
    values[1] = f64::NAN; // North_b at 00:00
    let with_gap =
        WaterLevelGrid::new(source.times().to_vec(), source.layout().clone(), values).unwrap();

    let summary = generate_bct_with_grid(&config, &with_gap).unwrap();
    let lines = lines(&summary.output);
    assert_eq!(lines[11], " 0.0000000e+000  0.0000000e+000  0.0000000e+000");
    assert_eq!(lines[12], " 2.0000000e+001  1.0000000e-002  1.0100000e+000");

    let mut strict = config.clone();
    strict.nan_policy = NanPolicy::Reject;
    let err = generate_bct_with_grid(&strict, &with_gap).unwrap_err();
    assert!(matches!(err, PipelineError::Format(_)));
}

fn step_values(grid: &WaterLevelGrid, t: usize) -> Vec<f64> {
    (0..grid.cell_count()).map(|c| grid.series(c)[t]).collect()
}

#[test]
fn test_missing_mdf_key() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path(), POINTS);
    fs::write(&config.mdf, "Tstart = 0.0\nTstop = 60.0\n").unwrap();

    let err = generate_bct_with_grid(&config, &grid(6)).unwrap_err();
    assert!(matches!(err, PipelineError::Mdf(_)));
    assert!(err.to_string().contains("Itdate"));
    assert!(!config.output_path().exists());
}

#[test]
fn test_run_offset_beyond_calendar() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path(), POINTS);
    fs::write(
        &config.mdf,
        "Itdate = #2015-01-01#\nTstart = -1e15\nTstop = -1e15\n",
    )
    .unwrap();

    let err = generate_bct_with_grid(&config, &grid(6)).unwrap_err();
    assert!(matches!(err, PipelineError::TimeOutOfRange { .. }));
    assert!(!config.output_path().exists());
}

#[test]
fn test_unpaired_boundary_row() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path(), &POINTS[..3]);

    let err = generate_bct_with_grid(&config, &grid(6)).unwrap_err();
    assert!(matches!(err, PipelineError::Boundary(_)));
}

#[test]
fn test_point_outside_grid_reach() {
    let near = TempDir::new().unwrap();
    let mut config = write_inputs(near.path(), POINTS);
    config.max_distance_deg = Some(1e-6);
    assert!(generate_bct_with_grid(&config, &grid(6)).is_ok());

    // West_b moved 5 km away from its cell
    let far = TempDir::new().unwrap();
    let mut rows = POINTS.to_vec();
    rows[3] = ("West_b", 435_000.0, 5_980_000.0);
    let mut config = write_inputs(far.path(), &rows);
    config.max_distance_deg = Some(1e-6);

    let err = generate_bct_with_grid(&config, &grid(6)).unwrap_err();
    assert!(matches!(err, PipelineError::Grid(GridError::Point { .. })));
    assert!(err.to_string().contains("West_b"));
}

#[test]
fn test_invalid_coordinates() {
    let dir = TempDir::new().unwrap();
    let mut rows = POINTS.to_vec();
    rows[0] = ("North_a", 50.0, 5_990_000.0);
    let config = write_inputs(dir.path(), &rows);

    let err = generate_bct_with_grid(&config, &grid(6)).unwrap_err();
    assert!(matches!(err, PipelineError::Geo(_)));
}

#[test]
fn test_invalid_step_fails_before_reading_inputs() {
    let config = JobConfig::new("nope.csv", "nope.nc", "nope.mdf", "2015-01-01", "2015-01-02", 0.0);

    let err = generate_bct_with_grid(&config, &grid(2)).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
