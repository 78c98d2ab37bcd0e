//! Example: Inspect a water-level dataset and look up one coordinate.
//!
//! Usage: cargo run --example inspect_dataset -- <file.nc> <lat> <lon> [variable]

use bct_common::GeoCoord;
use bct_grid::{open_dataset, CellLayout, DatasetSpec};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <file.nc> <lat> <lon> [variable]", args[0]);
        eprintln!("Example: {} easygsh_2015.nc 54.05 8.12", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    let lat: f64 = args[2].parse().expect("Invalid latitude");
    let lon: f64 = args[3].parse().expect("Invalid longitude");

    let mut spec = DatasetSpec::default();
    if let Some(variable) = args.get(4) {
        spec.variable = variable.clone();
    }

    println!("Reading '{}' from {}...", spec.variable, path);
    let start = Instant::now();
    let grid = match open_dataset(path, &spec) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("Loaded in {:.3}s", start.elapsed().as_secs_f64());

    let kind = match grid.layout() {
        CellLayout::Rectilinear { lats, lons } => format!("rectilinear {}x{}", lats.len(), lons.len()),
        CellLayout::Unstructured { lats, .. } => format!("unstructured, {} cells", lats.len()),
    };
    println!("Layout: {}", kind);
    if let Some((first, last)) = grid.time_range() {
        println!("Time: {} steps, {} to {}", grid.time_len(), first, last);
    }

    let coord = GeoCoord::new(lat, lon);
    match grid.nearest_cell(coord) {
        Ok(cell) => {
            let series = grid.series(cell);
            let valid: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
            println!(
                "Nearest cell to ({}, {}): {} at {:?} ({:.4} deg away)",
                lat,
                lon,
                cell,
                grid.layout().cell_coord(cell),
                grid.distance_to_cell(coord, cell)
            );
            if !valid.is_empty() {
                let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
                let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                println!(
                    "Water level: min {:.3} m, max {:.3} m, {} missing",
                    min,
                    max,
                    series.len() - valid.len()
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
