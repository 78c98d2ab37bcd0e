//! Integration tests for loading boundary tables from disk.

use bct_common::{load_boundary_pairs, CommonError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_pairs_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "P1a,452301.5,5934120.0").unwrap();
    writeln!(file, "P1b,455880.2,5936002.7").unwrap();
    writeln!(file, "Elbe_a,490000.0,5930000.0").unwrap();
    writeln!(file, "Elbe_b,491000.0,5931000.0").unwrap();
    file.flush().unwrap();

    let pairs = load_boundary_pairs(file.path()).expect("Failed to load table");

    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].section, "P1");
    assert_eq!(pairs[0].end_a.easting, 452301.5);
    assert_eq!(pairs[0].end_b.northing, 5936002.7);
    assert_eq!(pairs[1].section, "Elbe");
}

#[test]
fn test_load_pairs_with_windows_line_endings() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"P1a,452301.5,5934120.0\r\nP1b,455880.2,5936002.7\r\n")
        .unwrap();
    file.flush().unwrap();

    let pairs = load_boundary_pairs(file.path()).expect("Failed to load table");
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].end_b.name, "P1b");
}

#[test]
fn test_load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");

    match load_boundary_pairs(&path) {
        Err(CommonError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected I/O error, got {:?}", other),
    }
}
