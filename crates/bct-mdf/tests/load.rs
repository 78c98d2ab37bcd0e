//! Loading model parameters from MDF files on disk.

use bct_mdf::{MdfError, ModelParameters};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_delft3d_style_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(
        b"Ident  = #Delft3D-FLOW 3.59.01.57433#\r\n\
          Runtxt = #Elbe estuary, spring tide     #\r\n\
          Itdate = #2015-01-01#\r\n\
          Tunit  = #M#\r\n\
          Tstart =  0.0000000e+000\r\n\
          Tstop  =  4.3200000e+004\r\n\
          Dt     = 0.5\r\n",
    )
    .unwrap();
    file.flush().unwrap();

    let params = ModelParameters::load(file.path()).expect("Failed to load parameters");

    assert_eq!(params.start, 0.0);
    assert_eq!(params.stop, 43200.0);
    assert_eq!(params.reference_date.token(), "20150101");
}

#[test]
fn test_load_latin1_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    // 0xFC is 'ü' in Latin-1 and not valid UTF-8 on its own
    file.write_all(b"Runtxt = #L\xFCneburg#\nItdate = #2020-06-15#\nTstart = 60\nTstop = 120\n")
        .unwrap();
    file.flush().unwrap();

    let params = ModelParameters::load(file.path()).expect("Failed to load parameters");
    assert_eq!(params.reference_date.token(), "20200615");
    assert_eq!(params.start, 60.0);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ModelParameters::load(dir.path().join("absent.mdf"));
    assert!(matches!(result, Err(MdfError::Io { .. })));
}

#[test]
fn test_load_missing_itdate() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "Tstart = 0.0").unwrap();
    writeln!(file, "Tstop = 100.0").unwrap();
    file.flush().unwrap();

    let err = ModelParameters::load(file.path()).unwrap_err();
    assert!(matches!(err, MdfError::MissingKey("Itdate")));
    assert_eq!(err.to_string(), "model definition file has no 'Itdate' entry");
}
