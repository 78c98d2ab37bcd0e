//! Loading and pairing of the boundary point table.

use crate::{BoundaryPair, BoundaryPoint, CommonError, PairEnd, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Characters that may separate a section stem from its `a`/`b` suffix.
const SUFFIX_SEPARATORS: [char; 4] = ['_', '-', '.', ' '];

/// Split a point name into its section identifier and end marker.
///
/// The trailing `a` or `b` is removed, followed by at most one separator
/// character. Returns `None` if the name has no valid suffix or nothing is
/// left after removing it.
///
/// ```
/// use bct_common::{section_name, PairEnd};
///
/// assert_eq!(section_name("P1a"), Some(("P1".to_string(), PairEnd::A)));
/// assert_eq!(section_name("North_b"), Some(("North".to_string(), PairEnd::B)));
/// assert_eq!(section_name("North"), None);
/// ```
pub fn section_name(name: &str) -> Option<(String, PairEnd)> {
    let (stem, end) = if let Some(stem) = name.strip_suffix('a') {
        (stem, PairEnd::A)
    } else if let Some(stem) = name.strip_suffix('b') {
        (stem, PairEnd::B)
    } else {
        return None;
    };

    let stem = stem
        .strip_suffix(|c: char| SUFFIX_SEPARATORS.contains(&c))
        .unwrap_or(stem);

    if stem.trim().is_empty() {
        return None;
    }

    Some((stem.to_string(), end))
}

/// Read boundary points from a headerless `name,easting,northing` CSV source.
///
/// Rows are returned in file order. Surrounding whitespace of every field is
/// ignored.
pub fn read_boundary_points<R: Read>(reader: R) -> Result<Vec<BoundaryPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for record in rdr.deserialize::<(String, f64, f64)>() {
        let (name, easting, northing) = record?;
        points.push(BoundaryPoint {
            name,
            easting,
            northing,
        });
    }

    Ok(points)
}

/// Read boundary points from a CSV file.
pub fn load_boundary_points<P: AsRef<Path>>(path: P) -> Result<Vec<BoundaryPoint>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CommonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = read_boundary_points(file)?;
    debug!("Read {} boundary points from {}", points.len(), path.display());
    Ok(points)
}

/// Group boundary points into `a`/`b` pairs.
///
/// Every `a` row must be immediately followed by the `b` row of the same
/// section. Sections keep the order of the table and must be unique.
pub fn pair_boundary_points(points: Vec<BoundaryPoint>) -> Result<Vec<BoundaryPair>> {
    if points.is_empty() {
        return Err(CommonError::EmptyTable);
    }

    let mut pairs = Vec::with_capacity(points.len() / 2);
    let mut seen = HashSet::new();
    let mut rows = points.into_iter().enumerate().map(|(i, p)| (i + 1, p));

    while let Some((row, end_a)) = rows.next() {
        let (section, end) = classify(row, &end_a.name)?;
        if end == PairEnd::B {
            return Err(CommonError::UnpairedEnd {
                row,
                name: end_a.name,
                missing: PairEnd::A.suffix(),
            });
        }

        let Some((row_b, end_b)) = rows.next() else {
            return Err(CommonError::UnpairedEnd {
                row,
                name: end_a.name,
                missing: PairEnd::B.suffix(),
            });
        };

        let (section_b, end) = classify(row_b, &end_b.name)?;
        if end == PairEnd::A {
            return Err(CommonError::UnpairedEnd {
                row,
                name: end_a.name,
                missing: PairEnd::B.suffix(),
            });
        }
        if section_b != section {
            return Err(CommonError::SectionMismatch {
                row: row_b,
                name_a: end_a.name,
                name_b: end_b.name,
            });
        }
        if !seen.insert(section.clone()) {
            return Err(CommonError::DuplicateSection(section));
        }

        pairs.push(BoundaryPair {
            section,
            end_a,
            end_b,
        });
    }

    Ok(pairs)
}

/// Read and pair a boundary table in one step.
pub fn load_boundary_pairs<P: AsRef<Path>>(path: P) -> Result<Vec<BoundaryPair>> {
    let points = load_boundary_points(path)?;
    pair_boundary_points(points)
}

fn classify(row: usize, name: &str) -> Result<(String, PairEnd)> {
    section_name(name).ok_or_else(|| CommonError::InvalidSuffix {
        row,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str) -> BoundaryPoint {
        BoundaryPoint {
            name: name.to_string(),
            easting: 500_000.0,
            northing: 5_900_000.0,
        }
    }

    #[test]
    fn test_section_name_variants() {
        assert_eq!(section_name("P1a"), Some(("P1".to_string(), PairEnd::A)));
        assert_eq!(section_name("P1b"), Some(("P1".to_string(), PairEnd::B)));
        assert_eq!(section_name("West-a"), Some(("West".to_string(), PairEnd::A)));
        assert_eq!(section_name("Elbe 2b"), Some(("Elbe 2".to_string(), PairEnd::B)));
        // Only one separator is removed.
        assert_eq!(section_name("x__a"), Some(("x_".to_string(), PairEnd::A)));
        assert_eq!(section_name("a"), None);
        assert_eq!(section_name("_b"), None);
        assert_eq!(section_name("P1c"), None);
        assert_eq!(section_name(""), None);
    }

    #[test]
    fn test_read_points_trims_fields() {
        let csv = "P1a, 452301.5 ,5934120.0\nP1b,455880.2,  5936002.7\n";
        let points = read_boundary_points(csv.as_bytes()).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "P1a");
        assert_eq!(points[0].easting, 452301.5);
        assert_eq!(points[1].northing, 5936002.7);
    }

    #[test]
    fn test_read_points_rejects_bad_number() {
        let csv = "P1a,east,5934120.0\n";
        let err = read_boundary_points(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CommonError::Csv(_)));
    }

    #[test]
    fn test_read_points_rejects_missing_column() {
        let csv = "P1a,452301.5\n";
        assert!(read_boundary_points(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_pair_in_order() {
        let pairs = pair_boundary_points(vec![
            point("North_a"),
            point("North_b"),
            point("South_a"),
            point("South_b"),
        ])
        .unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].section, "North");
        assert_eq!(pairs[0].end_a.name, "North_a");
        assert_eq!(pairs[0].end_b.name, "North_b");
        assert_eq!(pairs[1].section, "South");
    }

    #[test]
    fn test_pair_rejects_empty_table() {
        assert!(matches!(
            pair_boundary_points(Vec::new()),
            Err(CommonError::EmptyTable)
        ));
    }

    #[test]
    fn test_pair_rejects_leading_b() {
        let err = pair_boundary_points(vec![point("P1b"), point("P1a")]).unwrap_err();
        assert!(matches!(err, CommonError::UnpairedEnd { row: 1, missing: 'a', .. }));
    }

    #[test]
    fn test_pair_rejects_trailing_a() {
        let err = pair_boundary_points(vec![point("P1a"), point("P1b"), point("P2a")]).unwrap_err();
        assert!(matches!(err, CommonError::UnpairedEnd { row: 3, missing: 'b', .. }));
    }

    #[test]
    fn test_pair_rejects_a_followed_by_a() {
        let err = pair_boundary_points(vec![point("P1a"), point("P2a")]).unwrap_err();
        assert!(matches!(err, CommonError::UnpairedEnd { row: 1, missing: 'b', .. }));
    }

    #[test]
    fn test_pair_rejects_mismatched_sections() {
        let err = pair_boundary_points(vec![point("P1a"), point("P2b")]).unwrap_err();
        match err {
            CommonError::SectionMismatch { row, name_a, name_b } => {
                assert_eq!(row, 2);
                assert_eq!(name_a, "P1a");
                assert_eq!(name_b, "P2b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pair_rejects_duplicate_section() {
        let err = pair_boundary_points(vec![
            point("P1a"),
            point("P1b"),
            point("P1a"),
            point("P1b"),
        ])
        .unwrap_err();
        assert!(matches!(err, CommonError::DuplicateSection(ref s) if s == "P1"));
    }

    #[test]
    fn test_pair_rejects_invalid_suffix() {
        let err = pair_boundary_points(vec![point("Inflow"), point("P1b")]).unwrap_err();
        assert!(matches!(err, CommonError::InvalidSuffix { row: 1, .. }));
    }
}
