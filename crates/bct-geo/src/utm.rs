//! Universal Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! Uses the classic series expansion (Snyder, "Map Projections - A Working
//! Manual", USGS PP 1395), which is accurate to well below a millimeter inside
//! a zone.

use crate::{GeoError, Result};
use bct_common::{BoundaryPair, BoundaryPoint, GeoCoord, LocatedPoint};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Scale factor on the central meridian.
const K0: f64 = 0.9996;
/// WGS84 semi-major axis in meters.
const R: f64 = 6_378_137.0;
/// WGS84 first eccentricity squared.
const E: f64 = 0.006_694_38;
const E2: f64 = E * E;
const E3: f64 = E2 * E;
/// Second eccentricity squared.
const E_P2: f64 = E / (1.0 - E);

const M1: f64 = 1.0 - E / 4.0 - 3.0 * E2 / 64.0 - 5.0 * E3 / 256.0;
const M2: f64 = 3.0 * E / 8.0 + 3.0 * E2 / 32.0 + 45.0 * E3 / 1024.0;
const M3: f64 = 15.0 * E2 / 256.0 + 45.0 * E3 / 1024.0;
const M4: f64 = 35.0 * E3 / 3072.0;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

const MIN_EASTING: f64 = 100_000.0;
const MAX_EASTING: f64 = 1_000_000.0;
const MIN_NORTHING: f64 = 0.0;
const MAX_NORTHING: f64 = 10_000_000.0;
const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hemisphere::North => write!(f, "N"),
            Hemisphere::South => write!(f, "S"),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Hemisphere::North),
            "s" | "south" => Ok(Hemisphere::South),
            _ => Err(GeoError::InvalidHemisphere(s.to_string())),
        }
    }
}

/// A UTM zone: number (1-60) and hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmZone {
    pub number: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hemisphere: Hemisphere,
}

impl Default for UtmZone {
    /// Zone 32 north, which covers the German Bight and the Elbe estuary.
    fn default() -> Self {
        Self {
            number: 32,
            hemisphere: Hemisphere::North,
        }
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.hemisphere)
    }
}

impl UtmZone {
    /// Create a validated zone.
    pub fn new(number: u8, hemisphere: Hemisphere) -> Result<Self> {
        let zone = Self { number, hemisphere };
        zone.validate()?;
        Ok(zone)
    }

    /// Check the zone number lies in 1..=60.
    pub fn validate(&self) -> Result<()> {
        if !(1..=60).contains(&self.number) {
            return Err(GeoError::InvalidZone(self.number));
        }
        Ok(())
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_longitude(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    /// Project every point of every pair, keeping order and names.
    pub fn locate_pairs(&self, pairs: Vec<BoundaryPair>) -> Result<Vec<BoundaryPair<LocatedPoint>>> {
        pairs
            .into_iter()
            .map(|pair| pair.try_map(|point| self.locate(point)))
            .collect()
    }

    /// Project a single named boundary point.
    pub fn locate(&self, point: BoundaryPoint) -> Result<LocatedPoint> {
        match utm_to_lat_lon(point.easting, point.northing, *self) {
            Ok(coord) => Ok(LocatedPoint {
                name: point.name,
                coord,
            }),
            Err(e) => Err(GeoError::Point {
                name: point.name,
                source: Box::new(e),
            }),
        }
    }
}

fn check_range(quantity: &'static str, value: f64, min: f64, max: f64, upper_strict: bool) -> Result<()> {
    let above = if upper_strict { value >= max } else { value > max };
    if !value.is_finite() || value < min || above {
        return Err(GeoError::OutOfRange {
            quantity,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Wrap an angle in radians to `[-PI, PI)`.
fn mod_angle(value: f64) -> f64 {
    (value + PI).rem_euclid(2.0 * PI) - PI
}

/// Convert UTM easting/northing in the given zone to latitude/longitude.
///
/// # Arguments
/// * `easting` - Easting in meters, in `[100000, 1000000)`
/// * `northing` - Northing in meters, in `[0, 10000000]`
/// * `zone` - Zone number and hemisphere
pub fn utm_to_lat_lon(easting: f64, northing: f64, zone: UtmZone) -> Result<GeoCoord> {
    zone.validate()?;
    check_range("easting", easting, MIN_EASTING, MAX_EASTING, true)?;
    check_range("northing", northing, MIN_NORTHING, MAX_NORTHING, false)?;

    let x = easting - FALSE_EASTING;
    let y = match zone.hemisphere {
        Hemisphere::North => northing,
        Hemisphere::South => northing - FALSE_NORTHING_SOUTH,
    };

    let sqrt_e = (1.0 - E).sqrt();
    let e1 = (1.0 - sqrt_e) / (1.0 + sqrt_e);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;
    let e1_5 = e1_4 * e1;

    let p2 = 3.0 / 2.0 * e1 - 27.0 / 32.0 * e1_3 + 269.0 / 512.0 * e1_5;
    let p3 = 21.0 / 16.0 * e1_2 - 55.0 / 32.0 * e1_4;
    let p4 = 151.0 / 96.0 * e1_3 - 417.0 / 128.0 * e1_5;
    let p5 = 1097.0 / 512.0 * e1_4;

    // Footpoint latitude
    let m = y / K0;
    let mu = m / (R * M1);
    let p_rad = mu
        + p2 * (2.0 * mu).sin()
        + p3 * (4.0 * mu).sin()
        + p4 * (6.0 * mu).sin()
        + p5 * (8.0 * mu).sin();

    let p_sin = p_rad.sin();
    let p_sin2 = p_sin * p_sin;
    let p_cos = p_rad.cos();
    let p_tan = p_sin / p_cos;
    let p_tan2 = p_tan * p_tan;
    let p_tan4 = p_tan2 * p_tan2;

    let ep_sin = 1.0 - E * p_sin2;
    let ep_sin_sqrt = ep_sin.sqrt();

    let n = R / ep_sin_sqrt;
    let r = (1.0 - E) / ep_sin;

    let c = E_P2 * p_cos * p_cos;
    let c2 = c * c;

    let d = x / (n * K0);
    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let latitude = p_rad
        - (p_tan / r)
            * (d2 / 2.0 - d4 / 24.0 * (5.0 + 3.0 * p_tan2 + 10.0 * c - 4.0 * c2 - 9.0 * E_P2))
        + d6 / 720.0 * (61.0 + 90.0 * p_tan2 + 298.0 * c + 45.0 * p_tan4 - 252.0 * E_P2 - 3.0 * c2);

    let longitude = (d - d3 / 6.0 * (1.0 + 2.0 * p_tan2 + c)
        + d5 / 120.0 * (5.0 - 2.0 * c + 28.0 * p_tan2 - 3.0 * c2 + 8.0 * E_P2 + 24.0 * p_tan4))
        / p_cos;
    let longitude = mod_angle(longitude + zone.central_longitude().to_radians());

    Ok(GeoCoord {
        lat: latitude.to_degrees(),
        lon: longitude.to_degrees(),
    })
}

/// Convert latitude/longitude to UTM easting/northing in the given zone.
///
/// The zone is not derived from the coordinate; points outside the zone's
/// longitude band are projected into it regardless.
pub fn lat_lon_to_utm(coord: GeoCoord, zone: UtmZone) -> Result<(f64, f64)> {
    zone.validate()?;
    check_range("latitude", coord.lat, MIN_LATITUDE, MAX_LATITUDE, false)?;
    check_range("longitude", coord.lon, -180.0, 180.0, false)?;

    let lat_rad = coord.lat.to_radians();
    let lat_sin = lat_rad.sin();
    let lat_cos = lat_rad.cos();
    let lat_tan = lat_sin / lat_cos;
    let lat_tan2 = lat_tan * lat_tan;
    let lat_tan4 = lat_tan2 * lat_tan2;

    let lon_rad = coord.lon.to_radians();
    let central_lon_rad = zone.central_longitude().to_radians();

    let n = R / (1.0 - E * lat_sin * lat_sin).sqrt();
    let c = E_P2 * lat_cos * lat_cos;

    let a = lat_cos * mod_angle(lon_rad - central_lon_rad);
    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let m = R
        * (M1 * lat_rad - M2 * (2.0 * lat_rad).sin() + M3 * (4.0 * lat_rad).sin()
            - M4 * (6.0 * lat_rad).sin());

    let easting = K0
        * n
        * (a + a3 / 6.0 * (1.0 - lat_tan2 + c)
            + a5 / 120.0 * (5.0 - 18.0 * lat_tan2 + lat_tan4 + 72.0 * c - 58.0 * E_P2))
        + FALSE_EASTING;

    let mut northing = K0
        * (m + n
            * lat_tan
            * (a2 / 2.0
                + a4 / 24.0 * (5.0 - lat_tan2 + 9.0 * c + 4.0 * c * c)
                + a6 / 720.0 * (61.0 - 58.0 * lat_tan2 + lat_tan4 + 600.0 * c - 330.0 * E_P2)));

    if zone.hemisphere == Hemisphere::South {
        northing += FALSE_NORTHING_SOUTH;
    }

    Ok((easting, northing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_central_longitude() {
        assert_eq!(UtmZone::default().central_longitude(), 9.0);
        assert_eq!(UtmZone::new(1, Hemisphere::North).unwrap().central_longitude(), -177.0);
        assert_eq!(UtmZone::new(60, Hemisphere::South).unwrap().central_longitude(), 177.0);
    }

    #[test]
    fn test_equator_on_central_meridian() {
        let coord = utm_to_lat_lon(500_000.0, 0.0, UtmZone::default()).unwrap();
        assert_abs_diff_eq!(coord.lat, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coord.lon, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_central_meridian_keeps_longitude() {
        let coord = utm_to_lat_lon(500_000.0, 5_900_000.0, UtmZone::default()).unwrap();
        assert_abs_diff_eq!(coord.lon, 9.0, epsilon = 1e-9);
        // 5900 km of meridian arc north of the equator is a little over 53 degrees
        assert!(coord.lat > 53.0 && coord.lat < 53.5, "lat = {}", coord.lat);
    }

    #[test]
    fn test_east_of_central_meridian() {
        let coord = utm_to_lat_lon(566_000.0, 5_934_000.0, UtmZone::default()).unwrap();
        assert!(coord.lon > 9.0 && coord.lon < 10.5, "lon = {}", coord.lon);
    }

    #[test]
    fn test_southern_hemisphere() {
        let zone = UtmZone::new(32, Hemisphere::South).unwrap();
        let coord = utm_to_lat_lon(500_000.0, 10_000_000.0, zone).unwrap();
        assert_abs_diff_eq!(coord.lat, 0.0, epsilon = 1e-9);

        let coord = utm_to_lat_lon(500_000.0, 5_000_000.0, zone).unwrap();
        assert!(coord.lat < -40.0);
    }

    #[test]
    fn test_round_trip() {
        let zone = UtmZone::default();
        for &(lat, lon) in &[(53.55, 9.99), (54.1, 7.9), (51.0, 11.5), (0.5, 8.0)] {
            let (e, n) = lat_lon_to_utm(GeoCoord::new(lat, lon), zone).unwrap();
            let back = utm_to_lat_lon(e, n, zone).unwrap();
            assert_abs_diff_eq!(back.lat, lat, epsilon = 1e-7);
            assert_abs_diff_eq!(back.lon, lon, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_out_of_range_easting() {
        let err = utm_to_lat_lon(50_000.0, 5_900_000.0, UtmZone::default()).unwrap_err();
        assert!(matches!(err, GeoError::OutOfRange { quantity: "easting", .. }));

        // Upper bound is exclusive
        assert!(utm_to_lat_lon(1_000_000.0, 5_900_000.0, UtmZone::default()).is_err());
    }

    #[test]
    fn test_out_of_range_northing() {
        let err = utm_to_lat_lon(500_000.0, -1.0, UtmZone::default()).unwrap_err();
        assert!(matches!(err, GeoError::OutOfRange { quantity: "northing", .. }));
        assert!(utm_to_lat_lon(500_000.0, f64::NAN, UtmZone::default()).is_err());
    }

    #[test]
    fn test_invalid_zone() {
        assert!(matches!(
            UtmZone::new(0, Hemisphere::North),
            Err(GeoError::InvalidZone(0))
        ));
        assert!(UtmZone::new(61, Hemisphere::North).is_err());
    }

    #[test]
    fn test_hemisphere_from_str() {
        assert_eq!("N".parse::<Hemisphere>().unwrap(), Hemisphere::North);
        assert_eq!("south".parse::<Hemisphere>().unwrap(), Hemisphere::South);
        assert!("east".parse::<Hemisphere>().is_err());
    }

    #[test]
    fn test_locate_pairs_keeps_names_and_order() {
        let pairs = vec![BoundaryPair {
            section: "P1".to_string(),
            end_a: BoundaryPoint {
                name: "P1a".to_string(),
                easting: 450_000.0,
                northing: 5_930_000.0,
            },
            end_b: BoundaryPoint {
                name: "P1b".to_string(),
                easting: 460_000.0,
                northing: 5_930_000.0,
            },
        }];

        let located = UtmZone::default().locate_pairs(pairs).unwrap();
        assert_eq!(located[0].section, "P1");
        assert_eq!(located[0].end_a.name, "P1a");
        assert_eq!(located[0].end_b.name, "P1b");
        // end B lies further east
        assert!(located[0].end_b.coord.lon > located[0].end_a.coord.lon);
    }

    #[test]
    fn test_locate_reports_point_name() {
        let err = UtmZone::default()
            .locate(BoundaryPoint {
                name: "Bad_a".to_string(),
                easting: 0.0,
                northing: 0.0,
            })
            .unwrap_err();
        assert!(err.to_string().contains("Bad_a"));
    }
}
