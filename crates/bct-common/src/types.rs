//! Core boundary types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoCoord {
    /// Coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A boundary end point in projected (UTM) coordinates, as listed in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub name: String,
    /// Easting in meters.
    pub easting: f64,
    /// Northing in meters.
    pub northing: f64,
}

/// A boundary end point after projection to geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedPoint {
    pub name: String,
    pub coord: GeoCoord,
}

/// Which end of a boundary segment a point describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEnd {
    A,
    B,
}

impl PairEnd {
    /// The name suffix that marks this end.
    pub fn suffix(self) -> char {
        match self {
            PairEnd::A => 'a',
            PairEnd::B => 'b',
        }
    }
}

/// The two ends of one physical boundary segment.
///
/// Generic over the point representation so the same pairing survives the
/// projection step (`BoundaryPair<BoundaryPoint>` becomes
/// `BoundaryPair<LocatedPoint>`).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPair<P = BoundaryPoint> {
    /// Section identifier shared by both ends.
    pub section: String,
    pub end_a: P,
    pub end_b: P,
}

impl<P> BoundaryPair<P> {
    /// Transform both ends, keeping the section identifier.
    pub fn try_map<Q, E, F>(self, mut f: F) -> Result<BoundaryPair<Q>, E>
    where
        F: FnMut(P) -> Result<Q, E>,
    {
        Ok(BoundaryPair {
            section: self.section,
            end_a: f(self.end_a)?,
            end_b: f(self.end_b)?,
        })
    }

    /// Both ends in table order.
    pub fn ends(&self) -> [&P; 2] {
        [&self.end_a, &self.end_b]
    }
}
