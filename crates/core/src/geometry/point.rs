//! Point primitive

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use crate::crs::CRS;
use crate::error::{Error, Result};

/// An immutable 2D or 3D position with optional CRS tag and identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
    z: Option<f64>,
    crs: Option<CRS>,
    id: Option<String>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            crs: None,
            id: None,
        }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            crs: None,
            id: None,
        }
    }

    /// Build a point from an ordinate slice of length 2 or 3
    pub fn from_ordinates(ordinates: &[f64]) -> Result<Self> {
        match *ordinates {
            [x, y] => Ok(Self::new(x, y)),
            [x, y, z] => Ok(Self::new_3d(x, y, z)),
            _ => Err(Error::InvalidGeometry(format!(
                "a point needs 2 or 3 ordinates, got {}",
                ordinates.len()
            ))),
        }
    }

    pub fn with_crs(mut self, crs: CRS) -> Self {
        self.crs = Some(crs);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    /// Coordinate dimension (2 or 3)
    pub fn dim(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Planar coordinate
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Exact equality of x and y. No tolerance is applied.
    pub fn coincides(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Exact equality of all ordinates, ignoring CRS and identifier
    pub fn same_position(&self, other: &Point) -> bool {
        self.coincides(other) && self.z == other.z
    }

    /// Planar Euclidean distance
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<Coord<f64>> for Point {
    fn from(c: Coord<f64>) -> Self {
        Point::new(c.x, c.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ordinates() {
        assert_eq!(Point::from_ordinates(&[1.0, 2.0]).unwrap().dim(), 2);
        assert_eq!(Point::from_ordinates(&[1.0, 2.0, 3.0]).unwrap().z(), Some(3.0));
        assert!(Point::from_ordinates(&[1.0]).is_err());
        assert!(Point::from_ordinates(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn test_coincides_is_exact() {
        let a = Point::new(1.0, 2.0).with_id("a");
        let b = Point::new(1.0, 2.0).with_crs(CRS::wgs84());
        assert!(a.coincides(&b));
        assert!(a.same_position(&b));
        assert_ne!(a, b);

        let c = Point::new(1.0 + f64::EPSILON, 2.0);
        assert!(!a.coincides(&c));
    }

    #[test]
    fn test_same_position_compares_z() {
        let a = Point::new_3d(0.0, 0.0, 1.0);
        let b = Point::new_3d(0.0, 0.0, 2.0);
        assert!(a.coincides(&b));
        assert!(!a.same_position(&b));
    }
}
