//! Coordinate Reference System tags
//!
//! Geometries only carry the CRS as an identifying tag; no reprojection
//! happens anywhere in this workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CRS {
    /// EPSG code if known
    epsg: Option<u32>,
    /// Free-form identifier (URN, WKT name, ...) when there is no EPSG code
    name: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            name: None,
        }
    }

    /// Create a CRS from an identifier.
    ///
    /// Identifiers of the form `EPSG:<code>` or `urn:ogc:def:crs:EPSG::<code>`
    /// are resolved to their EPSG code.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        match parse_epsg(&name) {
            Some(code) => Self::from_epsg(code),
            None => Self {
                epsg: None,
                name: Some(name),
            },
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get the free-form identifier
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if two CRS tags denote the same system
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        match (self.epsg, other.epsg) {
            (Some(a), Some(b)) => a == b,
            (None, None) => match (&self.name, &other.name) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            },
            _ => false,
        }
    }
}

fn parse_epsg(name: &str) -> Option<u32> {
    let upper = name.trim().to_ascii_uppercase();
    let code = upper
        .strip_prefix("EPSG:")
        .or_else(|| upper.strip_prefix("URN:OGC:DEF:CRS:EPSG::"))?;
    code.parse().ok()
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.epsg, &self.name) {
            (Some(code), _) => write!(f, "EPSG:{}", code),
            (None, Some(name)) => write!(f, "{}", name),
            (None, None) => write!(f, "Unknown CRS"),
        }
    }
}
