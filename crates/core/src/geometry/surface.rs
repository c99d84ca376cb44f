//! Surfaces, polygon patches and solids

use serde::{Deserialize, Serialize};

use super::Ring;
use crate::crs::CRS;
use crate::error::{Error, Result};

/// A planar patch bounded by one exterior ring and zero or more holes.
///
/// The exterior is optional only so that malformed input coming from a
/// parser can be represented; every validity check requires it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonPatch {
    exterior: Option<Ring>,
    interiors: Vec<Ring>,
}

impl PolygonPatch {
    pub fn new(exterior: Option<Ring>, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.exterior.as_ref()
    }

    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    /// All rings reversed
    pub fn reversed(&self) -> PolygonPatch {
        PolygonPatch {
            exterior: self.exterior.as_ref().map(Ring::reversed),
            interiors: self.interiors.iter().map(Ring::reversed).collect(),
        }
    }
}

/// A surface made of one or more polygon patches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSurface")]
pub struct Surface {
    id: Option<String>,
    crs: Option<CRS>,
    patches: Vec<PolygonPatch>,
}

impl Surface {
    pub fn new(patches: Vec<PolygonPatch>) -> Result<Self> {
        if patches.is_empty() {
            return Err(Error::InvalidGeometry("a surface needs at least one patch".into()));
        }
        Ok(Self {
            id: None,
            crs: None,
            patches,
        })
    }

    /// Single-patch surface (a polygon)
    pub fn polygon(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            id: None,
            crs: None,
            patches: vec![PolygonPatch::new(Some(exterior), interiors)],
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_crs(mut self, crs: CRS) -> Self {
        self.crs = Some(crs);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn patches(&self) -> &[PolygonPatch] {
        &self.patches
    }
}

#[derive(Deserialize)]
struct RawSurface {
    id: Option<String>,
    crs: Option<CRS>,
    patches: Vec<PolygonPatch>,
}

impl TryFrom<RawSurface> for Surface {
    type Error = Error;

    fn try_from(raw: RawSurface) -> Result<Self> {
        let mut surface = Self::new(raw.patches)?;
        surface.id = raw.id;
        surface.crs = raw.crs;
        Ok(surface)
    }
}

/// A volume bounded by shells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    id: Option<String>,
    exterior: Option<Surface>,
    interiors: Vec<Surface>,
}

impl Solid {
    pub fn new(exterior: Option<Surface>, interiors: Vec<Surface>) -> Self {
        Self {
            id: None,
            exterior,
            interiors,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn exterior(&self) -> Option<&Surface> {
        self.exterior.as_ref()
    }

    pub fn interiors(&self) -> &[Surface] {
        &self.interiors
    }
}
