//! Rings: curves expected to be closed

use serde::{Deserialize, Serialize};

use super::{Curve, CurveSegment, Point};
use crate::crs::CRS;
use crate::error::{Error, Result};

/// A ring built from one or more member curves, concatenated in order.
///
/// Closure (start == end) is expected but not enforced, so that unclosed
/// rings can be represented and reported by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRing")]
pub struct Ring {
    id: Option<String>,
    crs: Option<CRS>,
    members: Vec<Curve>,
}

impl Ring {
    pub fn new(members: Vec<Curve>) -> Result<Self> {
        if members.is_empty() {
            return Err(Error::InvalidGeometry("a ring needs at least one member curve".into()));
        }
        Ok(Self {
            id: None,
            crs: None,
            members,
        })
    }

    /// Single linear member through the given points
    pub fn linear<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        Self::new(vec![Curve::line_string(points)?])
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

    pub fn members(&self) -> &[Curve] {
        &self.members
    }

    /// Segments of all members, in traversal order
    pub fn segments(&self) -> impl Iterator<Item = &CurveSegment> + '_ {
        self.members.iter().flat_map(|m| m.segments().iter())
    }

    pub fn start_point(&self) -> &Point {
        self.members[0].start_point()
    }

    pub fn end_point(&self) -> &Point {
        self.members[self.members.len() - 1].end_point()
    }

    /// Start and end are the same position, z included
    pub fn is_closed(&self) -> bool {
        self.start_point().same_position(self.end_point())
    }

    pub fn control_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.members.iter().flat_map(|m| m.control_points())
    }

    /// The ring traversed in the opposite direction (start point is kept for closed rings)
    pub fn reversed(&self) -> Ring {
        Ring {
            id: self.id.clone(),
            crs: self.crs.clone(),
            members: self.members.iter().rev().map(Curve::reversed).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawRing {
    id: Option<String>,
    crs: Option<CRS>,
    members: Vec<Curve>,
}

impl TryFrom<RawRing> for Ring {
    type Error = Error;

    fn try_from(raw: RawRing) -> Result<Self> {
        let mut ring = Self::new(raw.members)?;
        ring.id = raw.id;
        ring.crs = raw.crs;
        Ok(ring)
    }
}
