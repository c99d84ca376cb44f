//! Vector geometry model
//!
//! Geometries are immutable values. The set of kinds is closed, so
//! consumers dispatch with an exhaustive `match` on [`Geometry`].

mod curve;
mod envelope;
mod point;
mod ring;
mod surface;

pub use curve::{ArcSegment, ArcStringSegment, Curve, CurveSegment, LineStringSegment};
pub use envelope::Envelope;
pub use point::Point;
pub use ring::Ring;
pub use surface::{PolygonPatch, Solid, Surface};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate of primitives forming one connected primitive of higher order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGeometry {
    pub id: Option<String>,
    pub members: Vec<Geometry>,
}

/// Unconstrained collection of geometries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiGeometry {
    pub id: Option<String>,
    pub members: Vec<Geometry>,
}

impl CompositeGeometry {
    pub fn new(members: Vec<Geometry>) -> Self {
        Self { id: None, members }
    }
}

impl MultiGeometry {
    pub fn new(members: Vec<Geometry>) -> Self {
        Self { id: None, members }
    }
}

/// Any geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Curve(Curve),
    Ring(Ring),
    Surface(Surface),
    Solid(Solid),
    Composite(CompositeGeometry),
    Multi(MultiGeometry),
}

/// Discriminant of [`Geometry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    Curve,
    Ring,
    Surface,
    Solid,
    Composite,
    Multi,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::Curve => "Curve",
            GeometryKind::Ring => "Ring",
            GeometryKind::Surface => "Surface",
            GeometryKind::Solid => "Solid",
            GeometryKind::Composite => "CompositeGeometry",
            GeometryKind::Multi => "MultiGeometry",
        };
        f.write_str(name)
    }
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Curve(_) => GeometryKind::Curve,
            Geometry::Ring(_) => GeometryKind::Ring,
            Geometry::Surface(_) => GeometryKind::Surface,
            Geometry::Solid(_) => GeometryKind::Solid,
            Geometry::Composite(_) => GeometryKind::Composite,
            Geometry::Multi(_) => GeometryKind::Multi,
        }
    }

    /// Envelope of all control points, `None` for geometries without any.
    ///
    /// Arcs are bounded by their control points only.
    pub fn envelope(&self) -> Option<Envelope> {
        let xy = |p: &Point| (p.x(), p.y());
        match self {
            Geometry::Point(p) => Envelope::from_points([xy(p)]),
            Geometry::Curve(c) => Envelope::from_points(c.control_points().map(xy)),
            Geometry::Ring(r) => Envelope::from_points(r.control_points().map(xy)),
            Geometry::Surface(s) => surface_envelope(s),
            Geometry::Solid(s) => s
                .exterior()
                .into_iter()
                .chain(s.interiors())
                .filter_map(surface_envelope)
                .reduce(|a, b| a.merge(&b)),
            Geometry::Composite(CompositeGeometry { members, .. })
            | Geometry::Multi(MultiGeometry { members, .. }) => members
                .iter()
                .filter_map(Geometry::envelope)
                .reduce(|a, b| a.merge(&b)),
        }
    }
}

fn surface_envelope(surface: &Surface) -> Option<Envelope> {
    let points = surface
        .patches()
        .iter()
        .flat_map(|p| p.exterior().into_iter().chain(p.interiors()))
        .flat_map(Ring::control_points)
        .map(|p| (p.x(), p.y()));
    Envelope::from_points(points)
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Geometry::Point(p)
    }
}

impl From<Curve> for Geometry {
    fn from(c: Curve) -> Self {
        Geometry::Curve(c)
    }
}

impl From<Ring> for Geometry {
    fn from(r: Ring) -> Self {
        Geometry::Ring(r)
    }
}

impl From<Surface> for Geometry {
    fn from(s: Surface) -> Self {
        Geometry::Surface(s)
    }
}

impl From<Solid> for Geometry {
    fn from(s: Solid) -> Self {
        Geometry::Solid(s)
    }
}
