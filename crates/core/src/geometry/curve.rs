//! Curves and curve segments
//!
//! A [`Curve`] is an ordered sequence of [`CurveSegment`]s. Segment
//! continuity (the end of segment `i` coinciding with the start of segment
//! `i + 1`) is deliberately *not* enforced here: detecting broken curves is
//! the validator's job, so broken curves must be representable.

use serde::{Deserialize, Serialize};

use super::Point;
use crate::crs::CRS;
use crate::error::{Error, Result};

/// A polyline through two or more control points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoints")]
pub struct LineStringSegment {
    points: Vec<Point>,
}

impl LineStringSegment {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidGeometry(format!(
                "a line string segment needs at least 2 control points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Three points on a circle: start, an intermediate point and end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    points: [Point; 3],
}

impl ArcSegment {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            points: [p1, p2, p3],
        }
    }

    pub fn p1(&self) -> &Point {
        &self.points[0]
    }

    pub fn p2(&self) -> &Point {
        &self.points[1]
    }

    pub fn p3(&self) -> &Point {
        &self.points[2]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A chain of arcs, each consecutive triple `(2k, 2k+1, 2k+2)` defining one arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoints")]
pub struct ArcStringSegment {
    points: Vec<Point>,
}

impl ArcStringSegment {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 || points.len() % 2 == 0 {
            return Err(Error::InvalidGeometry(format!(
                "an arc string needs an odd number (>= 3) of control points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Serialized control points, checked by the segment constructors
#[derive(Deserialize)]
struct RawPoints {
    points: Vec<Point>,
}

impl TryFrom<RawPoints> for LineStringSegment {
    type Error = Error;

    fn try_from(raw: RawPoints) -> Result<Self> {
        Self::new(raw.points)
    }
}

impl TryFrom<RawPoints> for ArcStringSegment {
    type Error = Error;

    fn try_from(raw: RawPoints) -> Result<Self> {
        Self::new(raw.points)
    }
}

/// One piece of a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveSegment {
    LineString(LineStringSegment),
    Arc(ArcSegment),
    /// Full circle through three points, starting and ending at the first one
    Circle(ArcSegment),
    ArcString(ArcStringSegment),
}

impl CurveSegment {
    /// Convenience constructor for a line string segment
    pub fn line_string<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        let points = points.into_iter().map(Into::into).collect();
        LineStringSegment::new(points).map(CurveSegment::LineString)
    }

    pub fn arc(p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) -> Self {
        CurveSegment::Arc(ArcSegment::new(p1.into(), p2.into(), p3.into()))
    }

    pub fn circle(p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) -> Self {
        CurveSegment::Circle(ArcSegment::new(p1.into(), p2.into(), p3.into()))
    }

    pub fn arc_string<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        let points = points.into_iter().map(Into::into).collect();
        ArcStringSegment::new(points).map(CurveSegment::ArcString)
    }

    /// Control points as stored
    pub fn control_points(&self) -> &[Point] {
        match self {
            CurveSegment::LineString(s) => s.points(),
            CurveSegment::Arc(a) | CurveSegment::Circle(a) => a.points(),
            CurveSegment::ArcString(s) => s.points(),
        }
    }

    pub fn start_point(&self) -> &Point {
        &self.control_points()[0]
    }

    pub fn end_point(&self) -> &Point {
        match self {
            CurveSegment::Circle(a) => a.p1(),
            _ => {
                let pts = self.control_points();
                &pts[pts.len() - 1]
            }
        }
    }

    /// True for segments made of straight lines only
    pub fn is_linear(&self) -> bool {
        matches!(self, CurveSegment::LineString(_))
    }

    /// The same segment traversed in the opposite direction
    pub fn reversed(&self) -> CurveSegment {
        match self {
            CurveSegment::LineString(s) => {
                let mut points = s.points.clone();
                points.reverse();
                CurveSegment::LineString(LineStringSegment { points })
            }
            CurveSegment::Arc(a) => CurveSegment::Arc(ArcSegment::new(
                a.p3().clone(),
                a.p2().clone(),
                a.p1().clone(),
            )),
            CurveSegment::Circle(a) => CurveSegment::Circle(ArcSegment::new(
                a.p1().clone(),
                a.p3().clone(),
                a.p2().clone(),
            )),
            CurveSegment::ArcString(s) => {
                let mut points = s.points.clone();
                points.reverse();
                CurveSegment::ArcString(ArcStringSegment { points })
            }
        }
    }
}

/// An ordered, non-empty sequence of curve segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct Curve {
    id: Option<String>,
    crs: Option<CRS>,
    segments: Vec<CurveSegment>,
}

impl Curve {
    pub fn new(segments: Vec<CurveSegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::InvalidGeometry("a curve needs at least one segment".into()));
        }
        Ok(Self {
            id: None,
            crs: None,
            segments,
        })
    }

    /// Single-segment curve through the given points
    pub fn line_string<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        Self::new(vec![CurveSegment::line_string(points)?])
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

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn start_point(&self) -> &Point {
        self.segments[0].start_point()
    }

    pub fn end_point(&self) -> &Point {
        self.segments[self.segments.len() - 1].end_point()
    }

    /// Start and end are the same position, z included
    pub fn is_closed(&self) -> bool {
        self.start_point().same_position(self.end_point())
    }

    /// All control points of all segments, in order
    pub fn control_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.segments.iter().flat_map(|s| s.control_points().iter())
    }

    /// The same curve traversed in the opposite direction
    pub fn reversed(&self) -> Curve {
        Curve {
            id: self.id.clone(),
            crs: self.crs.clone(),
            segments: self.segments.iter().rev().map(CurveSegment::reversed).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawCurve {
    id: Option<String>,
    crs: Option<CRS>,
    segments: Vec<CurveSegment>,
}

impl TryFrom<RawCurve> for Curve {
    type Error = Error;

    fn try_from(raw: RawCurve) -> Result<Self> {
        let mut curve = Self::new(raw.segments)?;
        curve.id = raw.id;
        curve.crs = raw.crs;
        Ok(curve)
    }
}
