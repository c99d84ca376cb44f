//! Curve linearization
//!
//! Approximates arcs, circles and arc strings by straight line strings so
//! that planar predicates can run on them. Line string segments pass through
//! unchanged.
//!
//! Arcs are interpolated around the circumcentre of their three control
//! points. All arithmetic happens on coordinates shifted towards the origin
//! (by the midrange of the three points on each axis) and shifted back at the
//! end, which keeps projected coordinates in the millions well conditioned.

use serde::{Deserialize, Serialize};
use spatia_core::geometry::{Curve, CurveSegment, LineStringSegment, Ring};
use spatia_core::{Error, Point, Result};
use std::f64::consts::TAU;
use tracing::debug;

/// Twice the triangle area below which three points are treated as collinear
const COLLINEAR_EPSILON: f64 = 1e-6;

/// Angular difference below which start and end angle describe a full circle
const FULL_CIRCLE_EPSILON: f64 = 1e-10;

/// Point cap for [`LinearizationCriterion::MaxError`] without an explicit limit
const MAX_ERROR_POINT_CAP: usize = 1 << 16;

/// How finely curved segments are approximated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LinearizationCriterion {
    /// Every arc becomes exactly this many points (start and end included)
    NumPoints(usize),
    /// As many points as needed to keep the chord error below `max_error`,
    /// optionally capped at `max_points`
    MaxError {
        max_error: f64,
        max_points: Option<usize>,
    },
}

impl Default for LinearizationCriterion {
    fn default() -> Self {
        LinearizationCriterion::NumPoints(150)
    }
}

impl LinearizationCriterion {
    pub fn validate(&self) -> Result<()> {
        match *self {
            LinearizationCriterion::NumPoints(n) if n < 3 => Err(Error::invalid_parameter(
                "num_points",
                n,
                "an arc needs at least 3 points",
            )),
            LinearizationCriterion::MaxError { max_error, .. }
                if !(max_error.is_finite() && max_error > 0.0) =>
            {
                Err(Error::invalid_parameter(
                    "max_error",
                    max_error,
                    "must be a positive finite distance",
                ))
            }
            LinearizationCriterion::MaxError {
                max_points: Some(n),
                ..
            } if n < 3 => Err(Error::invalid_parameter(
                "max_points",
                n,
                "an arc needs at least 3 points",
            )),
            _ => Ok(()),
        }
    }
}

/// Converts curved segments into line strings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveLinearizer {
    criterion: LinearizationCriterion,
}

impl Default for CurveLinearizer {
    fn default() -> Self {
        Self {
            criterion: LinearizationCriterion::default(),
        }
    }
}

impl CurveLinearizer {
    pub fn new(criterion: LinearizationCriterion) -> Result<Self> {
        criterion.validate()?;
        Ok(Self { criterion })
    }

    pub fn criterion(&self) -> LinearizationCriterion {
        self.criterion
    }

    /// Control points of the linear approximation of one segment
    pub fn linearize_segment(&self, segment: &CurveSegment) -> Vec<Point> {
        match segment {
            CurveSegment::LineString(s) => s.points().to_vec(),
            CurveSegment::Arc(a) => self.linearize_arc(a.p1(), a.p2(), a.p3(), false),
            CurveSegment::Circle(a) => self.linearize_arc(a.p1(), a.p2(), a.p3(), true),
            CurveSegment::ArcString(s) => self.linearize_arc_string(s.points()),
        }
    }

    /// Curve whose segments are all line strings
    pub fn linearize_curve(&self, curve: &Curve) -> Result<Curve> {
        let segments = curve
            .segments()
            .iter()
            .map(|s| self.to_line_string(s))
            .collect::<Result<Vec<_>>>()?;
        let mut linear = Curve::new(segments)?;
        if let Some(id) = curve.id() {
            linear = linear.with_id(id);
        }
        if let Some(crs) = curve.crs() {
            linear = linear.with_crs(crs.clone());
        }
        Ok(linear)
    }

    /// Ring whose members are all linear curves
    pub fn linearize_ring(&self, ring: &Ring) -> Result<Ring> {
        let members = ring
            .members()
            .iter()
            .map(|c| self.linearize_curve(c))
            .collect::<Result<Vec<_>>>()?;
        let mut linear = Ring::new(members)?;
        if let Some(id) = ring.id() {
            linear = linear.with_id(id);
        }
        if let Some(crs) = ring.crs() {
            linear = linear.with_crs(crs.clone());
        }
        Ok(linear)
    }

    fn to_line_string(&self, segment: &CurveSegment) -> Result<CurveSegment> {
        if segment.is_linear() {
            return Ok(segment.clone());
        }
        LineStringSegment::new(self.linearize_segment(segment)).map(CurveSegment::LineString)
    }

    fn linearize_arc(&self, p1: &Point, p2: &Point, p3: &Point, full_circle: bool) -> Vec<Point> {
        if are_collinear(p1, p2, p3) {
            return if full_circle {
                vec![p1.clone(), p2.clone(), p1.clone()]
            } else {
                vec![p1.clone(), p3.clone()]
            };
        }
        let num_points = self.points_for_arc(p1, p2, p3, full_circle);
        interpolate_arc(p1, p2, p3, num_points, full_circle)
    }

    fn linearize_arc_string(&self, control: &[Point]) -> Vec<Point> {
        let mut points = Vec::with_capacity(control.len());
        if let Some(first) = control.first() {
            points.push(first.clone());
        }
        let mut i = 0;
        while i + 2 < control.len() {
            let (a, b, c) = (&control[i], &control[i + 1], &control[i + 2]);
            let arc = if are_collinear(a, b, c) {
                vec![a.clone(), b.clone(), c.clone()]
            } else {
                let n = self.points_for_arc(a, b, c, false);
                interpolate_arc(a, b, c, n, false)
            };
            points.extend(arc.into_iter().skip(1));
            i += 2;
        }
        points
    }

    fn points_for_arc(&self, p1: &Point, p2: &Point, p3: &Point, full_circle: bool) -> usize {
        match self.criterion {
            LinearizationCriterion::NumPoints(n) => n,
            LinearizationCriterion::MaxError {
                max_error,
                max_points,
            } => {
                let needed = points_for_max_error(p1, p2, p3, full_circle, max_error);
                let n = needed.min(max_points.unwrap_or(MAX_ERROR_POINT_CAP));
                debug!(points = n, "arc linearization point count");
                n
            }
        }
    }
}

/// True if the three points lie on one line (within a fixed area tolerance)
pub fn are_collinear(p1: &Point, p2: &Point, p3: &Point) -> bool {
    let s = Shifted::new(p1, p2, p3);
    (s.signed_area2() / 2.0).abs() < COLLINEAR_EPSILON
}

/// Three control points moved next to the origin
struct Shifted {
    dx: f64,
    dy: f64,
    pts: [(f64, f64); 3],
}

impl Shifted {
    fn new(p1: &Point, p2: &Point, p3: &Point) -> Self {
        let midrange = |a: f64, b: f64, c: f64| (a.min(b).min(c) + a.max(b).max(c)) / 2.0;
        let dx = midrange(p1.x(), p2.x(), p3.x());
        let dy = midrange(p1.y(), p2.y(), p3.y());
        let shift = |p: &Point| (p.x() - dx, p.y() - dy);
        Self {
            dx,
            dy,
            pts: [shift(p1), shift(p2), shift(p3)],
        }
    }

    /// Twice the signed area of the triangle, positive when counter-clockwise
    fn signed_area2(&self) -> f64 {
        let [(ax, ay), (bx, by), (cx, cy)] = self.pts;
        (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
    }

    fn is_clockwise(&self) -> bool {
        self.signed_area2() < 0.0
    }

    fn circumcentre(&self) -> (f64, f64) {
        let [(ax, ay), (bx, by), (cx, cy)] = self.pts;
        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        let (a2, b2, c2) = (ax * ax + ay * ay, bx * bx + by * by, cx * cx + cy * cy);
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
        (ux, uy)
    }

    /// (centre, radius, start angle, end angle)
    fn polar(&self, full_circle: bool) -> ((f64, f64), f64, f64, f64) {
        let (cx, cy) = self.circumcentre();
        let [(sx, sy), _, (ex, ey)] = self.pts;
        let start = (sy - cy).atan2(sx - cx);
        let end = if full_circle {
            start
        } else {
            (ey - cy).atan2(ex - cx)
        };
        let radius = (sx - cx).hypot(sy - cy);
        ((cx, cy), radius, start, end)
    }
}

fn angle_step(start: f64, end: f64, num_points: usize, clockwise: bool) -> f64 {
    let full_circle = (start - end).abs() < FULL_CIRCLE_EPSILON;
    let mut sweep = if full_circle { TAU } else { start - end };
    let steps = (num_points - 1) as f64;
    if clockwise {
        if !full_circle && sweep < 0.0 {
            sweep += TAU;
        }
        -sweep / steps
    } else {
        if !full_circle {
            sweep = if sweep < 0.0 { sweep.abs() } else { TAU - sweep };
        }
        sweep / steps
    }
}

fn interpolate_arc(
    p1: &Point,
    p2: &Point,
    p3: &Point,
    num_points: usize,
    full_circle: bool,
) -> Vec<Point> {
    let shifted = Shifted::new(p1, p2, p3);
    let ((cx, cy), radius, start, end) = shifted.polar(full_circle);
    let step = angle_step(start, end, num_points, shifted.is_clockwise());

    let mut points = Vec::with_capacity(num_points);
    points.push(p1.clone());
    for i in 1..num_points - 1 {
        let angle = start + i as f64 * step;
        points.push(Point::new(
            cx + angle.cos() * radius + shifted.dx,
            cy + angle.sin() * radius + shifted.dy,
        ));
    }
    points.push(if full_circle { p1.clone() } else { p3.clone() });
    points
}

fn points_for_max_error(
    p1: &Point,
    p2: &Point,
    p3: &Point,
    full_circle: bool,
    max_error: f64,
) -> usize {
    let shifted = Shifted::new(p1, p2, p3);
    let (_, radius, mut start, mut end) = shifted.polar(full_circle);

    let step = 2.0 * (1.0 - max_error / radius).clamp(-1.0, 1.0).acos();
    if !(step.is_finite() && step > 0.0) {
        return MAX_ERROR_POINT_CAP;
    }

    let sweep = if full_circle {
        TAU
    } else if shifted.is_clockwise() {
        if start < end {
            start += TAU;
        }
        start - end
    } else {
        if end < start {
            end += TAU;
        }
        end - start
    };

    let n = (sweep / step).ceil() + 2.0;
    if n >= MAX_ERROR_POINT_CAP as f64 {
        MAX_ERROR_POINT_CAP
    } else {
        (n as usize).max(3)
    }
}
