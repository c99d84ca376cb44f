//! Topological validation of geometries
//!
//! Walks a geometry depth first and reports every defect found to a
//! [`ValidationEventHandler`]. Defects never abort the walk; the handler's
//! answers are folded into a single validity flag.
//!
//! Checks by geometry kind:
//!
//! - Point: none
//! - Curve, Ring: duplicate consecutive control points, segment continuity,
//!   self-intersection of the linearized curve, closure (rings only)
//! - Surface patch: its rings as above, then exterior/interior orientation,
//!   interior vs exterior and interior vs interior relations
//! - Composite, Multi: every member, recursively
//! - Solid: not supported

use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};
use spatia_core::geometry::{
    CompositeGeometry, Curve, CurveSegment, MultiGeometry, PolygonPatch, Ring, Surface,
};
use spatia_core::{Algorithm, Error, Geometry, Point, Result};
use tracing::{debug, warn};

use super::event::{EventCollector, Particle, ValidationEvent, ValidationEventHandler};
use crate::vector::predicates::is_usable_ring;
use crate::vector::{
    is_counter_clockwise, linearized_coords, non_simple_location, ring_intersection, ring_within,
    CurveLinearizer, LinearizationCriterion,
};

/// Validator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Test curves and rings for self-intersection
    pub check_self_intersection: bool,
    /// Approximation of curved segments for the planar checks
    pub linearization: LinearizationCriterion,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            check_self_intersection: true,
            linearization: LinearizationCriterion::NumPoints(150),
        }
    }
}

/// Outcome of validating one geometry with an [`EventCollector`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub events: Vec<ValidationEvent>,
}

/// Topology validator
#[derive(Debug, Clone)]
pub struct GeometryValidator {
    options: ValidatorOptions,
    linearizer: CurveLinearizer,
}

#[derive(Clone, Copy)]
enum CurveKind {
    Open,
    Ring { closed: bool },
}

impl Default for GeometryValidator {
    fn default() -> Self {
        Self {
            options: ValidatorOptions::default(),
            linearizer: CurveLinearizer::default(),
        }
    }
}

impl GeometryValidator {
    pub fn new(options: ValidatorOptions) -> Result<Self> {
        let linearizer = CurveLinearizer::new(options.linearization)?;
        Ok(Self {
            options,
            linearizer,
        })
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate `geometry`, reporting defects to `handler`.
    ///
    /// Returns `Ok(false)` if the handler declared any reported defect fatal.
    /// Errors are reserved for input that cannot be validated at all: solids
    /// and polygon patches without an exterior ring.
    pub fn validate<H>(&self, geometry: &Geometry, handler: &mut H) -> Result<bool>
    where
        H: ValidationEventHandler + ?Sized,
    {
        let mut path = Vec::new();
        self.validate_geometry(geometry, &mut path, handler)
    }

    /// Validate with an [`EventCollector`] and return everything it saw
    pub fn report(&self, geometry: &Geometry) -> Result<ValidationReport> {
        let mut collector = EventCollector::new();
        let valid = self.validate(geometry, &mut collector)?;
        Ok(ValidationReport {
            valid,
            events: collector.into_events(),
        })
    }

    fn validate_geometry<H>(
        &self,
        geometry: &Geometry,
        path: &mut Vec<Particle>,
        handler: &mut H,
    ) -> Result<bool>
    where
        H: ValidationEventHandler + ?Sized,
    {
        match geometry {
            Geometry::Point(_) => {
                debug!("point geometry, nothing to validate");
                Ok(true)
            }
            Geometry::Curve(curve) => Ok(self.validate_curve(curve, path, handler)),
            Geometry::Ring(ring) => Ok(self.validate_ring(ring, path, handler)),
            Geometry::Surface(surface) => self.validate_surface(surface, path, handler),
            Geometry::Solid(_) => Err(Error::Unsupported("validation of solids".into())),
            Geometry::Composite(CompositeGeometry { members, .. }) => {
                debug!(members = members.len(), "composite geometry, validating members");
                warn!("topology between composite members is not validated");
                self.validate_members(members, path, handler)
            }
            Geometry::Multi(MultiGeometry { members, .. }) => {
                debug!(members = members.len(), "multi geometry, validating members");
                self.validate_members(members, path, handler)
            }
        }
    }

    fn validate_members<H>(
        &self,
        members: &[Geometry],
        path: &mut Vec<Particle>,
        handler: &mut H,
    ) -> Result<bool>
    where
        H: ValidationEventHandler + ?Sized,
    {
        let mut valid = true;
        for (i, member) in members.iter().enumerate() {
            path.push(Particle::Member(i));
            let member_valid = self.validate_geometry(member, path, handler)?;
            path.pop();
            valid &= member_valid;
        }
        Ok(valid)
    }

    fn validate_curve<H>(&self, curve: &Curve, path: &[Particle], handler: &mut H) -> bool
    where
        H: ValidationEventHandler + ?Sized,
    {
        self.validate_segments(curve.segments(), CurveKind::Open, path, handler)
    }

    fn validate_ring<H>(&self, ring: &Ring, path: &[Particle], handler: &mut H) -> bool
    where
        H: ValidationEventHandler + ?Sized,
    {
        let kind = CurveKind::Ring {
            closed: ring.is_closed(),
        };
        self.validate_segments(ring.segments(), kind, path, handler)
    }

    fn validate_segments<'a, H>(
        &self,
        segments: impl IntoIterator<Item = &'a CurveSegment>,
        kind: CurveKind,
        path: &[Particle],
        handler: &mut H,
    ) -> bool
    where
        H: ValidationEventHandler + ?Sized,
    {
        let segments: Vec<&CurveSegment> = segments.into_iter().collect();
        let mut valid = true;

        debug!("checking for duplicate consecutive control points");
        for segment in &segments {
            match segment {
                CurveSegment::LineString(line) => {
                    for pair in line.points().windows(2) {
                        if pair[0].same_position(&pair[1]) {
                            debug!(x = pair[1].x(), y = pair[1].y(), "duplicate control point");
                            valid &= !handler.duplicate_points(path, &pair[1]);
                        }
                    }
                }
                _ => warn!("non-linear segment, skipping duplicate point check"),
            }
        }

        debug!("checking segment continuity");
        for (i, pair) in segments.windows(2).enumerate() {
            if !pair[0].end_point().coincides(pair[1].start_point()) {
                debug!(segment = i, "discontinuity after segment");
                valid &= !handler.curve_discontinuity(path, i);
            }
        }

        if self.options.check_self_intersection {
            debug!("checking for self-intersection");
            let line = linearized_coords(&self.linearizer, segments.iter().copied());
            if let Some(at) = non_simple_location(&line) {
                let location = Point::from(at);
                debug!(x = at.x, y = at.y, "self-intersection");
                valid &= !match kind {
                    CurveKind::Open => handler.curve_self_intersection(path, &location),
                    CurveKind::Ring { .. } => handler.ring_self_intersection(path, &location),
                };
            }
        }

        if let CurveKind::Ring { closed: false } = kind {
            debug!("ring is not closed");
            valid &= !handler.ring_not_closed(path);
        }

        valid
    }

    fn validate_surface<H>(
        &self,
        surface: &Surface,
        path: &mut Vec<Particle>,
        handler: &mut H,
    ) -> Result<bool>
    where
        H: ValidationEventHandler + ?Sized,
    {
        debug!(patches = surface.patches().len(), "surface, validating patches");
        if surface.patches().len() > 1 {
            warn!("topology between surface patches is not validated");
        }
        let mut valid = true;
        for (i, patch) in surface.patches().iter().enumerate() {
            path.push(Particle::Patch(i));
            let patch_valid = self.validate_patch(patch, path, handler)?;
            path.pop();
            valid &= patch_valid;
        }
        Ok(valid)
    }

    fn validate_patch<H>(
        &self,
        patch: &PolygonPatch,
        path: &mut Vec<Particle>,
        handler: &mut H,
    ) -> Result<bool>
    where
        H: ValidationEventHandler + ?Sized,
    {
        let exterior = patch
            .exterior()
            .ok_or_else(|| Error::InvalidGeometry("polygon patch without exterior ring".into()))?;
        let interiors = patch.interiors();
        let mut valid = true;

        path.push(Particle::ExteriorRing);
        valid &= self.validate_ring(exterior, path, handler);
        path.pop();
        for (i, ring) in interiors.iter().enumerate() {
            path.push(Particle::InteriorRing(i));
            valid &= self.validate_ring(ring, path, handler);
            path.pop();
        }

        let shell = self.planar(exterior);
        let holes: Vec<LineString<f64>> = interiors.iter().map(|r| self.planar(r)).collect();
        let all_rings_usable = std::iter::once(exterior)
            .chain(interiors)
            .zip(std::iter::once(&shell).chain(&holes))
            .all(|(ring, line)| ring.is_closed() && is_usable_ring(line));
        if !all_rings_usable {
            warn!(
                "patch has an unclosed or degenerate ring, \
                 skipping orientation and ring relation checks"
            );
            return Ok(valid);
        }

        debug!("checking ring orientation");
        if !is_counter_clockwise(&shell) {
            path.push(Particle::ExteriorRing);
            valid &= !handler.exterior_ring_clockwise(path);
            path.pop();
        }
        for (i, hole) in holes.iter().enumerate() {
            if is_counter_clockwise(hole) {
                path.push(Particle::InteriorRing(i));
                valid &= !handler.interior_ring_counter_clockwise(path, i);
                path.pop();
            }
        }

        debug!("checking interior rings against the exterior ring");
        let shell_polygon = Polygon::new(shell.clone(), vec![]);
        let hole_polygons: Vec<Polygon<f64>> =
            holes.iter().map(|h| Polygon::new(h.clone(), vec![])).collect();

        for (i, hole) in holes.iter().enumerate() {
            if let Some(hit) = ring_intersection(hole, &shell) {
                let location = Point::from(hit.location);
                valid &= !if hit.single_point {
                    handler.interior_ring_touches_exterior(path, i, &location)
                } else {
                    handler.interior_ring_intersects_exterior(path, i, &location)
                };
            }
            let outside =
                !ring_within(hole, &shell_polygon) || ring_within(&shell, &hole_polygons[i]);
            if outside {
                debug!(ring = i, "interior ring outside exterior");
                valid &= !handler.interior_ring_outside_exterior(path, i);
            }
        }

        debug!("checking pairs of interior rings");
        for i in 0..holes.len() {
            for j in (i + 1)..holes.len() {
                if let Some(hit) = ring_intersection(&holes[i], &holes[j]) {
                    let location = Point::from(hit.location);
                    valid &= !if hit.single_point {
                        handler.interior_rings_touch(path, i, j, &location)
                    } else {
                        handler.interior_rings_intersect(path, i, j, &location)
                    };
                }
                if ring_within(&holes[i], &hole_polygons[j]) {
                    valid &= !handler.interior_rings_nested(path, j, i);
                }
                if ring_within(&holes[j], &hole_polygons[i]) {
                    valid &= !handler.interior_rings_nested(path, i, j);
                }
            }
        }

        Ok(valid)
    }

    fn planar(&self, ring: &Ring) -> LineString<f64> {
        linearized_coords(&self.linearizer, ring.segments())
    }
}

/// Topology validation as an [`Algorithm`]
#[derive(Debug, Clone, Default)]
pub struct TopologyValidation;

impl Algorithm for TopologyValidation {
    type Input = Geometry;
    type Output = ValidationReport;
    type Params = ValidatorOptions;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Topology Validation"
    }

    fn description(&self) -> &'static str {
        "Report topological defects of curves, rings and surfaces"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        GeometryValidator::new(params)?.report(&input)
    }
}

/// Validate with default options and collect all events
pub fn validate_geometry(geometry: &Geometry) -> Result<ValidationReport> {
    GeometryValidator::default().report(geometry)
}
