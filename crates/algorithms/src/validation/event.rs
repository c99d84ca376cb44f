//! Validation events and the handler capability
//!
//! The validator never decides on its own whether a defect invalidates a
//! geometry. It calls one handler method per defect and folds the returned
//! flags: `true` means the defect is fatal.

use serde::{Deserialize, Serialize};
use spatia_core::Point;
use std::collections::HashSet;
use std::fmt;

/// One step of the path from the validated geometry down to a defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Particle {
    /// Member of a composite or multi geometry
    Member(usize),
    /// Patch of a surface
    Patch(usize),
    ExteriorRing,
    InteriorRing(usize),
}

/// Kind of a defect, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectKind {
    DuplicatePoints,
    CurveDiscontinuity,
    CurveSelfIntersection,
    RingNotClosed,
    RingSelfIntersection,
    ExteriorRingClockwise,
    InteriorRingCounterClockwise,
    InteriorRingsTouch,
    InteriorRingsIntersect,
    InteriorRingsNested,
    InteriorRingTouchesExterior,
    InteriorRingIntersectsExterior,
    InteriorRingOutsideExterior,
}

/// A detected defect and its data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Defect {
    /// Two consecutive control points of a line string segment are equal
    DuplicatePoints { point: Point },
    /// End of segment `segment` does not coincide with the start of the next one
    CurveDiscontinuity { segment: usize },
    CurveSelfIntersection { location: Point },
    RingNotClosed,
    RingSelfIntersection { location: Point },
    ExteriorRingClockwise,
    InteriorRingCounterClockwise { ring: usize },
    InteriorRingsTouch {
        first: usize,
        second: usize,
        location: Point,
    },
    InteriorRingsIntersect {
        first: usize,
        second: usize,
        location: Point,
    },
    /// Interior ring `inner` lies inside interior ring `outer`
    InteriorRingsNested { outer: usize, inner: usize },
    InteriorRingTouchesExterior { ring: usize, location: Point },
    InteriorRingIntersectsExterior { ring: usize, location: Point },
    InteriorRingOutsideExterior { ring: usize },
}

impl Defect {
    pub fn kind(&self) -> DefectKind {
        match self {
            Defect::DuplicatePoints { .. } => DefectKind::DuplicatePoints,
            Defect::CurveDiscontinuity { .. } => DefectKind::CurveDiscontinuity,
            Defect::CurveSelfIntersection { .. } => DefectKind::CurveSelfIntersection,
            Defect::RingNotClosed => DefectKind::RingNotClosed,
            Defect::RingSelfIntersection { .. } => DefectKind::RingSelfIntersection,
            Defect::ExteriorRingClockwise => DefectKind::ExteriorRingClockwise,
            Defect::InteriorRingCounterClockwise { .. } => DefectKind::InteriorRingCounterClockwise,
            Defect::InteriorRingsTouch { .. } => DefectKind::InteriorRingsTouch,
            Defect::InteriorRingsIntersect { .. } => DefectKind::InteriorRingsIntersect,
            Defect::InteriorRingsNested { .. } => DefectKind::InteriorRingsNested,
            Defect::InteriorRingTouchesExterior { .. } => DefectKind::InteriorRingTouchesExterior,
            Defect::InteriorRingIntersectsExterior { .. } => {
                DefectKind::InteriorRingIntersectsExterior
            }
            Defect::InteriorRingOutsideExterior { .. } => DefectKind::InteriorRingOutsideExterior,
        }
    }
}

/// A defect together with the particles leading to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub path: Vec<Particle>,
    pub defect: Defect,
}

impl ValidationEvent {
    pub fn new(path: &[Particle], defect: Defect) -> Self {
        Self {
            path: path.to_vec(),
            defect,
        }
    }

    pub fn kind(&self) -> DefectKind {
        self.defect.kind()
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.defect.kind())?;
        for particle in &self.path {
            match particle {
                Particle::Member(i) => write!(f, " / member {i}")?,
                Particle::Patch(i) => write!(f, " / patch {i}")?,
                Particle::ExteriorRing => write!(f, " / exterior")?,
                Particle::InteriorRing(i) => write!(f, " / interior {i}")?,
            }
        }
        Ok(())
    }
}

/// Receives validation defects.
///
/// Each method returns `true` if the defect makes the geometry invalid.
/// Every method defaults to building a [`ValidationEvent`] and passing it to
/// [`report`](Self::report), which in turn defaults to `true`, so a handler
/// that overrides nothing treats every defect as fatal.
pub trait ValidationEventHandler {
    fn report(&mut self, event: ValidationEvent) -> bool {
        let _ = event;
        true
    }

    fn duplicate_points(&mut self, path: &[Particle], point: &Point) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::DuplicatePoints {
                point: point.clone(),
            },
        ))
    }

    fn curve_discontinuity(&mut self, path: &[Particle], segment: usize) -> bool {
        self.report(ValidationEvent::new(path, Defect::CurveDiscontinuity { segment }))
    }

    fn curve_self_intersection(&mut self, path: &[Particle], location: &Point) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::CurveSelfIntersection {
                location: location.clone(),
            },
        ))
    }

    fn ring_not_closed(&mut self, path: &[Particle]) -> bool {
        self.report(ValidationEvent::new(path, Defect::RingNotClosed))
    }

    fn ring_self_intersection(&mut self, path: &[Particle], location: &Point) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::RingSelfIntersection {
                location: location.clone(),
            },
        ))
    }

    fn exterior_ring_clockwise(&mut self, path: &[Particle]) -> bool {
        self.report(ValidationEvent::new(path, Defect::ExteriorRingClockwise))
    }

    fn interior_ring_counter_clockwise(&mut self, path: &[Particle], ring: usize) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingCounterClockwise { ring },
        ))
    }

    fn interior_rings_touch(
        &mut self,
        path: &[Particle],
        first: usize,
        second: usize,
        location: &Point,
    ) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingsTouch {
                first,
                second,
                location: location.clone(),
            },
        ))
    }

    fn interior_rings_intersect(
        &mut self,
        path: &[Particle],
        first: usize,
        second: usize,
        location: &Point,
    ) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingsIntersect {
                first,
                second,
                location: location.clone(),
            },
        ))
    }

    fn interior_rings_nested(&mut self, path: &[Particle], outer: usize, inner: usize) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingsNested { outer, inner },
        ))
    }

    fn interior_ring_touches_exterior(
        &mut self,
        path: &[Particle],
        ring: usize,
        location: &Point,
    ) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingTouchesExterior {
                ring,
                location: location.clone(),
            },
        ))
    }

    fn interior_ring_intersects_exterior(
        &mut self,
        path: &[Particle],
        ring: usize,
        location: &Point,
    ) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingIntersectsExterior {
                ring,
                location: location.clone(),
            },
        ))
    }

    fn interior_ring_outside_exterior(&mut self, path: &[Particle], ring: usize) -> bool {
        self.report(ValidationEvent::new(
            path,
            Defect::InteriorRingOutsideExterior { ring },
        ))
    }
}

/// Handler that treats every defect as fatal and records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictHandler;

impl ValidationEventHandler for StrictHandler {}

/// Records every event; defects of tolerated kinds are not fatal
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    events: Vec<ValidationEvent>,
    tolerated: HashSet<DefectKind>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept defects of `kind` without invalidating the geometry
    pub fn tolerate(mut self, kind: DefectKind) -> Self {
        self.tolerated.insert(kind);
        self
    }

    pub fn is_tolerated(&self, kind: DefectKind) -> bool {
        self.tolerated.contains(&kind)
    }

    pub fn events(&self) -> &[ValidationEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ValidationEvent> {
        self.events
    }

    /// Events of one kind
    pub fn of_kind(&self, kind: DefectKind) -> impl Iterator<Item = &ValidationEvent> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ValidationEventHandler for EventCollector {
    fn report(&mut self, event: ValidationEvent) -> bool {
        let fatal = !self.is_tolerated(event.kind());
        self.events.push(event);
        fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_methods_are_fatal() {
        let mut strict = StrictHandler;
        assert!(strict.ring_not_closed(&[]));
        assert!(strict.curve_discontinuity(&[Particle::Member(0)], 3));
    }

    #[test]
    fn test_collector_tolerates_selected_kinds() {
        let mut collector = EventCollector::new().tolerate(DefectKind::DuplicatePoints);
        let path = [Particle::Patch(0), Particle::ExteriorRing];

        assert!(!collector.duplicate_points(&path, &Point::new(1.0, 1.0)));
        assert!(collector.exterior_ring_clockwise(&path[..1]));

        assert_eq!(collector.events().len(), 2);
        assert_eq!(collector.events()[0].path, path.to_vec());
        assert_eq!(collector.of_kind(DefectKind::ExteriorRingClockwise).count(), 1);
    }

    #[test]
    fn test_event_display_and_json() {
        let event = ValidationEvent::new(
            &[Particle::Member(1), Particle::Patch(0), Particle::InteriorRing(2)],
            Defect::InteriorRingOutsideExterior { ring: 2 },
        );
        assert_eq!(
            event.to_string(),
            "InteriorRingOutsideExterior / member 1 / patch 0 / interior 2"
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: ValidationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
