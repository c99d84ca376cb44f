//! End-to-end validation scenarios on whole geometries.

use spatia_algorithms::validation::{
    validate_geometry, Defect, DefectKind, EventCollector, GeometryValidator, Particle,
    StrictHandler, ValidatorOptions,
};
use spatia_algorithms::vector::{patch_to_polygon, CurveLinearizer};
use spatia_core::geometry::{Curve, CurveSegment, MultiGeometry, PolygonPatch, Ring, Surface};
use spatia_core::{Geometry, Point};

const OCTAGON: [(f64, f64); 9] = [
    (2.0, 4.0),
    (4.0, 3.0),
    (10.0, 3.0),
    (13.0, 5.0),
    (13.0, 9.0),
    (11.0, 13.0),
    (5.0, 13.0),
    (2.0, 11.0),
    (2.0, 4.0),
];

const SQUARE: [(f64, f64); 5] = [
    (7.0, 5.0),
    (7.0, 10.0),
    (10.0, 10.0),
    (10.0, 5.0),
    (7.0, 5.0),
];

fn ring(points: &[(f64, f64)]) -> Ring {
    Ring::linear(points.iter().copied()).unwrap()
}

fn octagon_with_hole() -> Surface {
    Surface::polygon(ring(&OCTAGON), vec![ring(&SQUARE)])
}

#[test]
fn octagon_with_square_hole_is_valid() {
    let report = validate_geometry(&octagon_with_hole().into()).unwrap();
    assert!(report.valid, "unexpected events: {:?}", report.events);
    assert!(report.events.is_empty());
}

#[test]
fn reversed_octagon_reports_both_orientations() {
    let exterior = ring(&OCTAGON).reversed();
    let interior = ring(&SQUARE).reversed();
    let surface = Surface::polygon(exterior, vec![interior]);

    let mut collector = EventCollector::new();
    let valid = GeometryValidator::default()
        .validate(&surface.into(), &mut collector)
        .unwrap();

    assert!(!valid);
    let kinds: Vec<DefectKind> = collector.events().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![DefectKind::ExteriorRingClockwise, DefectKind::InteriorRingCounterClockwise]
    );
}

#[test]
fn polygon_export_ignores_input_winding() {
    let linearizer = CurveLinearizer::default();
    let forward = PolygonPatch::new(Some(ring(&OCTAGON)), vec![ring(&SQUARE)]);
    let backward = forward.reversed();

    let a = patch_to_polygon(&linearizer, &forward).unwrap();
    let b = patch_to_polygon(&linearizer, &backward).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.exterior().0.len(), OCTAGON.len());
    assert_eq!(a.interiors()[0].0.len(), SQUARE.len());
}

#[test]
fn circular_exterior_with_hole() {
    let circle = Ring::new(vec![Curve::new(vec![CurveSegment::circle(
        (10.0, 0.0),
        (0.0, 10.0),
        (-10.0, 0.0),
    )])
    .unwrap()])
    .unwrap();
    let hole = [(-2.0, -2.0), (-2.0, 2.0), (2.0, 2.0), (2.0, -2.0), (-2.0, -2.0)];

    let inside = Surface::polygon(circle.clone(), vec![ring(&hole)]);
    assert!(validate_geometry(&inside.into()).unwrap().valid);

    let straddling = [(5.0, -2.0), (5.0, 2.0), (15.0, 2.0), (15.0, -2.0), (5.0, -2.0)];
    let crossing = Surface::polygon(circle, vec![ring(&straddling)]);
    let report = validate_geometry(&crossing.into()).unwrap();
    assert!(!report.valid);
    assert!(report
        .events
        .iter()
        .any(|e| e.kind() == DefectKind::InteriorRingIntersectsExterior));
}

#[test]
fn discontinuous_curve_reported_at_first_segment() {
    let curve = Curve::new(vec![
        CurveSegment::line_string([(0.0, 0.0), (1.0, 0.0)]).unwrap(),
        CurveSegment::line_string([(1.0, 0.5), (2.0, 0.5)]).unwrap(),
    ])
    .unwrap();

    let report = validate_geometry(&curve.into()).unwrap();
    assert!(!report.valid);
    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].defect, Defect::CurveDiscontinuity { segment: 0 });
}

#[test]
fn multi_geometry_paths_point_at_the_failing_member() {
    let open = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
    let multi = Geometry::Multi(MultiGeometry::new(vec![
        octagon_with_hole().into(),
        open.into(),
        Surface::polygon(ring(&OCTAGON).reversed(), vec![]).into(),
    ]));

    let report = validate_geometry(&multi).unwrap();
    assert!(!report.valid);
    assert_eq!(report.events.len(), 2);

    assert_eq!(report.events[0].path, vec![Particle::Member(1)]);
    assert_eq!(report.events[0].kind(), DefectKind::RingNotClosed);

    assert_eq!(
        report.events[1].path,
        vec![Particle::Member(2), Particle::Patch(0), Particle::ExteriorRing]
    );
    assert_eq!(
        report.events[1].to_string(),
        "ExteriorRingClockwise / member 2 / patch 0 / exterior"
    );
}

#[test]
fn handler_decides_fatality() {
    let dup = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let geometry: Geometry = dup.into();
    let validator = GeometryValidator::default();

    assert!(!validator.validate(&geometry, &mut StrictHandler).unwrap());

    let mut lenient = EventCollector::new().tolerate(DefectKind::DuplicatePoints);
    assert!(validator.validate(&geometry, &mut lenient).unwrap());
    assert_eq!(lenient.of_kind(DefectKind::DuplicatePoints).count(), 1);
}

#[test]
fn self_intersection_check_can_be_disabled() {
    let bow_tie: Geometry =
        ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]).into();

    assert!(!validate_geometry(&bow_tie).unwrap().valid);

    let relaxed = GeometryValidator::new(ValidatorOptions {
        check_self_intersection: false,
        ..Default::default()
    })
    .unwrap();
    assert!(relaxed.report(&bow_tie).unwrap().valid);
}

#[test]
fn ring_closure_compares_z() {
    let ring = Ring::linear([
        Point::new_3d(0.0, 0.0, 0.0),
        Point::new_3d(1.0, 0.0, 0.0),
        Point::new_3d(1.0, 1.0, 0.0),
        Point::new_3d(0.0, 0.0, 5.0),
    ])
    .unwrap();

    let report = validate_geometry(&ring.into()).unwrap();
    assert!(!report.valid);
    let kinds: Vec<DefectKind> = report.events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![DefectKind::RingNotClosed]);
}

#[test]
fn geometry_from_json_is_checked_on_read() {
    let empty = r#"{"Ring":{"id":null,"crs":null,"members":[]}}"#;
    let err = serde_json::from_str::<Geometry>(empty).unwrap_err();
    assert!(err.to_string().contains("at least one member curve"), "{err}");

    let json = serde_json::to_string(&Geometry::from(octagon_with_hole())).unwrap();
    let geometry: Geometry = serde_json::from_str(&json).unwrap();
    assert!(validate_geometry(&geometry).unwrap().valid);
}
