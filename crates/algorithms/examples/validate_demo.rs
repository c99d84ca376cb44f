//! Validation demo: run the topology validator over a small gallery of
//! valid and broken geometries and print every reported defect.
//!
//! Run:
//!   RUST_LOG=debug cargo run -p spatia-algorithms --example validate_demo

use spatia_algorithms::validation::{DefectKind, EventCollector, GeometryValidator};
use spatia_core::geometry::{Curve, CurveSegment, MultiGeometry, Ring, Surface};
use spatia_core::Geometry;
use tracing_subscriber::{fmt, EnvFilter};

fn ring(points: &[(f64, f64)]) -> Ring {
    Ring::linear(points.iter().copied()).expect("ring needs two points")
}

fn gallery() -> Vec<(&'static str, Geometry)> {
    let octagon = [
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
    let square = [(7.0, 5.0), (7.0, 10.0), (10.0, 10.0), (10.0, 5.0), (7.0, 5.0)];
    let touching = [(2.0, 4.0), (3.0, 6.0), (4.0, 5.0), (2.0, 4.0)];
    let overlapping = [(8.0, 6.0), (8.0, 8.0), (12.0, 8.0), (12.0, 6.0), (8.0, 6.0)];

    let rounded = Curve::new(vec![
        CurveSegment::line_string([(0.0, 0.0), (10.0, 0.0)]).expect("segment"),
        CurveSegment::arc((10.0, 0.0), (15.0, 5.0), (10.0, 10.0)),
        CurveSegment::line_string([(10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]).expect("segment"),
    ])
    .expect("curve");
    let broken = Curve::new(vec![
        CurveSegment::line_string([(0.0, 0.0), (5.0, 0.0)]).expect("segment"),
        CurveSegment::line_string([(5.0, 1.0), (5.0, 5.0)]).expect("segment"),
    ])
    .expect("curve");

    vec![
        (
            "octagon with square hole",
            Surface::polygon(ring(&octagon), vec![ring(&square)]).into(),
        ),
        (
            "reversed octagon",
            Surface::polygon(ring(&octagon).reversed(), vec![ring(&square).reversed()]).into(),
        ),
        (
            "hole touching shell",
            Surface::polygon(ring(&octagon), vec![ring(&touching)]).into(),
        ),
        (
            "overlapping holes",
            Surface::polygon(ring(&octagon), vec![ring(&square), ring(&overlapping)]).into(),
        ),
        (
            "rounded rectangle",
            Ring::new(vec![rounded]).expect("ring").into(),
        ),
        ("broken curve", broken.into()),
        (
            "bow tie",
            ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]).into(),
        ),
        (
            "multi with an open ring",
            Geometry::Multi(MultiGeometry::new(vec![
                ring(&square).into(),
                ring(&square[..4]).into(),
            ])),
        ),
    ]
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let validator = GeometryValidator::default();

    for (name, geometry) in gallery() {
        // Duplicate points are reported but do not invalidate
        let mut collector = EventCollector::new().tolerate(DefectKind::DuplicatePoints);
        match validator.validate(&geometry, &mut collector) {
            Ok(valid) => {
                println!("{name}: {}", if valid { "valid" } else { "INVALID" });
                for event in collector.events() {
                    println!("    {event}");
                }
            }
            Err(e) => println!("{name}: cannot validate ({e})"),
        }
    }
}
