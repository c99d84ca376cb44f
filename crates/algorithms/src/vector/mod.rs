//! Vector geometry operations
//!
//! - Linearization: arcs, circles and arc strings to line strings
//! - Predicates: orientation, simplicity, ring intersection and containment
//! - Export of polygon patches as planar `geo` polygons

mod linearize;
pub mod predicates;

pub use linearize::{are_collinear, CurveLinearizer, LinearizationCriterion};
pub use predicates::{
    is_counter_clockwise, non_simple_location, ring_intersection, ring_within, signed_ring_area,
    RingIntersection,
};

use geo::algorithm::orient::{Direction, Orient};
use geo::{Coord, LineString, Polygon};
use spatia_core::geometry::{CurveSegment, PolygonPatch, Ring};
use spatia_core::{Error, Result};

/// Coordinates of the linearized segments, joined end to start.
///
/// A segment's first vertex is dropped when it repeats the previous
/// segment's last vertex.
pub fn linearized_coords<'a>(
    linearizer: &CurveLinearizer,
    segments: impl IntoIterator<Item = &'a CurveSegment>,
) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for segment in segments {
        let points = linearizer.linearize_segment(segment);
        let mut iter = points.iter().map(|p| p.coord()).peekable();
        if let (Some(last), Some(first)) = (coords.last(), iter.peek()) {
            if last == first {
                iter.next();
            }
        }
        coords.extend(iter);
    }
    LineString::new(coords)
}

/// Planar line string of a ring
pub fn ring_line_string(linearizer: &CurveLinearizer, ring: &Ring) -> LineString<f64> {
    linearized_coords(linearizer, ring.segments())
}

/// Planar polygon of a patch with the exterior counter-clockwise and all
/// interiors clockwise, whatever the winding of the input rings.
pub fn patch_to_polygon(
    linearizer: &CurveLinearizer,
    patch: &PolygonPatch,
) -> Result<Polygon<f64>> {
    let exterior = patch
        .exterior()
        .ok_or_else(|| Error::InvalidGeometry("polygon patch without exterior ring".into()))?;
    let interiors = patch
        .interiors()
        .iter()
        .map(|r| ring_line_string(linearizer, r))
        .collect();
    let polygon = Polygon::new(ring_line_string(linearizer, exterior), interiors);
    Ok(polygon.orient(Direction::Default))
}
