//! Planar predicates on linearized rings and line strings

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Contains, Coord, Line, LineString, Polygon};

/// Where two rings meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingIntersection {
    /// First intersection point found
    pub location: Coord<f64>,
    /// All intersection points coincide
    pub single_point: bool,
}

/// Signed area enclosed by a ring; positive when counter-clockwise
pub fn signed_ring_area(ring: &LineString<f64>) -> f64 {
    Polygon::new(ring.clone(), vec![]).signed_area()
}

pub fn is_counter_clockwise(ring: &LineString<f64>) -> bool {
    signed_ring_area(ring) > 0.0
}

/// Copy of `coords` without consecutive repeats
pub fn dedup_consecutive(coords: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for &c in coords {
        if out.last() != Some(&c) {
            out.push(c);
        }
    }
    out
}

/// Closed, with at least three distinct vertices
pub fn is_usable_ring(ring: &LineString<f64>) -> bool {
    let coords = dedup_consecutive(&ring.0);
    coords.len() >= 4 && coords.first() == coords.last()
}

/// First location where a line string touches or crosses itself.
///
/// Adjacent segments may only share their common vertex; for a closed line
/// string the first and last segment count as adjacent. Consecutive repeated
/// vertices are ignored.
pub fn non_simple_location(line: &LineString<f64>) -> Option<Coord<f64>> {
    let coords = dedup_consecutive(&line.0);
    let lines: Vec<Line<f64>> = coords.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let n = lines.len();
    let closed = n > 1 && coords.first() == coords.last();

    for i in 0..n {
        for j in (i + 1)..n {
            let Some(hit) = line_intersection(lines[i], lines[j]) else {
                continue;
            };
            let follows = j == i + 1;
            let wraps = closed && i == 0 && j == n - 1;
            match hit {
                LineIntersection::Collinear { intersection } => return Some(intersection.start),
                LineIntersection::SinglePoint { intersection, .. } => {
                    let shared_vertex = (follows && intersection == lines[i].end)
                        || (wraps && intersection == lines[i].start);
                    if !shared_vertex {
                        return Some(intersection);
                    }
                }
            }
        }
    }
    None
}

/// Summary of all points the two rings have in common, `None` if disjoint
pub fn ring_intersection(a: &LineString<f64>, b: &LineString<f64>) -> Option<RingIntersection> {
    let mut summary: Option<RingIntersection> = None;
    let mut note = |c: Coord<f64>| match summary.as_mut() {
        None => {
            summary = Some(RingIntersection {
                location: c,
                single_point: true,
            })
        }
        Some(s) if s.location != c => s.single_point = false,
        Some(_) => {}
    };

    for la in a.lines() {
        for lb in b.lines() {
            match line_intersection(la, lb) {
                None => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) => note(intersection),
                Some(LineIntersection::Collinear { intersection }) => {
                    note(intersection.start);
                    note(intersection.end);
                }
            }
        }
    }
    summary
}

/// `ring` lies inside `container`: no vertex outside it and not entirely on its boundary
pub fn ring_within(ring: &LineString<f64>, container: &Polygon<f64>) -> bool {
    container.contains(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ls(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(coords.to_vec())
    }

    fn square(x0: f64, y0: f64, size: f64) -> LineString<f64> {
        ls(&[
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
            (x0, y0),
        ])
    }

    #[test]
    fn test_orientation() {
        let ccw = square(0.0, 0.0, 2.0);
        assert!(is_counter_clockwise(&ccw));
        assert_eq!(signed_ring_area(&ccw), 4.0);

        let mut cw = ccw.clone();
        cw.0.reverse();
        assert!(!is_counter_clockwise(&cw));
        assert_eq!(signed_ring_area(&cw), -4.0);
    }

    #[test]
    fn test_simple_ring_and_line() {
        assert_eq!(non_simple_location(&square(0.0, 0.0, 1.0)), None);
        assert_eq!(non_simple_location(&ls(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])), None);
        // repeated vertices are not self-intersections
        assert_eq!(
            non_simple_location(&ls(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0)])),
            None
        );
    }

    #[test]
    fn test_bow_tie_crossing() {
        let bow_tie = ls(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]);
        let at = non_simple_location(&bow_tie).unwrap();
        assert_relative_eq!(at.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(at.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_backtracking_is_not_simple() {
        let spike = ls(&[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)]);
        assert!(non_simple_location(&spike).is_some());
    }

    #[test]
    fn test_open_line_touching_itself() {
        let hook = ls(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (1.0, 2.0), (1.0, 0.0)]);
        assert_eq!(non_simple_location(&hook), Some(Coord { x: 1.0, y: 0.0 }));
    }

    #[test]
    fn test_ring_intersection_kinds() {
        let outer = square(0.0, 0.0, 10.0);
        assert_eq!(ring_intersection(&outer, &square(2.0, 2.0, 2.0)), None);

        let notch = ls(&[(0.0, 5.0), (3.0, 4.0), (3.0, 6.0), (0.0, 5.0)]);
        let touch = ring_intersection(&outer, &notch).unwrap();
        assert!(touch.single_point);
        assert_eq!(touch.location, Coord { x: 0.0, y: 5.0 });

        let cross = ring_intersection(&outer, &square(8.0, 8.0, 4.0)).unwrap();
        assert!(!cross.single_point);

        let shared_edge = ring_intersection(&outer, &square(0.0, 0.0, 5.0)).unwrap();
        assert!(!shared_edge.single_point);
    }

    #[test]
    fn test_ring_within() {
        let shell = Polygon::new(square(0.0, 0.0, 10.0), vec![]);
        assert!(ring_within(&square(2.0, 2.0, 2.0), &shell));
        assert!(!ring_within(&square(8.0, 8.0, 4.0), &shell));
        assert!(!ring_within(&square(20.0, 20.0, 1.0), &shell));

        let hole = Polygon::new(square(2.0, 2.0, 2.0), vec![]);
        assert!(!ring_within(&square(0.0, 0.0, 10.0), &hole));
    }

    #[test]
    fn test_usable_ring() {
        assert!(is_usable_ring(&square(0.0, 0.0, 1.0)));
        assert!(!is_usable_ring(&ls(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])));
        assert!(!is_usable_ring(&ls(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])));
    }
}
