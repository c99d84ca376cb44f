//! Spatial interpolation of scattered samples
//!
//! - Quadtree: range-searchable point index behind the [`SpatialIndex`] contract
//! - IDTP: Inverse Distance to a Power over rectangular search windows,
//!   rasterized onto a node-registered grid

mod error;
mod idtp;
pub mod quadtree;

pub use error::{IndexError, InterpolationError};
pub use idtp::{idtp, Estimate, Idtp, IdtpParams, InterpolatedGrid, InverseDistanceToPower};
pub use quadtree::{Quadtree, Spatial, SpatialIndex};

use serde::{Deserialize, Serialize};
use spatia_core::Envelope;
use std::cmp::Ordering;

/// A sample: position and measured value.
///
/// Identity is the position only: tuples order by x, then y (total order on
/// `f64`), and two tuples at the same position are equal whatever their values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DataTuple {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl DataTuple {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Euclidean distance to (x, y)
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

impl Ord for DataTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl PartialOrd for DataTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DataTuple {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DataTuple {}

impl Spatial for DataTuple {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// Sort by position and drop positional duplicates; the first occurrence wins
pub fn dedup_tuples(mut tuples: Vec<DataTuple>) -> Vec<DataTuple> {
    tuples.sort();
    tuples.dedup();
    tuples
}

/// Closed interval of sample values to leave out of every estimate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueInterval {
    pub min: f64,
    pub max: f64,
}

impl ValueInterval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Interval holding exactly one value
    pub fn single(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Smallest non-zero spacing between distinct x values and between distinct
/// y values of the samples; `None` if all samples share one position.
pub fn estimate_resolution(tuples: &[DataTuple]) -> Option<f64> {
    fn min_gap(mut values: Vec<f64>) -> Option<f64> {
        values.sort_by(f64::total_cmp);
        values
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0 && d.is_finite())
            .min_by(f64::total_cmp)
    }

    let gx = min_gap(tuples.iter().map(|t| t.x).collect());
    let gy = min_gap(tuples.iter().map(|t| t.y).collect());
    match (gx, gy) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Grid size (width, height) with one node every `resolution` units, both
/// envelope edges included.
pub fn grid_dimensions(
    envelope: &Envelope,
    resolution: f64,
) -> Result<(usize, usize), InterpolationError> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(InterpolationError::invalid(
            "resolution",
            format!("{resolution} is not a positive finite distance"),
        ));
    }
    if envelope.is_nan() || envelope.width() < 0.0 || envelope.height() < 0.0 {
        return Err(InterpolationError::invalid("envelope", "not a valid rectangle"));
    }
    // absorbs representation error such as 10.0 / 0.1 = 99.99999999999999
    let nodes = |extent: f64| (extent / resolution + 1e-9).floor() as usize + 1;
    Ok((nodes(envelope.width()), nodes(envelope.height())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_identity_is_position() {
        let a = DataTuple::new(1.0, 2.0, 10.0);
        let b = DataTuple::new(1.0, 2.0, 99.0);
        let c = DataTuple::new(1.0, 3.0, 10.0);
        assert_eq!(a, b);
        assert!(a < c);
        assert!(DataTuple::new(0.5, 100.0, 0.0) < a);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let tuples = vec![
            DataTuple::new(2.0, 0.0, 1.0),
            DataTuple::new(1.0, 0.0, 2.0),
            DataTuple::new(2.0, 0.0, 3.0),
        ];
        let unique = dedup_tuples(tuples);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].x, 1.0);
        assert_eq!(unique[1].value, 1.0);
    }

    #[test]
    fn test_value_interval() {
        let iv = ValueInterval::new(-9999.0, -9000.0);
        assert!(iv.contains(-9999.0));
        assert!(iv.contains(-9000.0));
        assert!(!iv.contains(0.0));
        assert!(ValueInterval::single(0.0).contains(0.0));
    }

    #[test]
    fn test_resolution_and_dimensions() {
        let tuples: Vec<DataTuple> = (0..=10)
            .flat_map(|i| (0..=5).map(move |j| DataTuple::new(i as f64 * 0.1, j as f64 * 0.5, 0.0)))
            .collect();
        let res = estimate_resolution(&tuples).unwrap();
        assert!((res - 0.1).abs() < 1e-9);

        let env = Envelope::new(0.0, 0.0, 10.0, 5.0);
        assert_eq!(grid_dimensions(&env, 0.1).unwrap(), (101, 51));
        assert_eq!(grid_dimensions(&env, 1.0).unwrap(), (11, 6));
        assert!(grid_dimensions(&env, 0.0).is_err());

        assert_eq!(estimate_resolution(&[DataTuple::new(1.0, 1.0, 0.0)]), None);
    }
}
