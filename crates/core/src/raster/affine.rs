//! Mapping between a world rectangle and a raster rectangle
//!
//! World coordinates grow upwards, raster coordinates grow downwards from
//! the top-left corner, so the Y axis is flipped:
//!
//! ```text
//! dest_x = dest.min_x + (src_x - src.min_x) * (dest.width / src.width)
//! dest_y = dest.min_y + dest.height - (src_y - src.min_y) * (dest.height / src.height)
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Envelope;

/// Affine transform from a source (world) rectangle onto a destination
/// (raster) rectangle, and back.
///
/// A rectangle with zero width or height collapses onto its minimum edge:
/// every scale ratio whose denominator is zero is taken as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    source: Envelope,
    destination: Envelope,
    /// dest units per source unit
    scale_x: f64,
    scale_y: f64,
    /// source units per dest unit
    inv_scale_x: f64,
    inv_scale_y: f64,
}

impl AffineTransform {
    pub fn new(source: Envelope, destination: Envelope) -> Self {
        let mut t = Self {
            source,
            destination,
            scale_x: 0.0,
            scale_y: 0.0,
            inv_scale_x: 0.0,
            inv_scale_y: 0.0,
        };
        t.update_scales();
        t
    }

    /// Transform from `source` onto the pixel lattice `0..=width-1 x 0..=height-1`
    pub fn onto_grid(source: Envelope, width: usize, height: usize) -> Self {
        let max_col = width.saturating_sub(1) as f64;
        let max_row = height.saturating_sub(1) as f64;
        Self::new(source, Envelope::new(0.0, 0.0, max_col, max_row))
    }

    pub fn source(&self) -> &Envelope {
        &self.source
    }

    pub fn destination(&self) -> &Envelope {
        &self.destination
    }

    pub fn set_source(&mut self, source: Envelope) {
        self.source = source;
        self.update_scales();
    }

    pub fn set_destination(&mut self, destination: Envelope) {
        self.destination = destination;
        self.update_scales();
    }

    fn update_scales(&mut self) {
        let (sw, sh) = (self.source.width(), self.source.height());
        let (dw, dh) = (self.destination.width(), self.destination.height());
        self.scale_x = ratio(dw, sw);
        self.scale_y = ratio(dh, sh);
        self.inv_scale_x = ratio(sw, dw);
        self.inv_scale_y = ratio(sh, dh);
    }

    pub fn dest_x(&self, src_x: f64) -> f64 {
        self.destination.min_x + (src_x - self.source.min_x) * self.scale_x
    }

    pub fn dest_y(&self, src_y: f64) -> f64 {
        self.destination.min_y + self.destination.height()
            - (src_y - self.source.min_y) * self.scale_y
    }

    pub fn src_x(&self, dest_x: f64) -> f64 {
        self.source.min_x + (dest_x - self.destination.min_x) * self.inv_scale_x
    }

    pub fn src_y(&self, dest_y: f64) -> f64 {
        self.source.min_y
            + (self.destination.min_y + self.destination.height() - dest_y) * self.inv_scale_y
    }

    /// World → raster
    pub fn to_dest(&self, src_x: f64, src_y: f64) -> (f64, f64) {
        (self.dest_x(src_x), self.dest_y(src_y))
    }

    /// Raster → world
    pub fn to_source(&self, dest_x: f64, dest_y: f64) -> (f64, f64) {
        (self.src_x(dest_x), self.src_y(dest_y))
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_corners_flip_y() {
        let t = AffineTransform::onto_grid(Envelope::new(0.0, 0.0, 10.0, 10.0), 11, 11);

        assert_eq!(t.to_source(0.0, 0.0), (0.0, 10.0));
        assert_eq!(t.to_source(10.0, 10.0), (10.0, 0.0));
        assert_eq!(t.to_dest(0.0, 10.0), (0.0, 0.0));
        assert_eq!(t.to_dest(10.0, 0.0), (10.0, 10.0));
    }

    #[test]
    fn test_roundtrip_non_square() {
        let t = AffineTransform::new(
            Envelope::new(2500000.0, 5600000.0, 2501000.0, 5600500.0),
            Envelope::new(0.0, 0.0, 199.0, 99.0),
        );
        let (dx, dy) = t.to_dest(2500250.0, 5600125.0);
        assert_relative_eq!(dx, 49.75, epsilon = 1e-9);
        assert_relative_eq!(dy, 74.25, epsilon = 1e-9);

        let (x, y) = t.to_source(dx, dy);
        assert_relative_eq!(x, 2500250.0, epsilon = 1e-6);
        assert_relative_eq!(y, 5600125.0, epsilon = 1e-6);
    }

    #[test]
    fn test_setters_recompute_scales() {
        let mut t = AffineTransform::onto_grid(Envelope::new(0.0, 0.0, 10.0, 10.0), 11, 11);
        t.set_destination(Envelope::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(t.to_dest(5.0, 5.0), (10.0, 10.0));
        t.set_source(Envelope::new(0.0, 0.0, 40.0, 40.0));
        assert_eq!(t.to_dest(10.0, 30.0), (5.0, 5.0));
    }

    #[test]
    fn test_degenerate_rectangles_collapse() {
        let t = AffineTransform::onto_grid(Envelope::new(3.0, 4.0, 9.0, 4.0), 4, 1);
        assert_eq!(t.to_source(3.0, 0.0), (9.0, 4.0));
        assert_eq!(t.to_dest(6.0, 4.0), (1.5, 0.0));

        let single = AffineTransform::onto_grid(Envelope::new(0.0, 0.0, 10.0, 10.0), 1, 1);
        assert_eq!(single.to_source(0.0, 0.0), (0.0, 0.0));
    }
}
