//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

use crate::geometry::Envelope;

/// North-up georeferencing of a raster.
///
/// Converts between pixel coordinates (col, row) and world coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
/// `pixel_height` is negative for the usual top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X direction
    pub pixel_width: f64,
    /// Cell size in Y direction, usually negative
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Geotransform of a grid whose cell *centres* sit on the nodes of a
    /// `width x height` lattice spanning `envelope` edge to edge.
    ///
    /// Cell (0, 0) is centred on the upper-left corner of the envelope and
    /// cell (width - 1, height - 1) on the lower-right corner. A single
    /// column or row gets a zero cell size along that axis.
    pub fn for_node_grid(envelope: &Envelope, width: usize, height: usize) -> Self {
        let dx = node_spacing(envelope.width(), width);
        let dy = node_spacing(envelope.height(), height);
        Self::new(
            envelope.min_x - dx / 2.0,
            envelope.max_y + dy / 2.0,
            dx,
            -dy,
        )
    }

    /// World coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + (col as f64 + 0.5) * self.pixel_width;
        let y = self.origin_y + (row as f64 + 0.5) * self.pixel_height;
        (x, y)
    }

    /// Fractional pixel coordinates of a world position; NaN for a degenerate transform
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return (f64::NAN, f64::NAN);
        }
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// Cell size (assumes square pixels)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of a raster of given dimensions
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let x0 = self.origin_x;
        let y0 = self.origin_y;
        let x1 = self.origin_x + width as f64 * self.pixel_width;
        let y1 = self.origin_y + height as f64 * self.pixel_height;
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

fn node_spacing(extent: f64, nodes: usize) -> f64 {
    if nodes > 1 {
        extent / (nodes - 1) as f64
    } else {
        0.0
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}
