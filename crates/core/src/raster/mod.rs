//! Raster data structures and world ↔ raster mapping

mod affine;
mod element;
mod geotransform;
mod grid;

pub use affine::AffineTransform;
pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
