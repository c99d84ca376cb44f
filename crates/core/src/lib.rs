//! # Spatia Core
//!
//! Core types shared by the spatia geometry and interpolation algorithms.
//!
//! This crate provides:
//! - `Geometry`: the closed set of vector geometry kinds (points, curves,
//!   rings, surfaces, solids, composite and multi geometries)
//! - `Envelope`: axis-aligned bounding rectangle
//! - `Raster<T>`: generic raster grid with a `GeoTransform`
//! - `AffineTransform`: world ↔ raster rectangle mapping
//! - `CRS`: coordinate reference system tag
//! - The `Algorithm` trait for a consistent API

pub mod crs;
pub mod error;
pub mod geometry;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use geometry::{Envelope, Geometry, GeometryKind, Point};
pub use raster::{AffineTransform, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{
        CompositeGeometry, Curve, CurveSegment, Envelope, Geometry, GeometryKind, MultiGeometry,
        Point, PolygonPatch, Ring, Solid, Surface,
    };
    pub use crate::raster::{AffineTransform, GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in spatia.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(
        &self,
        input: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
