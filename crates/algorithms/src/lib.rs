//! # Spatia Algorithms
//!
//! Geometry validation and interpolation algorithms for spatia.
//!
//! ## Available Algorithm Categories
//!
//! - **validation**: Topological validation of curves, rings and surfaces
//!   with per-defect event reporting
//! - **vector**: Curve linearization and planar predicates
//! - **interpolation**: Quadtree index and IDTP gridding of scattered samples

pub mod interpolation;
pub mod validation;
pub mod vector;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{
        idtp, DataTuple, Idtp, IdtpParams, InterpolatedGrid, InterpolationError,
        InverseDistanceToPower, Quadtree, SpatialIndex, ValueInterval,
    };
    pub use crate::validation::{
        validate_geometry, Defect, DefectKind, EventCollector, GeometryValidator, StrictHandler,
        TopologyValidation, ValidationEvent, ValidationEventHandler, ValidationReport,
        ValidatorOptions,
    };
    pub use crate::vector::{CurveLinearizer, LinearizationCriterion};
    pub use spatia_core::prelude::*;
}
