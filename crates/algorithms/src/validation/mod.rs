//! Topological validation of vector geometries
//!
//! [`GeometryValidator`] walks a [`Geometry`](spatia_core::Geometry) and
//! reports each defect to a [`ValidationEventHandler`]. Handlers decide
//! which defects are fatal; [`EventCollector`] records them all.

mod event;
mod validator;

pub use event::{
    Defect, DefectKind, EventCollector, Particle, StrictHandler, ValidationEvent,
    ValidationEventHandler,
};
pub use validator::{
    validate_geometry, GeometryValidator, TopologyValidation, ValidationReport, ValidatorOptions,
};
