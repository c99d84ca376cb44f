//! Errors of the spatial index and the interpolator

use thiserror::Error;

/// Failure of a [`SpatialIndex`](super::SpatialIndex) operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("spatial index is empty")]
    Empty,

    #[error("position ({x}, {y}) lies outside the index bounds")]
    OutOfBounds { x: f64, y: f64 },

    #[error("invalid query envelope")]
    InvalidEnvelope,

    #[error("corrupt spatial index: {0}")]
    Corrupt(String),
}

/// Error type for interpolation runs
#[derive(Error, Debug)]
pub enum InterpolationError {
    /// The index failed; the whole run is abandoned
    #[error("spatial index failure: {0}")]
    Index(#[from] IndexError),

    #[error("Invalid parameter: {name} ({reason})")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Core(#[from] spatia_core::Error),
}

impl InterpolationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        InterpolationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
