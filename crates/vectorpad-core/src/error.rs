//! Error types for the geometry core.

use crate::shapes::ShapeKind;
use thiserror::Error;

/// Errors surfaced by path construction and shape interaction.
///
/// Transient numerical faults during a drag never reach the caller; they are
/// absorbed by the behaviour engine. Only structural problems end up here.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{kind:?} needs {required} control points, got {found}")]
    InsufficientGeometry {
        kind: ShapeKind,
        required: usize,
        found: usize,
    },
    #[error("Degenerate transform: {0}")]
    DegenerateTransform(&'static str),
    #[error("{operation} is not supported for {kind:?}")]
    InvalidKindTransition {
        kind: ShapeKind,
        operation: &'static str,
    },
    #[error("Shape index {0} is out of range")]
    NoSuchShape(usize),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
