use thiserror::Error;

use crate::model::ObjectType;

/// Top-level error type for the zoneview model.
#[derive(Debug, Error)]
pub enum ZoneviewError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    ViewFactor(#[from] ViewFactorError),
}

/// Errors related to surface geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("a planar surface needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),

    #[error("vertex {index} is {distance} away from the surface plane")]
    NonPlanar { index: usize, distance: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the model arena and its objects.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("expected {expected}, found {found}")]
    WrongObjectType {
        expected: &'static str,
        found: ObjectType,
    },

    #[error("thermal zone already has user view factors")]
    DuplicateZoneProperty,

    #[error("user view factor record has no thermal zone")]
    MissingThermalZone,

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Errors raised by writes to a generic extensible record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("group {index} is out of range (record has {count} groups)")]
    GroupIndexOutOfRange { index: usize, count: usize },

    #[error("field {0} is out of range")]
    FieldIndexOutOfRange(usize),

    #[error("field {field} is not a {expected} field")]
    FieldKindMismatch { field: usize, expected: &'static str },

    #[error("field {0} cannot hold a non-finite value")]
    NonFiniteValue(usize),

    #[error("pointer target does not exist in the model")]
    UnresolvedHandle,

    #[error("field {field} does not accept a reference to {found}")]
    ReferenceNotAccepted { field: usize, found: ObjectType },
}

/// Errors raised by view factor construction and record set operations.
#[derive(Debug, Error)]
pub enum ViewFactorError {
    #[error("unable to create view factor data, view factor of {0} more than 1")]
    ValueAboveOne(f64),

    #[error("view factor {index} is out of range (record has {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("failed to write view factor: {0}")]
    WriteFailed(#[source] RecordError),

    #[error("only {added} of {requested} view factors were added")]
    BatchIncomplete { requested: usize, added: usize },
}

impl ViewFactorError {
    /// Returns `false` for caller bugs (an invalid view factor value) and
    /// `true` for failures the caller can correct and retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ValueAboveOne(_))
    }
}

/// Convenience type alias for results using [`ZoneviewError`].
pub type Result<T, E = ZoneviewError> = std::result::Result<T, E>;
