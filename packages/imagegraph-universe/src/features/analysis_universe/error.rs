//! Analysis universe errors

use crate::shared::models::{FieldId, MethodId, TypeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("Unknown type {0}")]
    UnknownType(TypeId),

    #[error("Unknown method {0}")]
    UnknownMethod(MethodId),

    #[error("Unknown field {0}")]
    UnknownField(FieldId),

    /// Superclass that is not a class, implemented type that is not an interface, ...
    #[error("Invalid hierarchy for '{name}': {reason}")]
    InvalidHierarchy { name: String, reason: String },
}

pub type UniverseResult<T> = Result<T, UniverseError>;
