//! Engine error types.
//!
//! - [`EngineError`] is returned by the query and mutation entry points.
//! - [`AssignError`] is raised while applying a coerced field to an entity and
//!   is folded into the mutation's rejected-field report, never propagated.
//! - Registry construction errors live with the registry
//!   ([`crate::schema::RegistryError`]).

use thiserror::Error;

use crate::value::ValueKind;

/// Errors returned by [`crate::Engine`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No product is stored under the identifier.
    ///
    /// This is an expected outcome; transports render it as a `null` result.
    #[error("Product not found: {0}")]
    NotFound(String),
}

impl EngineError {
    /// Whether this is a [`EngineError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failure to assign a single coerced field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// The entity has no assignable field with this name.
    #[error("field {0} cannot be assigned")]
    UnknownField(String),

    /// The value's type does not match the field's native type.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        /// Native type the field stores.
        expected: &'static str,
        /// Runtime type of the supplied value.
        found: ValueKind,
    },

    /// An integer does not fit the field's native width.
    #[error("{0} does not fit in a 32-bit integer")]
    OutOfRange(i64),

    /// A nested entity on the path does not exist.
    #[error("{0} does not exist")]
    MissingTarget(String),

    /// The path is malformed.
    #[error("invalid field path: {0}")]
    InvalidPath(String),
}
