//! Field-level access to stored entities.
//!
//! The resolver and the mutation executor are driven by type descriptors, not
//! by concrete structs. Entities expose their fields by schema name through
//! [`Resolvable`] (read) and [`Patchable`] (write); [`apply`] walks a
//! [`FieldPath`] down to the entity that owns the final field.

use crate::coercion::{FieldPath, PathSegment};
use crate::error::AssignError;
use crate::value::Value;

/// The current value of a field, as seen by the resolver.
pub enum FieldValue<'a> {
    /// A scalar or list-of-scalar value, copied out of the entity.
    Scalar(Value),
    /// A nested entity.
    Object(&'a dyn Resolvable),
    /// An ordered sequence of nested entities.
    List(Vec<&'a dyn Resolvable>),
    /// The field is unset, or the entity does not carry it.
    Null,
}

/// Read access to an entity's fields by schema name.
pub trait Resolvable {
    /// Current value of `field`.
    fn field(&self, field: &str) -> FieldValue<'_>;
}

/// Write access to an entity's fields by schema name.
///
/// Only the mutation executor holds a `&mut` to stored entities, so these
/// methods are never reachable from the query path.
pub trait Patchable {
    /// Assign an already-coerced value to a scalar or list-of-scalar field.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError`] if the entity has no such assignable field or
    /// the value does not fit its native type.
    fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError>;

    /// The nested entity stored under `field`, at `index` for list fields.
    fn nested_mut(&mut self, field: &str, index: Option<usize>) -> Option<&mut dyn Patchable>;
}

/// Assign `value` at `path` inside `target`.
///
/// # Errors
///
/// Returns [`AssignError::MissingTarget`] when an intermediate entity does not
/// exist (e.g. a variant index past the end), or whatever the owning entity's
/// [`Patchable::assign`] reports.
pub fn apply(target: &mut dyn Patchable, path: &FieldPath, value: Value) -> Result<(), AssignError> {
    apply_segments(target, path.segments(), path, value)
}

fn apply_segments(
    target: &mut dyn Patchable,
    segments: &[PathSegment],
    path: &FieldPath,
    value: Value,
) -> Result<(), AssignError> {
    match segments {
        [PathSegment::Field(name)] => target.assign(name, value),
        [PathSegment::Field(name), PathSegment::Index(index), rest @ ..] => {
            let child = target
                .nested_mut(name, Some(*index))
                .ok_or_else(|| AssignError::MissingTarget(format!("{name}[{index}]")))?;
            apply_segments(child, rest, path, value)
        }
        [PathSegment::Field(name), rest @ ..] => {
            let child = target
                .nested_mut(name, None)
                .ok_or_else(|| AssignError::MissingTarget(name.clone()))?;
            apply_segments(child, rest, path, value)
        }
        _ => Err(AssignError::InvalidPath(path.to_string())),
    }
}
