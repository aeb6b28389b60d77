//! Input coercion.
//!
//! Converts an untyped payload into typed field assignments against an input
//! descriptor. Every supplied field is judged on its own: a malformed field is
//! reported in [`Coercion::rejected`] and never prevents unrelated fields from
//! being applied. Keys unknown to the descriptor are ignored; keys not
//! supplied are not touched.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::schema::{FieldDescriptor, FieldKind, Registry, ScalarKind, TypeDescriptor};
use crate::value::{Value, ValueKind};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a field inside a payload, e.g. `variants[1].status`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The payload root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// This path extended by a field name.
    #[must_use]
    pub fn child(&self, field: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(field.into()));
        Self(segments)
    }

    /// This path extended by a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A field that passed coercion, with its native value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedField {
    pub path: FieldPath,
    pub value: Value,
}

/// A field that failed coercion or could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedField {
    pub path: FieldPath,
    /// Declared kind, when the failure was a type mismatch.
    pub expected: Option<FieldKind>,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of coercing one payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coercion {
    /// Accepted fields in descriptor order.
    pub applied: Vec<AppliedField>,
    pub rejected: Vec<RejectedField>,
}

impl Coercion {
    fn apply(&mut self, path: FieldPath, value: Value) {
        self.applied.push(AppliedField { path, value });
    }

    fn reject(&mut self, path: FieldPath, expected: &FieldKind, reason: String) {
        self.rejected.push(RejectedField {
            path,
            expected: Some(expected.clone()),
            reason,
        });
    }
}

/// Coerce `payload` against the input type `descriptor`.
#[must_use]
pub fn coerce(payload: &Value, descriptor: &TypeDescriptor, registry: &Registry) -> Coercion {
    let mut coercion = Coercion::default();
    match payload {
        Value::Object(fields) => {
            coerce_object(fields, descriptor, registry, &FieldPath::root(), &mut coercion);
        }
        // Nothing supplied.
        Value::Null => {}
        other => coercion.reject(
            FieldPath::root(),
            &FieldKind::Object(descriptor.name.clone()),
            mismatch(&descriptor.name, other.kind()),
        ),
    }
    coercion
}

fn coerce_object(
    fields: &BTreeMap<String, Value>,
    descriptor: &TypeDescriptor,
    registry: &Registry,
    path: &FieldPath,
    out: &mut Coercion,
) {
    for field in &descriptor.fields {
        if let Some(value) = fields.get(&field.name) {
            coerce_field(value, field, registry, path.child(&field.name), out);
        }
    }
}

fn coerce_field(
    value: &Value,
    field: &FieldDescriptor,
    registry: &Registry,
    path: FieldPath,
    out: &mut Coercion,
) {
    if value.is_null() {
        if field.nullable {
            out.apply(path, Value::Null);
        } else {
            out.reject(path, &field.kind, format!("expected {}, got null", field.kind));
        }
        return;
    }

    match (&field.kind, value) {
        (FieldKind::Scalar(kind), value) => match coerce_scalar(*kind, value) {
            Ok(native) => out.apply(path, native),
            Err(reason) => out.reject(path, &field.kind, reason),
        },
        (FieldKind::ScalarList(kind), Value::List(items)) => {
            let coerced: Result<Vec<Value>, String> = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    coerce_scalar(*kind, item).map_err(|reason| format!("element {i}: {reason}"))
                })
                .collect();
            match coerced {
                Ok(native) => out.apply(path, Value::List(native)),
                Err(reason) => out.reject(path, &field.kind, reason),
            }
        }
        (FieldKind::Object(type_name), Value::Object(nested)) => {
            match registry.input_type(type_name) {
                Some(descriptor) => coerce_object(nested, descriptor, registry, &path, out),
                None => out.reject(path, &field.kind, format!("{type_name} is not an input type")),
            }
        }
        (FieldKind::ObjectList(type_name), Value::List(items)) => {
            let Some(descriptor) = registry.input_type(type_name) else {
                out.reject(path, &field.kind, format!("{type_name} is not an input type"));
                return;
            };
            for (i, item) in items.iter().enumerate() {
                match item {
                    // Leaves the element at this index untouched.
                    Value::Null => {}
                    Value::Object(nested) => {
                        coerce_object(nested, descriptor, registry, &path.index(i), out);
                    }
                    other => out.reject(
                        path.index(i),
                        &FieldKind::Object(type_name.clone()),
                        mismatch(type_name, other.kind()),
                    ),
                }
            }
        }
        (kind, other) => out.reject(path, kind, mismatch(kind, other.kind())),
    }
}

/// Coerce a single scalar.
///
/// # Errors
///
/// Returns a human-readable reason when `value` cannot represent `kind`.
#[allow(clippy::cast_precision_loss)] // Int widens to Float, as in GraphQL input coercion
pub fn coerce_scalar(kind: ScalarKind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (ScalarKind::Int, Value::Int(n)) => i32::try_from(*n)
            .map(|_| Value::Int(*n))
            .map_err(|_| format!("Int cannot represent {n}: outside the 32-bit range")),
        (ScalarKind::Float, Value::Int(n)) => Ok(Value::Float(*n as f64)),
        (ScalarKind::Float, Value::Float(x)) => Ok(Value::Float(*x)),
        (ScalarKind::String | ScalarKind::Id, Value::String(s)) => Ok(Value::String(s.clone())),
        (ScalarKind::Id, Value::Int(n)) => Ok(Value::String(n.to_string())),
        (ScalarKind::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(*b)),
        (kind, other) => Err(mismatch(kind, other.kind())),
    }
}

fn mismatch(expected: impl fmt::Display, found: ValueKind) -> String {
    format!("expected {expected}, got {found}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{CatalogShape, VariantShape};
    use crate::types::KeyKind;

    fn registry() -> Registry {
        CatalogShape::default().registry().unwrap()
    }

    fn many_registry() -> Registry {
        CatalogShape {
            key_kind: KeyKind::String,
            variants: VariantShape::Many,
            upc: ScalarKind::Int,
        }
        .registry()
        .unwrap()
    }

    fn run(registry: &Registry, payload: serde_json::Value) -> Coercion {
        coerce(&Value::from(payload), registry.product_input(), registry)
    }

    fn paths(fields: &[AppliedField]) -> Vec<String> {
        fields.iter().map(|f| f.path.to_string()).collect()
    }

    #[test]
    fn test_partial_success() {
        let registry = registry();
        let coercion = run(&registry, json!({ "topCategory": 9, "variant": { "status": "bad" } }));
        assert_eq!(
            coercion.applied,
            vec![AppliedField {
                path: FieldPath::root().child("topCategory"),
                value: Value::Int(9),
            }]
        );
        assert_eq!(coercion.rejected.len(), 1);
        let rejected = &coercion.rejected[0];
        assert_eq!(rejected.path.to_string(), "variant.status");
        assert_eq!(rejected.expected, Some(FieldKind::Scalar(ScalarKind::Int)));
        assert_eq!(rejected.reason, "expected Int, got String");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let registry = registry();
        let coercion = run(&registry, json!({ "price": 10, "id": "43", "variant": { "color": "red" } }));
        assert!(coercion.applied.is_empty());
        assert!(coercion.rejected.is_empty());
    }

    #[test]
    fn test_scalar_list_preserves_order() {
        let registry = registry();
        let coercion = run(&registry, json!({ "variant": { "images": ["b", "a", "b"] } }));
        assert_eq!(paths(&coercion.applied), vec!["variant.images"]);
        assert_eq!(coercion.applied[0].value, Value::from(vec!["b", "a", "b"]));
    }

    #[test]
    fn test_scalar_list_with_bad_element_is_rejected_whole() {
        let registry = registry();
        let coercion = run(&registry, json!({ "variant": { "images": ["a", 2] } }));
        assert!(coercion.applied.is_empty());
        assert_eq!(
            coercion.rejected[0].reason,
            "element 1: expected String, got Int"
        );
        let coercion = run(&registry, json!({ "variant": { "images": "a" } }));
        assert_eq!(coercion.rejected[0].reason, "expected [String], got String");
    }

    #[test]
    fn test_null_handling() {
        let registry = registry();
        let coercion = run(
            &registry,
            json!({ "topCategory": null, "variant": { "upc": null, "externalId": null } }),
        );
        assert_eq!(paths(&coercion.applied), vec!["variant.upc", "variant.externalId"]);
        assert_eq!(coercion.rejected[0].path.to_string(), "topCategory");
        assert_eq!(coercion.rejected[0].reason, "expected Int, got null");
    }

    #[test]
    fn test_int_range() {
        let registry = registry();
        let coercion = run(&registry, json!({ "topCategory": 4_294_967_296_i64 }));
        assert!(coercion.applied.is_empty());
        assert!(coercion.rejected[0].reason.contains("32-bit"));
        let coercion = run(&registry, json!({ "topCategory": 2.5 }));
        assert_eq!(coercion.rejected[0].reason, "expected Int, got Float");
    }

    #[test]
    fn test_nested_field_with_wrong_shape() {
        let registry = registry();
        let coercion = run(&registry, json!({ "variant": [1, 2] }));
        assert_eq!(coercion.rejected[0].path.to_string(), "variant");
        assert_eq!(coercion.rejected[0].reason, "expected VariantInput, got List");
    }

    #[test]
    fn test_variant_list_patches_by_index() {
        let registry = many_registry();
        let coercion = run(
            &registry,
            json!({ "variants": [null, { "status": 2, "upc": 123 }, "oops", { "upc": "A1" }] }),
        );
        assert_eq!(
            paths(&coercion.applied),
            vec!["variants[1].status", "variants[1].upc"]
        );
        let rejected: Vec<_> = coercion.rejected.iter().map(|r| r.path.to_string()).collect();
        assert_eq!(rejected, vec!["variants[2]", "variants[3].upc"]);
        assert_eq!(coercion.rejected[1].reason, "expected Int, got String");
    }

    #[test]
    fn test_non_object_payload() {
        let registry = registry();
        let coercion = coerce(&Value::Int(3), registry.product_input(), &registry);
        assert!(coercion.rejected[0].path.is_root());
        assert!(run(&registry, serde_json::Value::Null).rejected.is_empty());
    }

    #[test]
    fn test_coerce_scalar() {
        assert_eq!(
            coerce_scalar(ScalarKind::Float, &Value::Int(2)),
            Ok(Value::Float(2.0))
        );
        assert_eq!(
            coerce_scalar(ScalarKind::Id, &Value::Int(42)),
            Ok(Value::from("42"))
        );
        assert!(coerce_scalar(ScalarKind::Boolean, &Value::from("true")).is_err());
    }

    #[test]
    fn test_field_path_display() {
        let path = FieldPath::root().child("variants").index(1).child("status");
        assert_eq!(path.to_string(), "variants[1].status");
        assert_eq!(
            serde_json::to_value(&path).unwrap(),
            json!("variants[1].status")
        );
    }
}
