//! Field resolution.
//!
//! Walks a [`SelectionSet`] against an entity and its output descriptor,
//! producing a JSON object in request order. Resolution only reads; unknown
//! fields are dropped and unset fields come out as `null`.

use serde_json::Value as Json;

use crate::entity::{FieldValue, Resolvable};
use crate::schema::{FieldDescriptor, FieldKind, Registry, TypeDescriptor};
use crate::selection::{Selection, SelectionSet};

/// A resolved object, keys in request order.
pub type OutputObject = serde_json::Map<String, Json>;

/// Introspection field answered with the descriptor's type name.
pub const TYPENAME_FIELD: &str = "__typename";

/// Resolve `selection` against `entity`, described by `descriptor`.
#[must_use]
pub fn resolve(
    entity: &dyn Resolvable,
    descriptor: &TypeDescriptor,
    selection: &SelectionSet,
    registry: &Registry,
) -> OutputObject {
    let mut output = OutputObject::new();
    for selected in selection {
        if selected.name == TYPENAME_FIELD {
            output.insert(
                selected.response_key().to_owned(),
                Json::String(descriptor.name.clone()),
            );
            continue;
        }
        let Some(field) = descriptor.field(&selected.name) else {
            tracing::trace!(
                type_name = %descriptor.name,
                field = %selected.name,
                "Dropping unknown field"
            );
            continue;
        };
        let value = resolve_field(entity.field(&field.name), field, selected, registry);
        output.insert(selected.response_key().to_owned(), value);
    }
    output
}

fn resolve_field(
    value: FieldValue<'_>,
    field: &FieldDescriptor,
    selected: &Selection,
    registry: &Registry,
) -> Json {
    match (&field.kind, value) {
        (FieldKind::Scalar(_) | FieldKind::ScalarList(_), FieldValue::Scalar(value)) => value.into(),
        (FieldKind::Object(type_name), FieldValue::Object(child)) => {
            resolve_nested(child, type_name, selected, registry)
        }
        (FieldKind::ObjectList(type_name), FieldValue::List(children)) => Json::Array(
            children
                .into_iter()
                .map(|child| resolve_nested(child, type_name, selected, registry))
                .collect(),
        ),
        _ => Json::Null,
    }
}

fn resolve_nested(
    child: &dyn Resolvable,
    type_name: &str,
    selected: &Selection,
    registry: &Registry,
) -> Json {
    let (Some(descriptor), Some(selection)) =
        (registry.output_type(type_name), selected.selection_set.as_ref())
    else {
        return Json::Null;
    };
    Json::Object(resolve(child, descriptor, selection, registry))
}
