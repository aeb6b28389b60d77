//! The validated, immutable type registry.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::schema::descriptor::{TypeDescriptor, TypeUsage};
use crate::types::KeyKind;

/// Name of the root output type.
pub const PRODUCT_TYPE: &str = "Product";
/// Name of the root input type used by mutations.
pub const PRODUCT_INPUT_TYPE: &str = "ProductInput";

/// Inconsistencies found while building a [`Registry`].
///
/// These are fatal at startup and cannot occur once a registry exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateType(String),

    #[error("Duplicate field {field} on type {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("Field {type_name}.{field} references undeclared type {target}")]
    UndeclaredType {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("Field {type_name}.{field} references {target}, which is not an {usage} type")]
    UsageMismatch {
        type_name: String,
        field: String,
        target: String,
        usage: &'static str,
    },

    #[error("Missing root type: {0}")]
    MissingRoot(&'static str),

    #[error("Type cycle detected involving {0}")]
    Cycle(String),
}

/// Immutable lookup table of type descriptors.
///
/// Cheap to share behind an `Arc`; needs no synchronization.
#[derive(Debug, Clone)]
pub struct Registry {
    types: HashMap<String, Arc<TypeDescriptor>>,
    product: Arc<TypeDescriptor>,
    product_input: Arc<TypeDescriptor>,
    key_kind: KeyKind,
}

impl Registry {
    /// Validate `descriptors` and build the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on duplicate types or fields, references to
    /// undeclared types, output/input usage mismatches, missing root types or
    /// cycles between nested types.
    pub fn new(descriptors: Vec<TypeDescriptor>, key_kind: KeyKind) -> Result<Self, RegistryError> {
        let mut types = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            check_duplicate_fields(&descriptor)?;
            let name = descriptor.name.clone();
            if types.insert(name.clone(), Arc::new(descriptor)).is_some() {
                return Err(RegistryError::DuplicateType(name));
            }
        }

        for descriptor in types.values() {
            check_references(descriptor, &types)?;
        }
        check_acyclic(&types)?;

        let product = root(&types, PRODUCT_TYPE, TypeUsage::is_output)?;
        let product_input = root(&types, PRODUCT_INPUT_TYPE, TypeUsage::is_input)?;

        tracing::debug!(types = types.len(), %key_kind, "Type registry validated");

        Ok(Self {
            types,
            product,
            product_input,
            key_kind,
        })
    }

    /// Look up any type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name).map(AsRef::as_ref)
    }

    /// Look up a type usable as output.
    #[must_use]
    pub fn output_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.get(name).filter(|t| t.usage.is_output())
    }

    /// Look up a type usable as input.
    #[must_use]
    pub fn input_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.get(name).filter(|t| t.usage.is_input())
    }

    /// The root output type.
    #[must_use]
    pub fn product(&self) -> &TypeDescriptor {
        &self.product
    }

    /// The root input type for mutations.
    #[must_use]
    pub fn product_input(&self) -> &TypeDescriptor {
        &self.product_input
    }

    /// Representation of product identifiers.
    #[must_use]
    pub const fn key_kind(&self) -> KeyKind {
        self.key_kind
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Declared type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn check_duplicate_fields(descriptor: &TypeDescriptor) -> Result<(), RegistryError> {
    for (i, field) in descriptor.fields.iter().enumerate() {
        if descriptor
            .fields
            .iter()
            .skip(i + 1)
            .any(|other| other.name == field.name)
        {
            return Err(RegistryError::DuplicateField {
                type_name: descriptor.name.clone(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_references(
    descriptor: &TypeDescriptor,
    types: &HashMap<String, Arc<TypeDescriptor>>,
) -> Result<(), RegistryError> {
    for field in &descriptor.fields {
        let Some(target_name) = field.kind.nested_type() else {
            continue;
        };
        let Some(target) = types.get(target_name) else {
            return Err(RegistryError::UndeclaredType {
                type_name: descriptor.name.clone(),
                field: field.name.clone(),
                target: target_name.to_owned(),
            });
        };

        let mismatch = |usage| RegistryError::UsageMismatch {
            type_name: descriptor.name.clone(),
            field: field.name.clone(),
            target: target_name.to_owned(),
            usage,
        };
        if descriptor.usage.is_output() && !target.usage.is_output() {
            return Err(mismatch("output"));
        }
        if descriptor.usage.is_input() && !target.usage.is_input() {
            return Err(mismatch("input"));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Depth-first search over nested-type edges; resolution and coercion recurse
/// along these edges, so they must form a DAG.
fn check_acyclic(types: &HashMap<String, Arc<TypeDescriptor>>) -> Result<(), RegistryError> {
    fn visit<'a>(
        name: &'a str,
        types: &'a HashMap<String, Arc<TypeDescriptor>>,
        state: &mut HashMap<&'a str, Visit>,
    ) -> Result<(), RegistryError> {
        match state.get(name) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => return Err(RegistryError::Cycle(name.to_owned())),
            None => {}
        }
        state.insert(name, Visit::InProgress);
        if let Some(descriptor) = types.get(name) {
            for field in &descriptor.fields {
                if let Some(target) = field.kind.nested_type() {
                    visit(target, types, state)?;
                }
            }
        }
        state.insert(name, Visit::Done);
        Ok(())
    }

    let mut state = HashMap::with_capacity(types.len());
    let mut names: Vec<&str> = types.keys().map(String::as_str).collect();
    names.sort_unstable();
    for name in names {
        visit(name, types, &mut state)?;
    }
    Ok(())
}

fn root(
    types: &HashMap<String, Arc<TypeDescriptor>>,
    name: &'static str,
    usable: fn(TypeUsage) -> bool,
) -> Result<Arc<TypeDescriptor>, RegistryError> {
    types
        .get(name)
        .filter(|t| usable(t.usage))
        .cloned()
        .ok_or(RegistryError::MissingRoot(name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schema::descriptor::{FieldDescriptor, FieldKind, ScalarKind};

    fn int(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, FieldKind::Scalar(ScalarKind::Int))
    }

    fn object(name: &str, target: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, FieldKind::Object(target.to_string()))
    }

    fn roots() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::new(PRODUCT_TYPE, TypeUsage::Output, vec![int("topCategory")]),
            TypeDescriptor::new(PRODUCT_INPUT_TYPE, TypeUsage::Input, vec![int("topCategory")]),
        ]
    }

    #[test]
    fn test_minimal_registry() {
        let registry = Registry::new(roots(), KeyKind::String).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.product().name, PRODUCT_TYPE);
        assert_eq!(registry.product_input().name, PRODUCT_INPUT_TYPE);
        assert!(registry.output_type(PRODUCT_INPUT_TYPE).is_none());
        assert!(registry.input_type(PRODUCT_TYPE).is_none());
        assert_eq!(registry.type_names(), vec![PRODUCT_TYPE, PRODUCT_INPUT_TYPE]);
    }

    #[test]
    fn test_duplicate_type() {
        let mut types = roots();
        types.push(TypeDescriptor::new(PRODUCT_TYPE, TypeUsage::Output, vec![]));
        assert_eq!(
            Registry::new(types, KeyKind::String).unwrap_err(),
            RegistryError::DuplicateType(PRODUCT_TYPE.to_string())
        );
    }

    #[test]
    fn test_duplicate_field() {
        let mut types = roots();
        types.push(TypeDescriptor::new(
            "Variant",
            TypeUsage::Output,
            vec![int("status"), int("status")],
        ));
        assert!(matches!(
            Registry::new(types, KeyKind::String).unwrap_err(),
            RegistryError::DuplicateField { field, .. } if field == "status"
        ));
    }

    #[test]
    fn test_undeclared_nested_type() {
        let types = vec![
            TypeDescriptor::new(
                PRODUCT_TYPE,
                TypeUsage::Output,
                vec![object("variant", "Variant")],
            ),
            TypeDescriptor::new(PRODUCT_INPUT_TYPE, TypeUsage::Input, vec![]),
        ];
        let err = Registry::new(types, KeyKind::String).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field Product.variant references undeclared type Variant"
        );
    }

    #[test]
    fn test_input_type_cannot_nest_output_type() {
        let types = vec![
            TypeDescriptor::new(PRODUCT_TYPE, TypeUsage::Output, vec![]),
            TypeDescriptor::new(
                PRODUCT_INPUT_TYPE,
                TypeUsage::Input,
                vec![object("variant", "Variant")],
            ),
            TypeDescriptor::new("Variant", TypeUsage::Output, vec![int("status")]),
        ];
        assert!(matches!(
            Registry::new(types, KeyKind::String).unwrap_err(),
            RegistryError::UsageMismatch { usage: "input", .. }
        ));
    }

    #[test]
    fn test_missing_root() {
        let types = vec![TypeDescriptor::new(PRODUCT_TYPE, TypeUsage::Output, vec![])];
        assert_eq!(
            Registry::new(types, KeyKind::String).unwrap_err(),
            RegistryError::MissingRoot(PRODUCT_INPUT_TYPE)
        );
    }

    #[test]
    fn test_root_with_wrong_usage() {
        let types = vec![
            TypeDescriptor::new(PRODUCT_TYPE, TypeUsage::Input, vec![]),
            TypeDescriptor::new(PRODUCT_INPUT_TYPE, TypeUsage::Input, vec![]),
        ];
        assert_eq!(
            Registry::new(types, KeyKind::String).unwrap_err(),
            RegistryError::MissingRoot(PRODUCT_TYPE)
        );
    }

    #[test]
    fn test_cycle_detected() {
        let mut types = roots();
        types.push(TypeDescriptor::new(
            "Node",
            TypeUsage::Output,
            vec![object("next", "Node")],
        ));
        assert_eq!(
            Registry::new(types, KeyKind::String).unwrap_err(),
            RegistryError::Cycle("Node".to_string())
        );
    }

    #[test]
    fn test_shared_nested_type_is_not_a_cycle() {
        let types = vec![
            TypeDescriptor::new(
                PRODUCT_TYPE,
                TypeUsage::Output,
                vec![object("primary", "Image"), object("secondary", "Image")],
            ),
            TypeDescriptor::new(PRODUCT_INPUT_TYPE, TypeUsage::Input, vec![]),
            TypeDescriptor::new("Image", TypeUsage::Both, vec![int("width")]),
        ];
        assert!(Registry::new(types, KeyKind::Integer).is_ok());
    }
}
