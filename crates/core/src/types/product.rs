//! Stored product and variant records.

use crate::entity::{FieldValue, Patchable, Resolvable};
use crate::error::AssignError;
use crate::types::id::ProductKey;
use crate::value::Value;

/// A variant's universal product code.
///
/// Datasets disagree on whether UPCs are numeric or textual. The registry
/// declares which one a deployment accepts; both are representable here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Upc {
    Text(String),
    Number(i64),
}

impl From<&Upc> for Value {
    fn from(upc: &Upc) -> Self {
        match upc {
            Upc::Text(code) => Self::String(code.clone()),
            Upc::Number(code) => Self::Int(*code),
        }
    }
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variant {
    /// Status code.
    pub status: i32,
    pub upc: Option<Upc>,
    /// Identifier in an external system.
    pub external_id: Option<String>,
    /// Image URIs. Order matters and duplicates are kept.
    pub images: Vec<String>,
}

/// A catalog product, the root entity of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Copy of the store key, kept for output.
    pub id: ProductKey,
    /// Variants in dataset order. Single-variant catalogs expose the first.
    pub variants: Vec<Variant>,
    /// Category code.
    pub top_category: i32,
}

impl Product {
    /// Create a product with no variants.
    #[must_use]
    pub const fn new(id: ProductKey, top_category: i32) -> Self {
        Self {
            id,
            variants: Vec::new(),
            top_category,
        }
    }

    /// Add a variant.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// The first variant, which single-variant catalogs expose as `variant`.
    #[must_use]
    pub fn variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}

impl Resolvable for Product {
    fn field(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::Scalar(self.id.to_value()),
            "topCategory" => FieldValue::Scalar(self.top_category.into()),
            "variant" => self
                .variants
                .first()
                .map_or(FieldValue::Null, |v| FieldValue::Object(v)),
            "variants" => FieldValue::List(
                self.variants
                    .iter()
                    .map(|v| v as &dyn Resolvable)
                    .collect(),
            ),
            _ => FieldValue::Null,
        }
    }
}

impl Patchable for Product {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError> {
        match field {
            "topCategory" => self.top_category = expect_i32(&value)?,
            _ => return Err(AssignError::UnknownField(field.to_owned())),
        }
        Ok(())
    }

    fn nested_mut(&mut self, field: &str, index: Option<usize>) -> Option<&mut dyn Patchable> {
        let variant = match (field, index) {
            ("variant", None) => self.variants.first_mut()?,
            ("variants", Some(index)) => self.variants.get_mut(index)?,
            _ => return None,
        };
        Some(variant)
    }
}

impl Resolvable for Variant {
    fn field(&self, field: &str) -> FieldValue<'_> {
        let value = match field {
            "status" => Value::from(self.status),
            "upc" => self.upc.as_ref().map_or(Value::Null, Value::from),
            "externalId" => Value::from(self.external_id.clone()),
            "images" => Value::from(self.images.clone()),
            _ => return FieldValue::Null,
        };
        FieldValue::Scalar(value)
    }
}

impl Patchable for Variant {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError> {
        match field {
            "status" => self.status = expect_i32(&value)?,
            "upc" => {
                self.upc = match value {
                    Value::Null => None,
                    Value::Int(code) => Some(Upc::Number(code)),
                    Value::String(code) => Some(Upc::Text(code)),
                    other => {
                        return Err(AssignError::TypeMismatch {
                            expected: "Int or String",
                            found: other.kind(),
                        });
                    }
                };
            }
            "externalId" => {
                self.external_id = match value {
                    Value::Null => None,
                    Value::String(id) => Some(id),
                    other => {
                        return Err(AssignError::TypeMismatch {
                            expected: "String",
                            found: other.kind(),
                        });
                    }
                };
            }
            "images" => self.images = expect_strings(value)?,
            _ => return Err(AssignError::UnknownField(field.to_owned())),
        }
        Ok(())
    }

    fn nested_mut(&mut self, _field: &str, _index: Option<usize>) -> Option<&mut dyn Patchable> {
        None
    }
}

fn expect_i32(value: &Value) -> Result<i32, AssignError> {
    match value {
        Value::Int(n) => i32::try_from(*n).map_err(|_| AssignError::OutOfRange(*n)),
        other => Err(AssignError::TypeMismatch {
            expected: "Int",
            found: other.kind(),
        }),
    }
}

fn expect_strings(value: Value) -> Result<Vec<String>, AssignError> {
    let Value::List(items) = value else {
        return Err(AssignError::TypeMismatch {
            expected: "[String]",
            found: value.kind(),
        });
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(AssignError::TypeMismatch {
                expected: "String",
                found: other.kind(),
            }),
        })
        .collect()
}
