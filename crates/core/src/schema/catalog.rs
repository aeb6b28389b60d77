//! The product catalog's type table.
//!
//! Observed datasets disagree on two points: whether a product has a single
//! `variant` or a list of `variants`, and whether `upc` is textual or numeric.
//! Both are carried as [`CatalogShape`] configuration and resolved into the
//! descriptor table once, when the registry is built.

use core::fmt;

use crate::schema::descriptor::{
    FieldDescriptor, FieldKind, ScalarKind, TypeDescriptor, TypeUsage,
};
use crate::schema::registry::{PRODUCT_INPUT_TYPE, PRODUCT_TYPE, Registry, RegistryError};
use crate::types::KeyKind;

/// Output type name for variants.
pub const VARIANT_TYPE: &str = "Variant";
/// Input type name for variant patches.
pub const VARIANT_INPUT_TYPE: &str = "VariantInput";

/// How many variants a product exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariantShape {
    /// A single `variant` object.
    #[default]
    Single,
    /// A `variants` list.
    Many,
}

impl VariantShape {
    /// Name of the product field holding variants.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Single => "variant",
            Self::Many => "variants",
        }
    }
}

impl fmt::Display for VariantShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Many => write!(f, "many"),
        }
    }
}

impl std::str::FromStr for VariantShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" | "one" => Ok(Self::Single),
            "many" | "list" => Ok(Self::Many),
            _ => Err(format!("invalid variant shape: {s} (expected single or many)")),
        }
    }
}

/// Configuration resolved into the catalog's descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogShape {
    pub key_kind: KeyKind,
    pub variants: VariantShape,
    /// Declared scalar type of `upc`.
    pub upc: ScalarKind,
}

impl Default for CatalogShape {
    fn default() -> Self {
        Self {
            key_kind: KeyKind::String,
            variants: VariantShape::Single,
            upc: ScalarKind::String,
        }
    }
}

impl CatalogShape {
    /// The descriptor table for this shape.
    #[must_use]
    pub fn descriptors(&self) -> Vec<TypeDescriptor> {
        let id_kind = match self.key_kind {
            KeyKind::String => ScalarKind::Id,
            KeyKind::Integer => ScalarKind::Int,
        };
        let variants = |target: &str| {
            let kind = match self.variants {
                VariantShape::Single => FieldKind::Object(target.to_owned()),
                VariantShape::Many => FieldKind::ObjectList(target.to_owned()),
            };
            FieldDescriptor::new(self.variants.field_name(), kind)
        };
        let variant_fields = || {
            vec![
                FieldDescriptor::new("status", FieldKind::Scalar(ScalarKind::Int)).non_null(),
                FieldDescriptor::new("upc", FieldKind::Scalar(self.upc)),
                FieldDescriptor::new("externalId", FieldKind::Scalar(ScalarKind::String)),
                FieldDescriptor::new("images", FieldKind::ScalarList(ScalarKind::String))
                    .non_null(),
            ]
        };

        vec![
            TypeDescriptor::new(
                PRODUCT_TYPE,
                TypeUsage::Output,
                vec![
                    FieldDescriptor::new("id", FieldKind::Scalar(id_kind)).non_null(),
                    variants(VARIANT_TYPE),
                    FieldDescriptor::new("topCategory", FieldKind::Scalar(ScalarKind::Int))
                        .non_null(),
                ],
            ),
            TypeDescriptor::new(VARIANT_TYPE, TypeUsage::Output, variant_fields()),
            TypeDescriptor::new(
                PRODUCT_INPUT_TYPE,
                TypeUsage::Input,
                vec![
                    variants(VARIANT_INPUT_TYPE).non_null(),
                    FieldDescriptor::new("topCategory", FieldKind::Scalar(ScalarKind::Int))
                        .non_null(),
                ],
            ),
            TypeDescriptor::new(VARIANT_INPUT_TYPE, TypeUsage::Input, variant_fields()),
        ]
    }

    /// Build and validate the registry for this shape.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the table is inconsistent.
    pub fn registry(&self) -> Result<Registry, RegistryError> {
        Registry::new(self.descriptors(), self.key_kind)
    }
}
