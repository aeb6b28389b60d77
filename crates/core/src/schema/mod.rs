//! Type descriptor registry.
//!
//! A static table describing every output type (consumed by the resolver) and
//! input type (consumed by the coercion engine). The table is plain data,
//! validated once by [`Registry::new`]; after that it is never mutated.

pub mod catalog;
pub mod descriptor;
pub mod registry;

pub use catalog::{CatalogShape, VARIANT_INPUT_TYPE, VARIANT_TYPE, VariantShape};
pub use descriptor::{FieldDescriptor, FieldKind, ScalarKind, TypeDescriptor, TypeUsage};
pub use registry::{PRODUCT_INPUT_TYPE, PRODUCT_TYPE, Registry, RegistryError};
