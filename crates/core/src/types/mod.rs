//! Core catalog types.
//!
//! Identifiers and the stored product/variant records.

pub mod id;
pub mod product;

pub use id::{KeyKind, ProductKey};
pub use product::{Product, Upc, Variant};
