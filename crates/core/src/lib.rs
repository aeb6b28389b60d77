//! Catalog Graph Core - the query and mutation engine.
//!
//! This crate holds an in-memory catalog of products and their variants and
//! answers two kinds of requests against it:
//! - queries, which select a subset of a product's fields ([`Engine::query`])
//! - partial mutations, which coerce an untyped payload field by field and
//!   report what was applied and what was rejected ([`Engine::mutate`])
//!
//! # Architecture
//!
//! Like the rest of the workspace's shared code, the core crate does no I/O:
//! no HTTP, no file access. Loading snapshots and parsing GraphQL text belong
//! to `catalog-graph-server`.
//!
//! # Modules
//!
//! - [`schema`] - Type descriptors and the validated [`Registry`]
//! - [`types`] - Product keys and the stored product/variant records
//! - [`value`] - Untyped request values
//! - [`selection`] - Parsed field selections
//! - [`resolver`] - Descriptor-driven field resolution
//! - [`coercion`] - Input coercion into applied/rejected fields
//! - [`entity`] - Field-level read/write access to records
//! - [`store`] - The keyed entity store
//! - [`executor`] - The [`Engine`] tying it all together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod coercion;
pub mod entity;
pub mod error;
pub mod executor;
pub mod resolver;
pub mod schema;
pub mod selection;
pub mod store;
pub mod types;
pub mod value;

pub use coercion::{AppliedField, Coercion, FieldPath, PathSegment, RejectedField};
pub use error::{AssignError, EngineError};
pub use executor::{Engine, MutationOutcome};
pub use resolver::OutputObject;
pub use schema::{CatalogShape, Registry, RegistryError, ScalarKind, VariantShape};
pub use selection::{Selection, SelectionSet};
pub use store::EntityStore;
pub use types::*;
pub use value::{Value, ValueKind};
