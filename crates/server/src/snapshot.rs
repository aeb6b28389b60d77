//! Snapshot loading.
//!
//! A snapshot is a JSON object mapping each product identifier to its record:
//!
//! ```json
//! { "42": { "id": 42, "topCategory": 1,
//!           "variant": { "status": 0, "upc": "A1", "externalId": "x", "images": ["u1"] } } }
//! ```
//!
//! Multi-variant catalogs use a `variants` array instead of `variant`. Every
//! record is checked against the configured [`CatalogShape`]; a dataset that
//! disagrees with it is rejected rather than converted.

use std::path::{Path, PathBuf};

use catalog_graph_core::{
    CatalogShape, Engine, EntityStore, KeyKind, Product, ProductKey, RegistryError, ScalarKind,
    Upc, Value, Variant, VariantShape,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid record for product {id}: {source}")]
    Record {
        id: String,
        source: serde_json::Error,
    },

    #[error("Product key {key:?} is not a valid {kind} key")]
    InvalidKey { key: String, kind: KeyKind },

    #[error("Product {id} does not match the catalog shape: {reason}")]
    ShapeMismatch { id: String, reason: String },
}

/// Errors raised while building an engine at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    variant: Option<VariantRecord>,
    #[serde(default)]
    variants: Option<Vec<VariantRecord>>,
    top_category: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantRecord {
    status: i32,
    #[serde(default)]
    upc: Option<UpcRecord>,
    #[serde(default)]
    external_id: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpcRecord {
    Text(String),
    Number(i64),
}

/// Read and parse the snapshot at `path`.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the file cannot be read or any record fails
/// validation.
pub fn load(path: &Path, shape: &CatalogShape) -> Result<EntityStore, SnapshotError> {
    let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = parse(&json, shape)?;
    tracing::info!(
        path = %path.display(),
        products = store.len(),
        "Snapshot loaded"
    );
    Ok(store)
}

/// Build the registry for `shape` and an engine over the snapshot at `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the registry is invalid or the snapshot cannot be
/// loaded.
pub fn load_engine(path: &Path, shape: &CatalogShape) -> Result<Engine, LoadError> {
    let registry = shape.registry()?;
    let store = load(path, shape)?;
    Ok(Engine::new(registry, store))
}

/// Parse snapshot JSON into a store.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the JSON is malformed or any record fails
/// validation.
pub fn parse(json: &str, shape: &CatalogShape) -> Result<EntityStore, SnapshotError> {
    let records: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    let products = records
        .into_iter()
        .map(|(key, record)| product_from_record(key, record, shape))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EntityStore::from_products(products))
}

fn product_from_record(
    key: String,
    record: serde_json::Value,
    shape: &CatalogShape,
) -> Result<Product, SnapshotError> {
    let Some(id) = ProductKey::parse(&key, shape.key_kind) else {
        return Err(SnapshotError::InvalidKey {
            key,
            kind: shape.key_kind,
        });
    };
    let record: ProductRecord =
        serde_json::from_value(record).map_err(|source| SnapshotError::Record {
            id: key.clone(),
            source,
        })?;
    let mismatch = |reason: String| SnapshotError::ShapeMismatch {
        id: key.clone(),
        reason,
    };

    if let Some(raw) = record.id {
        let value = Value::from(raw);
        if ProductKey::from_value(&value, shape.key_kind).as_ref() != Some(&id) {
            return Err(mismatch(format!("record id {value} does not match its key")));
        }
    }

    let variants = match (shape.variants, record.variant, record.variants) {
        (VariantShape::Single, _, Some(_)) => {
            return Err(mismatch(
                "has a variants list but the catalog expects a single variant".to_string(),
            ));
        }
        (VariantShape::Many, Some(_), _) => {
            return Err(mismatch(
                "has a single variant but the catalog expects a variants list".to_string(),
            ));
        }
        (VariantShape::Single, variant, None) => variant.into_iter().collect(),
        (VariantShape::Many, None, variants) => variants.unwrap_or_default(),
    };

    let mut product = Product::new(id, record.top_category);
    for (index, variant) in variants.into_iter().enumerate() {
        let upc = match (variant.upc, shape.upc) {
            (None, _) => None,
            (Some(UpcRecord::Text(code)), ScalarKind::String) => Some(Upc::Text(code)),
            (Some(UpcRecord::Number(code)), ScalarKind::Int) => Some(Upc::Number(code)),
            (Some(other), kind) => {
                return Err(mismatch(format!(
                    "variant {index} has upc {other:?} but the catalog declares {kind}"
                )));
            }
        };
        product = product.with_variant(Variant {
            status: variant.status,
            upc,
            external_id: variant.external_id,
            images: variant.images.unwrap_or_default(),
        });
    }
    Ok(product)
}
