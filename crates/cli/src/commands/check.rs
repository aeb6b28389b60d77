//! Snapshot validation.

use std::path::Path;

use catalog_graph_core::CatalogShape;
use catalog_graph_server::load_engine;
use tracing::info;

/// Build the registry for `shape`, load the snapshot and print a summary.
///
/// # Errors
///
/// Returns an error if the registry is invalid or the snapshot fails to load
/// or does not match the shape.
#[allow(clippy::print_stdout)]
pub fn run(path: &Path, shape: &CatalogShape) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        path = %path.display(),
        key_kind = %shape.key_kind,
        variants = %shape.variants,
        upc = %shape.upc,
        "Checking snapshot"
    );
    let engine = load_engine(path, shape)?;

    println!(
        "{}: {} products ({} keys, {} variant field, {} upc)",
        path.display(),
        engine.len(),
        shape.key_kind,
        shape.variants.field_name(),
        shape.upc,
    );
    println!("Types: {}", engine.registry().type_names().join(", "));
    Ok(())
}
