//! Query and mutation executors.
//!
//! [`Engine`] is the only entry point the transport needs: [`Engine::query`]
//! for reads and [`Engine::mutate`] for partial updates. Both take the raw
//! identifier from the request and report an unknown or unparseable one as
//! [`EngineError::NotFound`].

use std::sync::Arc;

use crate::coercion::{AppliedField, RejectedField, coerce};
use crate::entity::apply;
use crate::error::EngineError;
use crate::resolver::{OutputObject, resolve};
use crate::schema::Registry;
use crate::selection::SelectionSet;
use crate::store::EntityStore;
use crate::types::{Product, ProductKey};
use crate::value::Value;

/// Result of a mutation: the product after the update plus the field report.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// State of the product when the mutation released it.
    pub product: Product,
    pub applied: Vec<AppliedField>,
    pub rejected: Vec<RejectedField>,
}

/// Executes queries and mutations against an [`EntityStore`].
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<Registry>,
    store: Arc<EntityStore>,
}

impl Engine {
    /// Create an engine over a populated store.
    pub fn new(registry: impl Into<Arc<Registry>>, store: impl Into<Arc<EntityStore>>) -> Self {
        Self {
            registry: registry.into(),
            store: store.into(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Resolve `selection` on the product identified by `id`.
    ///
    /// Holds the product's read lock while resolving, so a concurrent
    /// mutation of the same product is either fully visible or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no product matches `id`.
    pub fn query(&self, id: &Value, selection: &SelectionSet) -> Result<OutputObject, EngineError> {
        let key = self.key(id)?;
        let product = self
            .store
            .read(&key)
            .ok_or_else(|| EngineError::NotFound(key.to_string()))?;
        tracing::debug!(id = %key, fields = selection.selections.len(), "Resolving product");
        Ok(resolve(&*product, self.registry.product(), selection, &self.registry))
    }

    /// Apply `payload` as a partial update to the product identified by `id`.
    ///
    /// Lookup, coercion and application all happen under the product's write
    /// lock. Fields are applied one by one; failures are reported in
    /// [`MutationOutcome::rejected`] and do not stop the remaining fields.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no product matches `id`.
    pub fn mutate(&self, id: &Value, payload: &Value) -> Result<MutationOutcome, EngineError> {
        let key = self.key(id)?;
        let mut product = self
            .store
            .write(&key)
            .ok_or_else(|| EngineError::NotFound(key.to_string()))?;

        let coercion = coerce(payload, self.registry.product_input(), &self.registry);
        let mut applied = Vec::with_capacity(coercion.applied.len());
        let mut rejected = coercion.rejected;
        for field in coercion.applied {
            match apply(&mut *product, &field.path, field.value.clone()) {
                Ok(()) => applied.push(field),
                Err(err) => rejected.push(RejectedField {
                    path: field.path,
                    expected: None,
                    reason: err.to_string(),
                }),
            }
        }
        let snapshot = product.clone();
        drop(product);

        if rejected.is_empty() {
            tracing::debug!(id = %key, applied = applied.len(), "Product mutated");
        } else {
            tracing::warn!(
                id = %key,
                applied = applied.len(),
                rejected = rejected.len(),
                "Product mutated with rejected fields"
            );
        }

        Ok(MutationOutcome {
            product: snapshot,
            applied,
            rejected,
        })
    }

    /// Resolve `selection` against a detached product, such as a
    /// [`MutationOutcome::product`].
    #[must_use]
    pub fn resolve(&self, product: &Product, selection: &SelectionSet) -> OutputObject {
        resolve(product, self.registry.product(), selection, &self.registry)
    }

    fn key(&self, id: &Value) -> Result<ProductKey, EngineError> {
        ProductKey::from_value(id, self.registry.key_kind()).ok_or_else(|| {
            let raw = match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            EngineError::NotFound(raw)
        })
    }
}
