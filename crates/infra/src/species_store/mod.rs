//! Species record storage boundary.
//!
//! Every operation touches a single row. Concurrent writers are
//! last-write-wins per column; there is no version check.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use rainforest_core::SpeciesId;
use rainforest_inventory::{NewSpecies, Species, SpeciesFilter, SpeciesPatch};

use crate::error::StoreResult;

pub use in_memory::InMemorySpeciesStore;
pub use postgres::PostgresSpeciesStore;

#[async_trait]
pub trait SpeciesStore: Send + Sync {
    /// Persist a validated record under a freshly generated id.
    async fn create(&self, new: NewSpecies) -> StoreResult<Species>;

    async fn get(&self, id: SpeciesId) -> StoreResult<Option<Species>>;

    /// Records matching every present criterion of `filter`, in the store's
    /// natural order.
    async fn list(&self, filter: &SpeciesFilter) -> StoreResult<Vec<Species>>;

    /// Overwrite the fields present in `patch`. `Ok(None)` when no row has `id`.
    ///
    /// An empty patch leaves the row (and its `updated_at`) untouched.
    async fn update(&self, id: SpeciesId, patch: &SpeciesPatch) -> StoreResult<Option<Species>>;

    /// Remove the row; reports whether it existed.
    async fn delete(&self, id: SpeciesId) -> StoreResult<bool>;
}

#[async_trait]
impl<S> SpeciesStore for Arc<S>
where
    S: SpeciesStore + ?Sized,
{
    async fn create(&self, new: NewSpecies) -> StoreResult<Species> {
        (**self).create(new).await
    }

    async fn get(&self, id: SpeciesId) -> StoreResult<Option<Species>> {
        (**self).get(id).await
    }

    async fn list(&self, filter: &SpeciesFilter) -> StoreResult<Vec<Species>> {
        (**self).list(filter).await
    }

    async fn update(&self, id: SpeciesId, patch: &SpeciesPatch) -> StoreResult<Option<Species>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: SpeciesId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}
