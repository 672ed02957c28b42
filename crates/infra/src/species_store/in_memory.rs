use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use rainforest_core::SpeciesId;
use rainforest_inventory::{NewSpecies, Species, SpeciesFilter, SpeciesPatch};

use super::SpeciesStore;
use crate::error::{StoreError, StoreResult};

/// In-memory species store.
///
/// Intended for tests/dev. Ids are time-ordered, so iteration order is
/// creation order.
#[derive(Debug, Default)]
pub struct InMemorySpeciesStore {
    rows: RwLock<BTreeMap<SpeciesId, Species>>,
}

impl InMemorySpeciesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SpeciesStore for InMemorySpeciesStore {
    async fn create(&self, new: NewSpecies) -> StoreResult<Species> {
        let species = Species::create(new, Utc::now());
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;

        if rows.contains_key(&species.id) {
            return Err(StoreError::Conflict(format!("species {} already exists", species.id)));
        }
        rows.insert(species.id, species.clone());
        Ok(species)
    }

    async fn get(&self, id: SpeciesId) -> StoreResult<Option<Species>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(&id).cloned())
    }

    async fn list(&self, filter: &SpeciesFilter) -> StoreResult<Vec<Species>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.values().filter(|s| filter.matches(s)).cloned().collect())
    }

    async fn update(&self, id: SpeciesId, patch: &SpeciesPatch) -> StoreResult<Option<Species>> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get_mut(&id).map(|species| {
            species.apply_patch(patch, Utc::now());
            species.clone()
        }))
    }

    async fn delete(&self, id: SpeciesId) -> StoreResult<bool> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.remove(&id).is_some())
    }
}
