//! In-memory `local` store.

use crate::{AttributeChange, StorageResult, StorageStrategy, Store, StoreFactory};
use mdrt_model::{Entity, EntityFactory, EntitySchema};
use mdrt_types::TypedValue;
use tracing::debug;

/// Keeps one entity in process memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entity: Entity,
}

impl MemoryStore {
    pub fn new(entity: Entity) -> Self {
        Self { entity }
    }

    /// Read-only access to the stored entity.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }
}

impl Store for MemoryStore {
    fn schema(&self) -> &EntitySchema {
        self.entity.schema()
    }

    fn get(&self, attribute: &str) -> StorageResult<TypedValue> {
        Ok(self.entity.get(attribute)?.clone())
    }

    fn put(&mut self, attribute: &str, value: TypedValue) -> StorageResult<TypedValue> {
        Ok(self.entity.set(attribute, value)?)
    }

    fn reset(&mut self) -> StorageResult<Vec<AttributeChange>> {
        let changes = self
            .entity
            .reset()?
            .into_iter()
            .map(|(attribute, old_value, new_value)| AttributeChange {
                attribute,
                old_value,
                new_value,
            })
            .collect();
        Ok(changes)
    }
}

/// Factory for the `local` strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::Local
    }

    fn create(&self, entity_factory: &EntityFactory) -> StorageResult<Box<dyn Store>> {
        let entity = entity_factory.create()?;
        debug!(entity_type = %entity.entity_type(), "Created in-memory store");
        Ok(Box::new(MemoryStore::new(entity)))
    }
}
