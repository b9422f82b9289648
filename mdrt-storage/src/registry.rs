use crate::{MemoryStoreFactory, StorageError, StorageResult, StorageStrategy, Store, StoreFactory};
use mdrt_model::EntityFactory;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Store factories keyed by storage strategy.
#[derive(Default)]
pub struct StoreFactoryRegistry {
    factories: HashMap<StorageStrategy, Box<dyn StoreFactory>>,
}

impl StoreFactoryRegistry {
    /// An empty registry. Every strategy is missing until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the in-memory `local` factory.
    pub fn with_local() -> Self {
        let mut registry = Self::new();
        registry.register(MemoryStoreFactory);
        registry
    }

    /// Registers a factory under its own strategy, replacing any previous one.
    pub fn register(&mut self, factory: impl StoreFactory + 'static) {
        let strategy = factory.strategy();
        if self.factories.contains_key(&strategy) {
            warn!(strategy = %strategy, "Replacing store factory");
        } else {
            debug!(strategy = %strategy, "Registered store factory");
        }
        self.factories.insert(strategy, Box::new(factory));
    }

    pub fn contains(&self, strategy: &StorageStrategy) -> bool {
        self.factories.contains_key(strategy)
    }

    /// Returns the factory for `strategy`.
    pub fn get(&self, strategy: &StorageStrategy) -> StorageResult<&dyn StoreFactory> {
        self.factories
            .get(strategy)
            .map(|f| f.as_ref())
            .ok_or_else(|| StorageError::MissingStoreFactory(strategy.clone()))
    }

    /// Creates a store for `strategy` holding a fresh entity.
    pub fn create(
        &self,
        strategy: &StorageStrategy,
        entity_factory: &EntityFactory,
    ) -> StorageResult<Box<dyn Store>> {
        self.get(strategy)?.create(entity_factory)
    }
}

impl std::fmt::Debug for StoreFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut strategies: Vec<&str> = self.factories.keys().map(StorageStrategy::tag).collect();
        strategies.sort_unstable();
        f.debug_struct("StoreFactoryRegistry")
            .field("strategies", &strategies)
            .finish()
    }
}
