//! Storage layer for mdrt content providers.
//!
//! A content provider keeps its entity in a [`Store`]. Which store is used is
//! decided by a [`StorageStrategy`] tag (`local`, `remote`, or a host-defined
//! tag) looked up in a [`StoreFactoryRegistry`].
//!
//! # Architecture
//!
//! - [`MemoryStore`] is the built-in `local` strategy: the entity lives in
//!   process memory for the application's lifetime
//! - Networked or persistent backends are supplied by the host application
//!   by implementing [`Store`] and [`StoreFactory`]
//! - A missing factory for a requested strategy is reported as
//!   [`StorageError::MissingStoreFactory`] when the provider is built

mod error;
mod memory;
mod registry;
mod strategy;

pub use error::{StorageError, StorageResult};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use registry::StoreFactoryRegistry;
pub use strategy::StorageStrategy;

use mdrt_model::{EntityFactory, EntitySchema};
use mdrt_types::TypedValue;

/// An attribute whose value changed during a bulk operation such as reset.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub attribute: String,
    pub old_value: TypedValue,
    pub new_value: TypedValue,
}

/// Backing storage for one content provider's entity.
pub trait Store {
    /// The schema of the stored entity.
    fn schema(&self) -> &EntitySchema;

    /// Reads the current value of `attribute`.
    fn get(&self, attribute: &str) -> StorageResult<TypedValue>;

    /// Writes `value`, returning the previous value.
    fn put(&mut self, attribute: &str, value: TypedValue) -> StorageResult<TypedValue>;

    /// Restores schema defaults, returning the attributes that changed.
    fn reset(&mut self) -> StorageResult<Vec<AttributeChange>>;
}

/// Creates stores for one storage strategy.
pub trait StoreFactory {
    /// The strategy this factory serves.
    fn strategy(&self) -> StorageStrategy;

    /// Creates a store holding a fresh entity from `entity_factory`.
    fn create(&self, entity_factory: &EntityFactory) -> StorageResult<Box<dyn Store>>;
}
