//! Content providers: named, typed key-value stores.
//!
//! A provider wraps one [`Store`] holding an entity of a registered schema.
//! Reads return typed values of the attribute's declared datatype; writes
//! replace the value and publish a [`ChangeEvent`] when it actually changed.

use crate::dispatch::{ChangeDispatcher, ChangeEvent};
use crate::{RuntimeError, RuntimeResult};
use mdrt_model::{EntitySchema, TypeFactory};
use mdrt_storage::{StorageError, StorageStrategy, Store, StoreFactoryRegistry};
use mdrt_types::{Datatype, TypedValue};
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

pub struct ContentProvider {
    id: String,
    app_id: String,
    store: RefCell<Box<dyn Store>>,
    is_remote: bool,
    dispatcher: ChangeDispatcher,
}

impl ContentProvider {
    pub fn new(
        id: impl Into<String>,
        app_id: impl Into<String>,
        store: Box<dyn Store>,
        is_remote: bool,
        dispatcher: ChangeDispatcher,
    ) -> Self {
        Self {
            id: id.into(),
            app_id: app_id.into(),
            store: RefCell::new(store),
            is_remote,
            dispatcher,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    /// Schema of the provided entity.
    pub fn schema(&self) -> Ref<'_, EntitySchema> {
        Ref::map(self.store.borrow(), |store| store.schema())
    }

    /// Declared datatype of `attribute`.
    pub fn datatype_of(&self, attribute: &str) -> RuntimeResult<Datatype> {
        Ok(self.schema().datatype_of(attribute)?)
    }

    /// Reads the current value of `attribute`.
    pub fn get_value(&self, attribute: &str) -> RuntimeResult<TypedValue> {
        Ok(self.store.borrow().get(attribute)?)
    }

    /// Replaces the value of `attribute`.
    ///
    /// Publishes a change event if the new value differs from the old one
    /// under [`TypedValue::equals`]. Returns whether it did.
    pub fn set_value(&self, attribute: &str, value: TypedValue) -> RuntimeResult<bool> {
        let old_value = self.store.borrow_mut().put(attribute, value.clone())?;
        if old_value.equals(&value)? {
            debug!(provider = %self.id, attribute, "Value unchanged, no notification");
            return Ok(false);
        }
        debug!(
            provider = %self.id,
            attribute,
            old = %old_value,
            new = %value,
            "Content provider value changed"
        );
        self.dispatcher.publish(ChangeEvent {
            provider_id: self.id.clone(),
            attribute: attribute.to_string(),
            new_value: value,
            old_value,
        });
        Ok(true)
    }

    /// Restores every attribute to its schema default, publishing one change
    /// event per attribute that changed.
    pub fn reset(&self) -> RuntimeResult<()> {
        let changes = self.store.borrow_mut().reset()?;
        debug!(provider = %self.id, changed = changes.len(), "Content provider reset");
        for change in changes {
            self.dispatcher.publish(ChangeEvent {
                provider_id: self.id.clone(),
                attribute: change.attribute,
                new_value: change.new_value,
                old_value: change.old_value,
            });
        }
        Ok(())
    }

    /// Snapshot of `(attribute, value)` pairs in schema order.
    pub fn content(&self) -> RuntimeResult<Vec<(String, TypedValue)>> {
        let store = self.store.borrow();
        store
            .schema()
            .attributes
            .iter()
            .map(|a| -> RuntimeResult<(String, TypedValue)> {
                Ok((a.name.clone(), store.get(&a.name)?))
            })
            .collect()
    }
}

impl fmt::Debug for ContentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentProvider")
            .field("id", &self.id)
            .field("app_id", &self.app_id)
            .field("entity_type", &self.schema().entity_type)
            .field("is_remote", &self.is_remote)
            .finish()
    }
}

/// Declares how to build one content provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentProviderConfig {
    /// Provider name, unique per application.
    pub name: String,
    /// Entity type of the provided entity.
    pub entity: String,
    #[serde(default)]
    pub strategy: StorageStrategy,
    /// Marks the provider as networked. Implied by the `remote` strategy.
    #[serde(default)]
    pub remote: bool,
}

impl ContentProviderConfig {
    pub fn new(name: &str, entity: &str, strategy: StorageStrategy) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            strategy,
            remote: false,
        }
    }

    /// Builds the provider.
    ///
    /// Fails with [`RuntimeError::MissingStoreFactory`] if no factory is
    /// registered for the configured strategy, and with an unknown-entity
    /// model error if the entity type is not registered.
    pub fn create(
        &self,
        app_id: &str,
        types: &TypeFactory,
        stores: &StoreFactoryRegistry,
        dispatcher: &ChangeDispatcher,
    ) -> RuntimeResult<ContentProvider> {
        let store_factory = stores.get(&self.strategy).map_err(|err| match err {
            StorageError::MissingStoreFactory(strategy) => RuntimeError::MissingStoreFactory {
                provider: self.name.clone(),
                strategy,
            },
            other => other.into(),
        })?;
        let entity_factory = types.get_entity_factory(&self.entity)?;
        let store = store_factory.create(&entity_factory)?;
        let is_remote = self.remote || self.strategy == StorageStrategy::Remote;
        info!(
            provider = %self.name,
            app_id,
            entity = %self.entity,
            strategy = %self.strategy,
            is_remote,
            "Created content provider"
        );
        Ok(ContentProvider::new(
            self.name.clone(),
            app_id,
            store,
            is_remote,
            dispatcher.clone(),
        ))
    }
}

/// Content providers of one application, by name.
#[derive(Debug, Default)]
pub struct ContentProviderRegistry {
    providers: BTreeMap<String, Rc<ContentProvider>>,
}

impl ContentProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its id.
    pub fn register(&mut self, provider: ContentProvider) -> RuntimeResult<Rc<ContentProvider>> {
        if self.providers.contains_key(provider.id()) {
            return Err(RuntimeError::DuplicateContentProvider(provider.id().to_string()));
        }
        let provider = Rc::new(provider);
        self.providers
            .insert(provider.id().to_string(), Rc::clone(&provider));
        Ok(provider)
    }

    /// Looks up a provider by name.
    pub fn get_content_provider(&self, name: &str) -> RuntimeResult<Rc<ContentProvider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownContentProvider(name.to_string()))
    }

    /// Provider names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
