//! Field-to-attribute mappings.
//!
//! A [`DataMapper`] records, per UI field, the ordered list of
//! `(provider, attribute)` pairs the field is bound to. A field may map to
//! several attributes and several fields may map to the same attribute.

use crate::field::Field;
use crate::provider::ContentProvider;
use crate::RuntimeResult;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// One `(provider, attribute)` target of a field.
#[derive(Clone)]
pub struct Mapping {
    pub provider: Rc<ContentProvider>,
    pub attribute: String,
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("provider", &self.provider.id())
            .field("attribute", &self.attribute)
            .finish()
    }
}

#[derive(Default)]
pub struct DataMapper {
    /// Mappings in declaration order, keyed by field id.
    mappings: Vec<(String, Mapping)>,
    fields: HashMap<String, Rc<dyn Field>>,
}

impl DataMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field so that change events can be pushed into it.
    /// Re-registering an id replaces the previous field.
    pub fn register_field(&mut self, field: Rc<dyn Field>) {
        debug!(field = field.id(), "Registered field");
        self.fields.insert(field.id().to_string(), field);
    }

    /// Appends a mapping from `field` to `provider.attribute`.
    ///
    /// Fails with an unknown-attribute error if the provider's schema does
    /// not declare `attribute`.
    pub fn map(
        &mut self,
        field: &str,
        provider: Rc<ContentProvider>,
        attribute: &str,
    ) -> RuntimeResult<()> {
        provider.datatype_of(attribute)?;
        debug!(field, provider = provider.id(), attribute, "Mapped field");
        self.mappings.push((
            field.to_string(),
            Mapping {
                provider,
                attribute: attribute.to_string(),
            },
        ));
        Ok(())
    }

    /// Removes every mapping of `field`. Returns how many were removed.
    pub fn unmap(&mut self, field: &str) -> usize {
        let before = self.mappings.len();
        self.mappings.retain(|(id, _)| id != field);
        before - self.mappings.len()
    }

    /// Mappings of `field` in declaration order. Empty if unmapped.
    pub fn get_content_providers(&self, field: &str) -> Vec<Mapping> {
        self.mappings
            .iter()
            .filter(|(id, _)| id == field)
            .map(|(_, mapping)| mapping.clone())
            .collect()
    }

    /// Ids of the fields mapped to `provider_id.attribute`, each once, in
    /// declaration order.
    pub fn get_fields(&self, provider_id: &str, attribute: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for (id, mapping) in &self.mappings {
            if mapping.provider.id() == provider_id
                && mapping.attribute == attribute
                && !found.contains(id)
            {
                found.push(id.clone());
            }
        }
        found
    }

    /// The registered field with `id`.
    pub fn field(&self, id: &str) -> Option<Rc<dyn Field>> {
        self.fields.get(id).cloned()
    }

    /// Ids of every mapped field, each once, in declaration order.
    pub fn mapped_fields(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for (id, _) in &self.mappings {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

impl fmt::Debug for DataMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataMapper")
            .field("mappings", &self.mappings)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
