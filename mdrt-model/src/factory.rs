//! Type factory: datatype tags and entity schemas by name.
//!
//! Replaces string-keyed dynamic lookup with an explicit registry. Unknown
//! datatype tags fail with [`TypeError::UnknownDatatype`], unknown entity types
//! with [`ModelError::UnknownEntity`].

use crate::{Entity, EntitySchema, ModelError, ModelResult};
use mdrt_types::{Datatype, PlatformValue, TypeError, TypeResult, TypedValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Creates fresh [`Entity`] instances of one registered schema.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    schema: Arc<EntitySchema>,
}

impl EntityFactory {
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Creates an entity with every attribute at its default.
    pub fn create(&self) -> ModelResult<Entity> {
        Entity::from_schema(Arc::clone(&self.schema))
    }
}

/// Registry of datatype tags and entity schemas.
#[derive(Debug, Clone)]
pub struct TypeFactory {
    tags: HashMap<String, Datatype>,
    entities: HashMap<String, Arc<EntitySchema>>,
}

impl Default for TypeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeFactory {
    /// Creates a factory knowing every built-in tag plus the `number` alias
    /// for float.
    pub fn new() -> Self {
        let mut tags: HashMap<String, Datatype> = Datatype::ALL
            .into_iter()
            .map(|dt| (dt.tag().to_string(), dt))
            .collect();
        tags.insert("number".into(), Datatype::Float);
        Self {
            tags,
            entities: HashMap::new(),
        }
    }

    /// Registers an extra tag for a built-in datatype. Re-registering a tag
    /// replaces its target.
    pub fn register_alias(&mut self, alias: &str, datatype: Datatype) {
        debug!(alias, datatype = %datatype, "Registered datatype alias");
        self.tags.insert(alias.to_ascii_lowercase(), datatype);
    }

    /// Resolves a datatype tag or alias (case-insensitive).
    pub fn resolve(&self, tag: &str) -> TypeResult<Datatype> {
        self.tags
            .get(&tag.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| TypeError::UnknownDatatype(tag.to_string()))
    }

    /// Creates a typed value of the datatype named `tag` from any native value.
    pub fn create(&self, tag: &str, raw: impl Into<PlatformValue>) -> TypeResult<TypedValue> {
        let datatype = self.resolve(tag)?;
        TypedValue::cast(datatype, &raw.into())
    }

    /// Creates an unset value of the datatype named `tag`.
    pub fn unset(&self, tag: &str) -> TypeResult<TypedValue> {
        Ok(TypedValue::unset(self.resolve(tag)?))
    }

    /// Registers an entity schema after validating it.
    pub fn register_entity(&mut self, schema: EntitySchema) -> ModelResult<()> {
        schema.validate()?;
        if self.entities.contains_key(&schema.entity_type) {
            return Err(ModelError::DuplicateEntity(schema.entity_type));
        }
        debug!(
            entity_type = %schema.entity_type,
            attributes = schema.attributes.len(),
            "Registered entity schema"
        );
        self.entities
            .insert(schema.entity_type.clone(), Arc::new(schema));
        Ok(())
    }

    /// Returns the factory for a registered entity type.
    pub fn get_entity_factory(&self, entity_type: &str) -> ModelResult<EntityFactory> {
        self.entities
            .get(entity_type)
            .map(|schema| EntityFactory {
                schema: Arc::clone(schema),
            })
            .ok_or_else(|| ModelError::UnknownEntity(entity_type.to_string()))
    }

    /// Registered entity types, sorted.
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}
