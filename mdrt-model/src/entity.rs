use crate::{EntitySchema, ModelResult};
use mdrt_types::{TypeError, TypedValue};
use std::sync::Arc;

/// One instance of an [`EntitySchema`].
///
/// Holds exactly one typed value per schema attribute, in schema order. Every
/// value always carries its attribute's declared datatype.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    schema: Arc<EntitySchema>,
    values: Vec<TypedValue>,
}

impl Entity {
    /// Creates an entity with every attribute at its default.
    ///
    /// The schema must already be validated (see [`EntitySchema::validate`]).
    pub fn from_schema(schema: Arc<EntitySchema>) -> ModelResult<Self> {
        let values = schema
            .attributes
            .iter()
            .map(|a| schema.default_value(&a.name))
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn entity_type(&self) -> &str {
        &self.schema.entity_type
    }

    /// Returns the current value of `attribute`.
    pub fn get(&self, attribute: &str) -> ModelResult<&TypedValue> {
        let idx = self.index_of(attribute)?;
        Ok(&self.values[idx])
    }

    /// Replaces the value of `attribute`, returning the previous value.
    ///
    /// The new value must have the attribute's declared datatype.
    pub fn set(&mut self, attribute: &str, value: TypedValue) -> ModelResult<TypedValue> {
        let idx = self.index_of(attribute)?;
        let expected = self.schema.attributes[idx].datatype;
        if value.datatype() != expected {
            return Err(TypeError::TypeMismatch {
                expected,
                found: value.datatype(),
            }
            .into());
        }
        Ok(std::mem::replace(&mut self.values[idx], value))
    }

    /// Restores every attribute to its default.
    ///
    /// Returns `(attribute, old, new)` for every attribute whose value changed.
    pub fn reset(&mut self) -> ModelResult<Vec<(String, TypedValue, TypedValue)>> {
        let mut changed = Vec::new();
        for (idx, attribute) in self.schema.attributes.iter().enumerate() {
            let fresh = self.schema.default_value(&attribute.name)?;
            if !fresh.equals(&self.values[idx])? {
                let old = std::mem::replace(&mut self.values[idx], fresh.clone());
                changed.push((attribute.name.clone(), old, fresh));
            }
        }
        Ok(changed)
    }

    /// Iterates `(attribute, value)` pairs in schema order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.schema
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .zip(self.values.iter())
    }

    fn index_of(&self, attribute: &str) -> ModelResult<usize> {
        self.schema
            .attributes
            .iter()
            .position(|a| a.name == attribute)
            .ok_or_else(|| self.schema.unknown_attribute(attribute))
    }
}
