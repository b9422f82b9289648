use crate::{ModelError, ModelResult};
use mdrt_types::{Datatype, TypedValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Describes an entity type's attributes.
///
/// Attribute order is significant: it is the order in which providers list
/// their content and reset their values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub entity_type: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
}

/// A single typed attribute of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub datatype: Datatype,
    /// Default in canonical text form. Absent means the attribute starts unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl AttributeDef {
    /// An attribute of any datatype without a default.
    pub fn new(name: &str, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            default: None,
        }
    }

    /// Shorthand for a boolean attribute.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, Datatype::Boolean)
    }

    /// Shorthand for an integer attribute.
    pub fn integer(name: &str) -> Self {
        Self::new(name, Datatype::Integer)
    }

    /// Shorthand for a float attribute.
    pub fn float(name: &str) -> Self {
        Self::new(name, Datatype::Float)
    }

    /// Shorthand for a string attribute.
    pub fn string(name: &str) -> Self {
        Self::new(name, Datatype::String)
    }

    /// Shorthand for a date attribute.
    pub fn date(name: &str) -> Self {
        Self::new(name, Datatype::Date)
    }

    /// Shorthand for a time attribute.
    pub fn time(name: &str) -> Self {
        Self::new(name, Datatype::Time)
    }

    /// Shorthand for a datetime attribute.
    pub fn datetime(name: &str) -> Self {
        Self::new(name, Datatype::DateTime)
    }

    /// Sets the default, given in the datatype's text form.
    #[must_use]
    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }
}

impl EntitySchema {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute (builder style).
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Looks up an attribute definition by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns the declared datatype of `name`.
    pub fn datatype_of(&self, name: &str) -> ModelResult<Datatype> {
        self.attribute(name)
            .map(|a| a.datatype)
            .ok_or_else(|| self.unknown_attribute(name))
    }

    /// Returns the initial value of `name`: its parsed default, or unset.
    pub fn default_value(&self, name: &str) -> ModelResult<TypedValue> {
        let attribute = self
            .attribute(name)
            .ok_or_else(|| self.unknown_attribute(name))?;
        self.parse_default(attribute)
    }

    /// Checks that attribute names are unique and defaults parse.
    pub fn validate(&self) -> ModelResult<()> {
        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(attribute.name.as_str()) {
                return Err(ModelError::DuplicateAttribute {
                    entity_type: self.entity_type.clone(),
                    attribute: attribute.name.clone(),
                });
            }
            self.parse_default(attribute)?;
        }
        Ok(())
    }

    pub(crate) fn unknown_attribute(&self, name: &str) -> ModelError {
        ModelError::UnknownAttribute {
            entity_type: self.entity_type.clone(),
            attribute: name.to_string(),
        }
    }

    fn parse_default(&self, attribute: &AttributeDef) -> ModelResult<TypedValue> {
        match &attribute.default {
            None => Ok(TypedValue::unset(attribute.datatype)),
            Some(raw) => TypedValue::from_string(attribute.datatype, raw).map_err(|source| {
                ModelError::InvalidDefault {
                    entity_type: self.entity_type.clone(),
                    attribute: attribute.name.clone(),
                    source,
                }
            }),
        }
    }
}
