//! Application manifest (`app.toml` / `app.json`).
//!
//! Declares everything an [`Application`](crate::Application) is built from:
//! datatype aliases, entity schemas, content providers and field mappings.
//!
//! ```toml
//! app_id = "contacts"
//! conditional_events = ["greeting_shown"]
//!
//! [type_aliases]
//! money = "float"
//!
//! [[entities]]
//! entity_type = "Person"
//! attributes = [
//!     { name = "name", datatype = "string" },
//!     { name = "age", datatype = "integer", default = "0" },
//! ]
//!
//! [[content_providers]]
//! name = "personProvider"
//! entity = "Person"
//! strategy = "local"
//!
//! [[mappings]]
//! field = "nameInput"
//! provider = "personProvider"
//! attribute = "name"
//! ```

use crate::provider::ContentProviderConfig;
use crate::{RuntimeError, RuntimeResult};
use mdrt_model::EntitySchema;
use mdrt_types::Datatype;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppManifest {
    /// Application identifier, stamped on every content provider.
    pub app_id: String,
    /// Extra datatype tags, e.g. `money = "float"`.
    #[serde(default)]
    pub type_aliases: BTreeMap<String, Datatype>,
    #[serde(default)]
    pub entities: Vec<EntitySchema>,
    #[serde(default)]
    pub content_providers: Vec<ContentProviderConfig>,
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
    /// Conditional event names. Non-empty lists get a local
    /// conditional-event mappings provider with one flag per event.
    #[serde(default)]
    pub conditional_events: Vec<String>,
}

/// Maps one field to one provider attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub field: String,
    pub provider: String,
    pub attribute: String,
}

impl AppManifest {
    pub fn from_toml_str(raw: &str) -> RuntimeResult<Self> {
        let manifest: Self = toml::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_json_str(raw: &str) -> RuntimeResult<Self> {
        let manifest: Self = serde_json::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads a manifest file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_toml_str(&raw)
        }
    }

    /// Checks cross references: provider names are unique and every
    /// mapping names a declared provider.
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.app_id.trim().is_empty() {
            return Err(RuntimeError::InvalidManifest("app_id is required".into()));
        }
        let mut names = HashSet::new();
        for provider in &self.content_providers {
            if !names.insert(provider.name.as_str()) {
                return Err(RuntimeError::InvalidManifest(format!(
                    "content provider '{}' declared twice",
                    provider.name
                )));
            }
        }
        for mapping in &self.mappings {
            if !names.contains(mapping.provider.as_str()) {
                return Err(RuntimeError::InvalidManifest(format!(
                    "field '{}' maps to undeclared content provider '{}'",
                    mapping.field, mapping.provider
                )));
            }
        }
        Ok(())
    }
}
