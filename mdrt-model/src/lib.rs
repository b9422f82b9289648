//! Entity model for the mdrt runtime.
//!
//! Defines the schema-level types that providers and stores are built from:
//! - [`EntitySchema`] / [`AttributeDef`]: an entity type's attributes, their
//!   datatypes and optional defaults
//! - [`Entity`]: one instance of a schema holding a typed value per attribute
//! - [`EntityFactory`]: creates fresh entities for a registered schema
//! - [`TypeFactory`]: resolves datatype tags (and aliases) and entity schemas
//!   by name

mod entity;
mod error;
mod factory;
mod schema;

pub use entity::Entity;
pub use error::{ModelError, ModelResult};
pub use factory::{EntityFactory, TypeFactory};
pub use schema::{AttributeDef, EntitySchema};
