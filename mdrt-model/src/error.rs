//! Error types for the entity model.

use mdrt_types::TypeError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur when registering schemas or accessing entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// No schema registered under this entity type.
    #[error("unknown entity type: {0}")]
    UnknownEntity(String),

    /// A schema with this entity type is already registered.
    #[error("entity type already registered: {0}")]
    DuplicateEntity(String),

    /// The attribute is not part of the entity's schema.
    #[error("unknown attribute '{attribute}' on entity '{entity_type}'")]
    UnknownAttribute {
        entity_type: String,
        attribute: String,
    },

    /// The schema declares the same attribute twice.
    #[error("attribute '{attribute}' declared twice on entity '{entity_type}'")]
    DuplicateAttribute {
        entity_type: String,
        attribute: String,
    },

    /// A declared default does not parse as the attribute's datatype.
    #[error("invalid default for '{entity_type}.{attribute}': {source}")]
    InvalidDefault {
        entity_type: String,
        attribute: String,
        #[source]
        source: TypeError,
    },

    /// Datatype resolution, casting or comparison failed.
    #[error(transparent)]
    Type(#[from] TypeError),
}
