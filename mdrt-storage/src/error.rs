//! Error types for the storage layer.

use crate::StorageStrategy;
use mdrt_model::ModelError;
use mdrt_types::TypeError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No store factory registered for the requested strategy.
    #[error("no store factory of type '{0}' found")]
    MissingStoreFactory(StorageStrategy),

    /// Schema violation (unknown attribute, wrong datatype, bad default).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Backend-specific failure reported by a host-supplied store.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<TypeError> for StorageError {
    fn from(err: TypeError) -> Self {
        StorageError::Model(ModelError::Type(err))
    }
}
