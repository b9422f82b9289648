//! Error types for the runtime.

use mdrt_model::ModelError;
use mdrt_storage::{StorageError, StorageStrategy};
use mdrt_types::TypeError;
use thiserror::Error;

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised by content providers, bindings, actions and manifests.
///
/// Errors from the lower crates are flattened on conversion, so a datatype
/// mismatch is always `RuntimeError::Type(TypeError::TypeMismatch { .. })`
/// regardless of which layer detected it.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("content provider not found: {0}")]
    UnknownContentProvider(String),

    #[error("content provider already registered: {0}")]
    DuplicateContentProvider(String),

    #[error("action not found: {0}")]
    UnknownAction(String),

    /// A required collaborator was not supplied.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("[{provider}] no store factory of type '{strategy}' found, check whether the store backend is registered")]
    MissingStoreFactory {
        provider: String,
        strategy: StorageStrategy,
    },

    #[error("store backend error: {0}")]
    Backend(String),

    /// Storage failure not attributed to a content provider.
    #[error(transparent)]
    Storage(StorageError),

    #[error(transparent)]
    Model(ModelError),

    #[error(transparent)]
    Type(TypeError),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TypeError> for RuntimeError {
    fn from(err: TypeError) -> Self {
        RuntimeError::Type(err)
    }
}

impl From<ModelError> for RuntimeError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Type(t) => RuntimeError::Type(t),
            other => RuntimeError::Model(other),
        }
    }
}

impl From<StorageError> for RuntimeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Model(m) => m.into(),
            StorageError::Backend(msg) => RuntimeError::Backend(msg),
            other => RuntimeError::Storage(other),
        }
    }
}
