use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How a content provider's data is backed.
///
/// Serialized as a plain tag: `"local"`, `"remote"` or any custom name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageStrategy {
    /// Kept in process memory.
    #[default]
    Local,
    /// Backed by a networked service.
    Remote,
    /// A host-defined backend.
    Custom(String),
}

impl StorageStrategy {
    pub fn tag(&self) -> &str {
        match self {
            StorageStrategy::Local => "local",
            StorageStrategy::Remote => "remote",
            StorageStrategy::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for StorageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for StorageStrategy {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "local" => StorageStrategy::Local,
            "remote" => StorageStrategy::Remote,
            _ => StorageStrategy::Custom(tag),
        }
    }
}

impl From<&str> for StorageStrategy {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<StorageStrategy> for String {
    fn from(strategy: StorageStrategy) -> Self {
        strategy.tag().to_string()
    }
}

impl FromStr for StorageStrategy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
