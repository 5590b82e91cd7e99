//! Key/value blob storage boundary.
//!
//! Every collection is persisted as one JSON document under its own key. The
//! engine only needs `get` and `set`; where the bytes end up is the backend's
//! business.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

pub use file::FileBlobStore;
pub use in_memory::InMemoryBlobStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json under {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait BlobStore: Send + Sync {
    /// `Ok(None)` when nothing was ever written under `key`.
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError>;
    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError>;
}

impl<S> BlobStore for Arc<S>
where
    S: BlobStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
