use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use super::{BlobStore, StoreError};

/// In-memory blob store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    inner: RwLock<HashMap<String, JsonValue>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        match self.inner.read() {
            Ok(map) => {
                let mut keys: Vec<String> = map.keys().cloned().collect();
                keys.sort();
                keys
            }
            Err(_) => vec![],
        }
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        map.insert(key.to_string(), value);
        Ok(())
    }
}
