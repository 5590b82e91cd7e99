use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value as JsonValue;

use super::{BlobStore, StoreError};

/// One pretty-printed `<key>.json` file per key under a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (creating if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&value).map_err(|source| StoreError::Json {
            key: key.to_string(),
            source,
        })?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let io = |source: std::io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, bytes).map_err(io)?;
        fs::rename(&tmp, &target).map_err(io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "hamperdesk-{name}-{}",
            uuid::Uuid::now_v7()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn round_trips_documents_through_files() {
        let dir = scratch_dir("file-store");
        let store = FileBlobStore::open(&dir).unwrap();
        assert_eq!(store.get("customers").unwrap(), None);

        store.set("customers", json!([{"name": "Ana"}])).unwrap();
        assert!(dir.join("customers.json").exists());

        let reopened = FileBlobStore::open(&dir).unwrap();
        assert_eq!(
            reopened.get("customers").unwrap(),
            Some(json!([{"name": "Ana"}]))
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = scratch_dir("file-store-corrupt");
        let store = FileBlobStore::open(&dir).unwrap();
        fs::write(dir.join("orders.json"), b"{not json").unwrap();
        assert!(matches!(store.get("orders"), Err(StoreError::Json { .. })));
        let _ = fs::remove_dir_all(&dir);
    }
}
