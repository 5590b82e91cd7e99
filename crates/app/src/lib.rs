//! Application shell: configuration, store wiring and user-facing feedback.

pub mod config;
pub mod feedback;

use std::sync::Arc;

use hamperdesk_core::SystemClock;
use hamperdesk_infra::{BlobStore, Engine, FileBlobStore, InMemoryBlobStore, StoreError};

use crate::config::{AppConfig, StoreKind};

/// Open the configured store and load the engine over it.
pub fn open_engine(config: &AppConfig) -> Result<Engine, StoreError> {
    let store: Arc<dyn BlobStore> = match config.store {
        StoreKind::File => Arc::new(FileBlobStore::open(&config.data_dir)?),
        StoreKind::Memory => Arc::new(InMemoryBlobStore::new()),
    };
    Engine::open(store, Box::new(SystemClock))
}
