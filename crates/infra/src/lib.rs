//! Infrastructure layer: blob storage, repositories, numbering and the engine
//! that orchestrates every business operation over them.

pub mod engine;
pub mod repository;
pub mod sequence;
pub mod store;

pub use engine::Engine;
pub use repository::{BlobRepository, Repository};
pub use sequence::{SequenceGenerator, SequenceKind};
pub use store::{BlobStore, FileBlobStore, InMemoryBlobStore, StoreError};

#[cfg(test)]
mod integration_tests;
