//! Entity trait: identity + continuity across state changes.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Entity marker + minimal interface.
///
/// Every persisted collection holds one entity type; `COLLECTION` is the key
/// the collection is stored under in the backing blob store.
pub trait Entity: Clone + core::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display + Send + Sync;

    /// Storage key of the collection (e.g. `"products"`).
    const COLLECTION: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
