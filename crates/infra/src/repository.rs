//! Per-entity collections over a [`BlobStore`].

use std::sync::Arc;

use tracing::{debug, error};

use hamperdesk_core::Entity;

use crate::store::{BlobStore, StoreError};

/// An ordered, in-memory collection of one entity type.
///
/// Mutations take effect in memory immediately. Implementations may persist
/// them, but a persistence failure never undoes the in-memory change.
pub trait Repository<T: Entity>: Send + Sync {
    fn all(&self) -> &[T];

    fn get(&self, id: &T::Id) -> Option<&T> {
        self.all().iter().find(|item| item.id() == id)
    }

    /// Replace the item with the same id, or append it.
    fn upsert(&mut self, item: T);

    fn upsert_many(&mut self, items: Vec<T>);

    fn remove(&mut self, id: &T::Id) -> Option<T>;

    fn replace_all(&mut self, items: Vec<T>);

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}

/// Repository that writes the whole collection back to its blob key after
/// every mutation.
pub struct BlobRepository<T> {
    store: Arc<dyn BlobStore>,
    items: Vec<T>,
}

impl<T: Entity> BlobRepository<T> {
    /// Load the collection stored under `T::COLLECTION`; a missing key is an
    /// empty collection.
    pub fn open(store: Arc<dyn BlobStore>) -> Result<Self, StoreError> {
        let items = match store.get(T::COLLECTION)? {
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Json {
                key: T::COLLECTION.to_string(),
                source,
            })?,
            None => Vec::new(),
        };
        debug!(collection = T::COLLECTION, count = items.len(), "collection loaded");
        Ok(Self { store, items })
    }

    fn persist(&self) {
        let result = serde_json::to_value(&self.items)
            .map_err(|source| StoreError::Json {
                key: T::COLLECTION.to_string(),
                source,
            })
            .and_then(|value| self.store.set(T::COLLECTION, value));

        if let Err(e) = result {
            error!(collection = T::COLLECTION, error = %e, "failed to persist collection");
        }
    }

    fn put(&mut self, item: T) {
        match self.items.iter_mut().find(|x| x.id() == item.id()) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }
}

impl<T: Entity> Repository<T> for BlobRepository<T> {
    fn all(&self) -> &[T] {
        &self.items
    }

    fn upsert(&mut self, item: T) {
        self.put(item);
        self.persist();
    }

    fn upsert_many(&mut self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        for item in items {
            self.put(item);
        }
        self.persist();
    }

    fn remove(&mut self, id: &T::Id) -> Option<T> {
        let idx = self.items.iter().position(|x| x.id() == id)?;
        let removed = self.items.remove(idx);
        self.persist();
        Some(removed)
    }

    fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.persist();
    }
}
