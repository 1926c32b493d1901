//! Concurrent entity storage with per-entity fine-grained locking.
//!
//! [`Registry`] stores entities in a `HashMap` where each entry is
//! individually protected by a [`tokio::sync::RwLock`]. Reads of one entity
//! run concurrently; writes to one entity are serialized, writes to
//! different entities are not.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::GameError;

/// Something stored in a [`Registry`].
pub trait Entity: Send + Sync + 'static {
    /// Identifier type.
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync;
    /// Name used in not-found errors.
    const KIND: &'static str;

    /// The entity's identifier.
    fn id(&self) -> Self::Id;
}

/// Shared handle to one locked entity.
pub type Shared<E> = Arc<RwLock<E>>;

/// Central store for one entity kind.
///
/// The outer `RwLock` only guards membership; it is never held while an
/// entity lock is awaited for writing.
#[derive(Debug)]
pub struct Registry<E: Entity> {
    entries: RwLock<HashMap<E::Id, Shared<E>>>,
}

impl<E: Entity> Registry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Conflict`] if an entity with the same id
    /// already exists.
    pub async fn insert(&self, entity: E) -> Result<Shared<E>, GameError> {
        let id = entity.id();
        let mut map = self.entries.write().await;
        if map.contains_key(&id) {
            return Err(GameError::Conflict(format!("{} {id} already exists", E::KIND)));
        }
        let shared = Arc::new(RwLock::new(entity));
        map.insert(id, Arc::clone(&shared));
        Ok(shared)
    }

    /// Inserts or replaces an entity. Used when restoring snapshots.
    pub async fn upsert(&self, entity: E) {
        let id = entity.id();
        self.entries
            .write()
            .await
            .insert(id, Arc::new(RwLock::new(entity)));
    }

    /// Returns the lock guarding the entity.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no entity has the given id.
    pub async fn get(&self, id: E::Id) -> Result<Shared<E>, GameError> {
        let map = self.entries.read().await;
        map.get(&id)
            .cloned()
            .ok_or_else(|| GameError::not_found(E::KIND, id))
    }

    /// Handles to every entity, in no particular order.
    pub async fn all(&self) -> Vec<Shared<E>> {
        self.entries.read().await.values().cloned().collect()
    }

    /// Returns the number of entities.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<E: Entity> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Counter {
        id: u32,
        value: u64,
    }

    impl Entity for Counter {
        type Id = u32;
        const KIND: &'static str = "counter";

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[tokio::test]
    async fn insert_and_get() {
        let registry = Registry::new();
        assert!(registry.insert(Counter { id: 1, value: 7 }).await.is_ok());

        let Ok(entry) = registry.get(1).await else {
            panic!("expected entry");
        };
        assert_eq!(entry.read().await.value, 7);
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let registry = Registry::new();
        let _ = registry.insert(Counter { id: 1, value: 0 }).await;
        let Err(GameError::Conflict(_)) = registry.insert(Counter { id: 1, value: 0 }).await else {
            panic!("expected conflict");
        };
    }

    #[tokio::test]
    async fn get_missing_names_kind() {
        let registry: Registry<Counter> = Registry::new();
        let Err(GameError::NotFound { kind, id }) = registry.get(9).await else {
            panic!("expected not found");
        };
        assert_eq!(kind, "counter");
        assert_eq!(id, "9");
    }

    #[tokio::test]
    async fn upsert_replaces() {
        let registry = Registry::new();
        registry.upsert(Counter { id: 1, value: 1 }).await;
        registry.upsert(Counter { id: 1, value: 2 }).await;
        assert_eq!(registry.len().await, 1);
        let Ok(entry) = registry.get(1).await else {
            panic!("expected entry");
        };
        assert_eq!(entry.read().await.value, 2);
    }

    #[tokio::test]
    async fn concurrent_writes_are_serialized() {
        let registry = Arc::new(Registry::new());
        let _ = registry.insert(Counter { id: 1, value: 0 }).await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                if let Ok(entry) = registry.get(1).await {
                    let mut guard = entry.write().await;
                    let current = guard.value;
                    tokio::task::yield_now().await;
                    guard.value = current + 1;
                }
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }

        let Ok(entry) = registry.get(1).await else {
            panic!("expected entry");
        };
        assert_eq!(entry.read().await.value, 50);
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty().await);
        let _ = registry.insert(Counter { id: 3, value: 0 }).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.all().await.len(), 1);
    }
}
