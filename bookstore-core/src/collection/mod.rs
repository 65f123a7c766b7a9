//! Persisted, insertion-ordered collections of catalog ids
//!
//! Two collections exist side by side: liked books and cart items. Each one
//! owns its ids in memory and mirrors every mutation to a single storage key
//! holding a JSON array of strings. Storage is best effort: failures are
//! logged and the in-memory state stays authoritative for the session.

use crate::error::StorageError;
use crate::storage::StorageProvider;
use crate::types::ItemId;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which collection a store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Likes,
    Cart,
}

impl CollectionKind {
    /// Fixed storage key for this collection's snapshot
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Likes => "likedBooks",
            Self::Cart => "cartItems",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Likes => f.write_str("likes"),
            Self::Cart => f.write_str("cart"),
        }
    }
}

/// One collection of ids backed by durable storage
pub struct CollectionStore {
    kind: CollectionKind,
    ids: Vec<ItemId>,
    storage: Arc<dyn StorageProvider>,
}

impl fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("kind", &self.kind)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl CollectionStore {
    /// Create an empty store without touching storage
    pub fn new(storage: Arc<dyn StorageProvider>, kind: CollectionKind) -> Self {
        Self {
            kind,
            ids: Vec::new(),
            storage,
        }
    }

    /// Create a store rehydrated from its persisted snapshot
    ///
    /// Missing or unreadable snapshots produce an empty store.
    pub async fn load(storage: Arc<dyn StorageProvider>, kind: CollectionKind) -> Self {
        let mut store = Self::new(storage, kind);
        store.reload().await;
        store
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Ids in insertion order
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove `id` if present, otherwise append it
    ///
    /// Returns whether the id is in the collection afterwards.
    pub async fn toggle(&mut self, id: impl Into<ItemId>) -> bool {
        let id = id.into();
        let present = match self.position(&id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        };
        self.persist().await;
        present
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub async fn add(&mut self, id: impl Into<ItemId>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        self.persist().await;
        true
    }

    /// Remove `id` if present, then persist the current ids either way
    ///
    /// Returns whether anything was removed.
    pub async fn remove(&mut self, id: &ItemId) -> bool {
        let removed = match self.position(id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        };
        self.persist().await;
        removed
    }

    /// Empty the collection and delete its snapshot
    pub async fn clear(&mut self) {
        self.ids.clear();
        let key = self.kind.storage_key();
        match self.storage.delete(key).await {
            Ok(()) => debug!(collection = %self.kind, "Removed persisted snapshot"),
            Err(e) => warn!(collection = %self.kind, "Failed to remove snapshot {}: {}", key, e),
        }
    }

    /// Replace the contents with ids read from storage, without writing back
    pub fn rehydrate<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.ids = dedup(ids);
    }

    /// Replace the contents and persist them
    pub async fn replace<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.rehydrate(ids);
        self.persist().await;
    }

    /// Re-read the persisted snapshot, picking up writes made elsewhere
    pub async fn reload(&mut self) {
        let ids = read_snapshot(self.storage.as_ref(), self.kind).await;
        self.rehydrate(ids);
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }

    async fn persist(&self) {
        let key = self.kind.storage_key();
        let data = match serde_json::to_vec(&self.ids) {
            Ok(data) => data,
            Err(e) => {
                warn!(collection = %self.kind, "Failed to encode snapshot: {}", e);
                return;
            }
        };

        match self.storage.write(key, data).await {
            Ok(()) => debug!(collection = %self.kind, len = self.ids.len(), "Persisted snapshot"),
            Err(e) => warn!(collection = %self.kind, "Failed to persist snapshot {}: {}", key, e),
        }
    }
}

/// Read a collection snapshot, treating absent or corrupt data as empty
pub async fn read_snapshot(storage: &dyn StorageProvider, kind: CollectionKind) -> Vec<ItemId> {
    let key = kind.storage_key();
    let data = match storage.read(key).await {
        Ok(data) => data,
        Err(StorageError::NotFound(_)) => return Vec::new(),
        Err(e) => {
            warn!(collection = %kind, "Failed to read snapshot {}, starting empty: {}", key, e);
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<ItemId>>(&data) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(collection = %kind, "Corrupt snapshot {}, starting empty: {}", key, e);
            Vec::new()
        }
    }
}

fn dedup<I, T>(ids: I) -> Vec<ItemId>
where
    I: IntoIterator<Item = T>,
    T: Into<ItemId>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(Into::into)
        .filter(|id: &ItemId| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageResult};
    use async_trait::async_trait;

    fn ids(store: &CollectionStore) -> Vec<&str> {
        store.ids().iter().map(ItemId::as_str).collect()
    }

    async fn snapshot(storage: &MemoryStorage, kind: CollectionKind) -> Option<String> {
        storage
            .read(kind.storage_key())
            .await
            .ok()
            .map(|data| String::from_utf8(data).unwrap())
    }

    /// Storage that rejects every operation
    struct BrokenStorage;

    #[async_trait]
    impl StorageProvider for BrokenStorage {
        async fn read(&self, _key: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::Backend("unavailable".to_string()))
        }

        async fn write(&self, _key: &str, _data: Vec<u8>) -> StorageResult<()> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }

        async fn delete(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Backend("unavailable".to_string()))
        }

        async fn exists(&self, _key: &str) -> StorageResult<bool> {
            Err(StorageError::Backend("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_toggle_into_empty_cart_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CollectionStore::load(storage.clone(), CollectionKind::Cart).await;

        assert!(cart.toggle("b1").await);
        assert_eq!(ids(&cart), ["b1"]);
        assert_eq!(
            snapshot(&storage, CollectionKind::Cart).await.as_deref(),
            Some(r#"["b1"]"#)
        );
    }

    #[tokio::test]
    async fn test_toggle_to_empty_writes_empty_array() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CollectionStore::new(storage.clone(), CollectionKind::Cart);
        cart.toggle("b1").await;

        assert!(!cart.toggle("b1").await);
        assert!(cart.is_empty());
        assert_eq!(
            snapshot(&storage, CollectionKind::Cart).await.as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_clear_deletes_key() {
        let storage = Arc::new(MemoryStorage::new());
        let mut likes = CollectionStore::new(storage.clone(), CollectionKind::Likes);
        likes.toggle("b1").await;
        likes.toggle("b2").await;

        likes.clear().await;
        assert!(likes.is_empty());
        assert!(!storage.exists("likedBooks").await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_sequence_keeps_remaining_order() {
        let storage = Arc::new(MemoryStorage::new());
        let mut likes = CollectionStore::new(storage, CollectionKind::Likes);

        likes.toggle("x").await;
        likes.toggle("y").await;
        likes.toggle("x").await;
        assert_eq!(ids(&likes), ["y"]);
    }

    #[tokio::test]
    async fn test_retoggle_appends_at_end() {
        let storage = Arc::new(MemoryStorage::new());
        let mut likes = CollectionStore::new(storage, CollectionKind::Likes);
        likes.replace(["a", "b", "c"]).await;

        likes.toggle("a").await;
        likes.toggle("a").await;
        assert_eq!(ids(&likes), ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_remove_and_add() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CollectionStore::new(storage.clone(), CollectionKind::Cart);

        assert!(cart.add("b1").await);
        assert!(!cart.add("b1").await);
        assert!(cart.add("b2").await);

        assert!(!cart.remove(&ItemId::from("missing")).await);
        assert!(cart.remove(&ItemId::from("b1")).await);
        assert_eq!(ids(&cart), ["b2"]);
        assert_eq!(
            snapshot(&storage, CollectionKind::Cart).await.as_deref(),
            Some(r#"["b2"]"#)
        );
    }

    #[tokio::test]
    async fn test_remove_absent_after_clear_writes_current_ids() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CollectionStore::new(storage.clone(), CollectionKind::Cart);
        cart.toggle("b1").await;
        cart.clear().await;
        assert_eq!(snapshot(&storage, CollectionKind::Cart).await, None);

        assert!(!cart.remove(&ItemId::from("zz")).await);
        assert_eq!(
            snapshot(&storage, CollectionKind::Cart).await.as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_remove_absent_overwrites_other_writer() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CollectionStore::new(storage.clone(), CollectionKind::Cart);
        cart.toggle("b1").await;
        storage
            .write("cartItems", br#"["b1","b9"]"#.to_vec())
            .await
            .unwrap();

        assert!(!cart.remove(&ItemId::from("zz")).await);
        assert_eq!(
            snapshot(&storage, CollectionKind::Cart).await.as_deref(),
            Some(r#"["b1"]"#)
        );
    }

    #[tokio::test]
    async fn test_rehydrate_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let mut likes = CollectionStore::new(storage.clone(), CollectionKind::Likes);

        likes.rehydrate(["a", "b", "a"]);
        assert_eq!(ids(&likes), ["a", "b"]);
        assert!(!storage.exists("likedBooks").await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_writes_deduplicated() {
        let storage = Arc::new(MemoryStorage::new());
        let mut likes = CollectionStore::new(storage.clone(), CollectionKind::Likes);

        likes.replace(["a", "b", "a", "c"]).await;
        assert_eq!(
            snapshot(&storage, CollectionKind::Likes).await.as_deref(),
            Some(r#"["a","b","c"]"#)
        );
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write("cartItems", b"{not json".to_vec())
            .await
            .unwrap();

        let cart = CollectionStore::load(storage, CollectionKind::Cart).await;
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_snapshot_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write("likedBooks", br#"{"ids":["a"]}"#.to_vec())
            .await
            .unwrap();

        let likes = CollectionStore::load(storage, CollectionKind::Likes).await;
        assert!(likes.is_empty());
    }

    #[tokio::test]
    async fn test_collections_use_separate_keys() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let mut likes = CollectionStore::new(storage.clone(), CollectionKind::Likes);
        let mut cart = CollectionStore::new(storage.clone(), CollectionKind::Cart);

        likes.toggle("b1").await;
        cart.toggle("b2").await;

        let likes = CollectionStore::load(storage.clone(), CollectionKind::Likes).await;
        let cart = CollectionStore::load(storage, CollectionKind::Cart).await;
        assert_eq!(ids(&likes), ["b1"]);
        assert_eq!(ids(&cart), ["b2"]);
    }

    #[tokio::test]
    async fn test_reload_picks_up_other_writer() {
        let storage = Arc::new(MemoryStorage::new());
        let mut first = CollectionStore::load(storage.clone(), CollectionKind::Likes).await;
        let mut second = CollectionStore::load(storage.clone(), CollectionKind::Likes).await;

        first.toggle("a").await;
        second.toggle("b").await;

        // Last writer wins in storage; in-memory states diverge until reload
        assert_eq!(ids(&first), ["a"]);
        first.reload().await;
        assert_eq!(ids(&first), ["b"]);
    }

    #[tokio::test]
    async fn test_storage_failures_are_swallowed() {
        let mut cart = CollectionStore::load(Arc::new(BrokenStorage), CollectionKind::Cart).await;
        assert!(cart.is_empty());

        assert!(cart.toggle("b1").await);
        assert!(cart.toggle("b2").await);
        assert!(cart.remove(&ItemId::from("b1")).await);
        assert_eq!(ids(&cart), ["b2"]);

        cart.clear().await;
        assert!(cart.is_empty());
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(CollectionKind::Likes.storage_key(), "likedBooks");
        assert_eq!(CollectionKind::Cart.storage_key(), "cartItems");
        assert_eq!(CollectionKind::Cart.to_string(), "cart");
    }
}
