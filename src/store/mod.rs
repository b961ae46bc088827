//! Assignment persistence adapters
//!
//! Provides the storage seam that keeps a visitor's assignment stable
//! within a scope:
//! - In-memory backend for session-scoped stickiness
//! - On-disk JSON backend for durable stickiness
//! - Corrupt or unrecognized stored values degrade to "absent", never error
//!
//! # Example
//!
//! ```rust,no_run
//! use cohort::experiment::SegmentSnapshot;
//! use cohort::store::{AssignmentStore, MemoryStore};
//!
//! # async fn example() -> cohort::Result<()> {
//! let store = MemoryStore::new();
//!
//! let snapshot = SegmentSnapshot { id: 9, name: "A".to_string() };
//! store.set("exp_5_segment", snapshot.clone()).await?;
//! assert_eq!(store.get("exp_5_segment").await?, Some(snapshot));
//!
//! store.delete("exp_5_segment").await?;
//! assert!(!store.exists("exp_5_segment").await?);
//! # Ok(())
//! # }
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::experiment::SegmentSnapshot;
use crate::Result;
use std::future::Future;

/// Key-value store trait for sticky assignment persistence.
///
/// Keys are experiment storage keys, values are `{id, name}` segment
/// snapshots. Implementations must treat unreadable or unrecognized
/// stored data as "no persisted assignment" rather than returning an
/// error: a visitor with corrupt state simply re-rolls.
pub trait AssignmentStore: Send + Sync {
    /// Get the persisted snapshot for a key.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<SegmentSnapshot>>> + Send;

    /// Persist a snapshot under a key.
    ///
    /// Overwrites any existing value; concurrent writers race benignly
    /// and the last write wins.
    fn set(&self, key: &str, snapshot: SegmentSnapshot) -> impl Future<Output = Result<()>> + Send;

    /// Delete a key.
    ///
    /// No-op if the key doesn't exist.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: u64, name: &str) -> SegmentSnapshot {
        SegmentSnapshot {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_set_get() {
        let store = MemoryStore::new();

        store.set("exp_5_segment", snapshot(9, "A")).await.unwrap();
        let value = store.get("exp_5_segment").await.unwrap();

        assert_eq!(value, Some(snapshot(9, "A")));
    }

    #[tokio::test]
    async fn test_memory_get_nonexistent() {
        let store = MemoryStore::new();

        let value = store.get("nonexistent").await.unwrap();

        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_memory_overwrite_last_write_wins() {
        let store = MemoryStore::new();

        store.set("key", snapshot(9, "A")).await.unwrap();
        store.set("key", snapshot(10, "B")).await.unwrap();
        let value = store.get("key").await.unwrap();

        assert_eq!(value, Some(snapshot(10, "B")));
    }

    #[tokio::test]
    async fn test_memory_delete() {
        let store = MemoryStore::new();

        store.set("key", snapshot(9, "A")).await.unwrap();
        store.delete("key").await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_delete_nonexistent() {
        let store = MemoryStore::new();

        // Should not error
        store.delete("nonexistent").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_exists() {
        let store = MemoryStore::new();

        assert!(!store.exists("key").await.unwrap());

        store.set("key", snapshot(9, "A")).await.unwrap();
        assert!(store.exists("key").await.unwrap());

        store.delete("key").await.unwrap();
        assert!(!store.exists("key").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..100 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let key = format!("exp_{i}_segment");
                store.set(&key, SegmentSnapshot { id: i, name: format!("v{i}") })
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..100u64 {
            let key = format!("exp_{i}_segment");
            let value = store.get(&key).await.unwrap();
            assert_eq!(value.map(|s| s.id), Some(i));
        }
    }

    #[tokio::test]
    async fn test_memory_len_and_clear() {
        let store = MemoryStore::new();

        assert!(store.is_empty());
        store.set("a", snapshot(1, "x")).await.unwrap();
        store.set("b", snapshot(2, "y")).await.unwrap();
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
