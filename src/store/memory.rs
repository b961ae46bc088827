//! Session-scoped store implementation using `DashMap`.
//!
//! Assignments live for the lifetime of the process and vanish with it,
//! the embedded analog of a browsing session. For stickiness across
//! restarts, use `FileStore`.

use super::AssignmentStore;
use crate::experiment::SegmentSnapshot;
use crate::Result;
use dashmap::DashMap;

/// In-memory assignment store backed by a lock-free concurrent hashmap.
///
/// Thread-safe; two near-simultaneous first renders racing to write the
/// same key converge on one value because the last insert wins.
///
/// # Example
///
/// ```rust
/// use cohort::experiment::SegmentSnapshot;
/// use cohort::store::{AssignmentStore, MemoryStore};
///
/// # async fn example() -> cohort::Result<()> {
/// let store = MemoryStore::new();
/// store.set("exp_5_segment", SegmentSnapshot { id: 9, name: "A".into() }).await?;
/// assert!(store.exists("exp_5_segment").await?);
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    entries: DashMap<String, SegmentSnapshot>,
}

impl MemoryStore {
    /// Create a new session-scoped store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }

    /// Get the number of persisted assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all assignments (ends the "session").
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<SegmentSnapshot>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, snapshot: SegmentSnapshot) -> Result<()> {
        self.entries.insert(key.to_string(), snapshot);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}
