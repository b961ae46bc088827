//! Durable store implementation backed by a JSON document on disk.
//!
//! The file holds one object mapping storage keys to `{id, name}` segment
//! snapshots and survives until explicitly cleared. A file that cannot be
//! read or parsed yields an empty store: visitors with corrupt state
//! re-roll instead of seeing an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tracing::debug;

use super::AssignmentStore;
use crate::experiment::SegmentSnapshot;
use crate::{Error, Result};

/// Durable assignment store persisted as a single JSON document.
///
/// All reads are served from memory; every mutation writes the whole
/// document back. Concurrent writers race benignly — the last write wins
/// and subsequent reads converge on one value.
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, SegmentSnapshot>,
}

impl FileStore {
    /// Open a durable store at `path`, loading any existing assignments.
    ///
    /// Missing, unreadable, or corrupt files start the store empty;
    /// entries that don't parse as segment snapshots are dropped.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = DashMap::new();

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&contents) {
                Ok(document) => {
                    for (key, value) in document {
                        match serde_json::from_value::<SegmentSnapshot>(value) {
                            Ok(snapshot) => {
                                entries.insert(key, snapshot);
                            }
                            Err(e) => {
                                debug!("assignment store: dropping unrecognized entry {key}: {e}");
                            }
                        }
                    }
                }
                Err(e) => {
                    debug!(
                        "assignment store: treating corrupt document {} as empty: {e}",
                        path.display()
                    );
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                debug!(
                    "assignment store: treating unreadable document {} as empty: {e}",
                    path.display()
                );
            }
        }

        Self { path, entries }
    }

    /// Get the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
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

    /// Remove all assignments and delete the backing document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn flush(&self) -> Result<()> {
        let document: BTreeMap<String, SegmentSnapshot> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let contents = serde_json::to_string_pretty(&document)?;
        fs::write(&self.path, contents).map_err(Error::Io)
    }
}

impl AssignmentStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<SegmentSnapshot>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, snapshot: SegmentSnapshot) -> Result<()> {
        self.entries.insert(key.to_string(), snapshot);
        self.flush()
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}
