use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tl_types::LedgerIndex;
use tracing::debug;

use crate::changes::{EntryChange, WriteSet};
use crate::config::LedgerConfig;
use crate::entry::LedgerEntry;
use crate::error::{StoreError, StoreResult};
use crate::traits::ReadView;

/// Serializable image of a whole ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub config: LedgerConfig,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
}

impl LedgerSnapshot {
    pub fn from_json_str(text: &str) -> StoreResult<Self> {
        serde_json::from_str(text).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// In-memory, HashMap-based ledger.
///
/// Intended for tests and embedding. Entries sit behind a `RwLock`; a
/// [`WriteSet`] is validated in full and then applied under a single write
/// lock, so readers never observe half of a transition.
pub struct InMemoryLedgerStore {
    config: LedgerConfig,
    entries: RwLock<HashMap<LedgerIndex, LedgerEntry>>,
}

impl InMemoryLedgerStore {
    /// Create an empty ledger with the given parameters.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Build a ledger from a snapshot. Later duplicates of an index win.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> StoreResult<Self> {
        snapshot.config.validate()?;
        let store = Self::new(snapshot.config);
        for entry in snapshot.entries {
            store.insert(entry)?;
        }
        Ok(store)
    }

    /// Image of the current state, entries sorted by index.
    pub fn snapshot(&self) -> StoreResult<LedgerSnapshot> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut entries: Vec<(LedgerIndex, LedgerEntry)> =
            map.iter().map(|(k, v)| (*k, v.clone())).collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(LedgerSnapshot {
            config: self.config.clone(),
            entries: entries.into_iter().map(|(_, v)| v).collect(),
        })
    }

    /// Store an entry at its index, replacing whatever was there.
    ///
    /// This bypasses transitions and is meant for seeding a ledger.
    pub fn insert(&self, entry: LedgerEntry) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(entry.index(), entry);
        Ok(())
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every change of `writes`, or none of them.
    ///
    /// Created entries must not exist yet; modified and deleted entries must
    /// exist. Any violation rejects the whole set and leaves the ledger as
    /// it was.
    pub fn apply(&self, writes: WriteSet) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;

        for (index, change) in writes.iter() {
            match change {
                EntryChange::Created(entry) => {
                    if map.contains_key(index) {
                        return Err(StoreError::AlreadyExists(*index));
                    }
                    check_index(index, entry)?;
                }
                EntryChange::Modified(entry) => {
                    if !map.contains_key(index) {
                        return Err(StoreError::NotFound(*index));
                    }
                    check_index(index, entry)?;
                }
                EntryChange::Deleted => {
                    if !map.contains_key(index) {
                        return Err(StoreError::NotFound(*index));
                    }
                }
            }
        }

        let (created, modified, deleted) = (writes.created(), writes.modified(), writes.deleted());
        for (index, change) in writes {
            match change {
                EntryChange::Created(entry) | EntryChange::Modified(entry) => {
                    map.insert(index, entry);
                }
                EntryChange::Deleted => {
                    map.remove(&index);
                }
            }
        }
        debug!(created, modified, deleted, "write-set applied");
        Ok(())
    }
}

fn check_index(index: &LedgerIndex, entry: &LedgerEntry) -> StoreResult<()> {
    if entry.index() != *index {
        return Err(StoreError::MisplacedEntry {
            index: *index,
            kind: entry.kind(),
        });
    }
    Ok(())
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl ReadView for InMemoryLedgerStore {
    fn read(&self, index: &LedgerIndex) -> StoreResult<Option<LedgerEntry>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(index).cloned())
    }

    fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

impl std::fmt::Debug for InMemoryLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedgerStore")
            .field("entry_count", &self.len())
            .finish()
    }
}
