use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tl_types::LedgerIndex;

use crate::entry::LedgerEntry;

/// Change to a single ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryChange {
    /// The entry did not exist before.
    Created(LedgerEntry),
    /// The entry existed and now holds this value.
    Modified(LedgerEntry),
    /// The entry existed and is removed.
    Deleted,
}

/// Every write produced by one transition, keyed by index.
///
/// Iteration order is index order, so two write-sets with the same changes
/// compare and serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSet {
    changes: BTreeMap<LedgerIndex, EntryChange>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_changes(changes: BTreeMap<LedgerIndex, EntryChange>) -> Self {
        Self { changes }
    }

    pub fn get(&self, index: &LedgerIndex) -> Option<&EntryChange> {
        self.changes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LedgerIndex, &EntryChange)> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn created(&self) -> usize {
        self.count(|c| matches!(c, EntryChange::Created(_)))
    }

    pub fn modified(&self) -> usize {
        self.count(|c| matches!(c, EntryChange::Modified(_)))
    }

    pub fn deleted(&self) -> usize {
        self.count(|c| matches!(c, EntryChange::Deleted))
    }

    fn count(&self, pred: impl Fn(&EntryChange) -> bool) -> usize {
        self.changes.values().filter(|c| pred(c)).count()
    }
}

impl IntoIterator for WriteSet {
    type Item = (LedgerIndex, EntryChange);
    type IntoIter = std::collections::btree_map::IntoIter<LedgerIndex, EntryChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
