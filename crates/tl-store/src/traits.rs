use tl_types::LedgerIndex;

use crate::config::LedgerConfig;
use crate::entry::{AccountRoot, EntryKind, LedgerEntry, TrustLine};
use crate::error::{StoreError, StoreResult};

/// Read-only view of a ledger.
///
/// Implementations return owned copies; callers never hold a handle into
/// the underlying storage.
pub trait ReadView {
    /// Read an entry by index.
    ///
    /// Returns `Ok(None)` if no entry exists at `index`.
    fn read(&self, index: &LedgerIndex) -> StoreResult<Option<LedgerEntry>>;

    /// Parameters of this ledger.
    fn config(&self) -> &LedgerConfig;

    /// Check whether an entry exists.
    fn exists(&self, index: &LedgerIndex) -> StoreResult<bool> {
        Ok(self.read(index)?.is_some())
    }

    /// Read an account root, failing if the index holds another kind of entry.
    fn read_account_root(&self, index: &LedgerIndex) -> StoreResult<Option<AccountRoot>> {
        match self.read(index)? {
            None => Ok(None),
            Some(LedgerEntry::AccountRoot(root)) => Ok(Some(root)),
            Some(other) => Err(StoreError::WrongKind {
                index: *index,
                expected: EntryKind::AccountRoot,
                actual: other.kind(),
            }),
        }
    }

    /// Read a trust line, failing if the index holds another kind of entry.
    fn read_trust_line(&self, index: &LedgerIndex) -> StoreResult<Option<TrustLine>> {
        match self.read(index)? {
            None => Ok(None),
            Some(LedgerEntry::TrustLine(line)) => Ok(Some(line)),
            Some(other) => Err(StoreError::WrongKind {
                index: *index,
                expected: EntryKind::TrustLine,
                actual: other.kind(),
            }),
        }
    }
}
