use tl_types::{LedgerIndex, TypeError};

use crate::entry::EntryKind;

/// Errors from ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested entry was not found.
    #[error("entry not found: {0}")]
    NotFound(LedgerIndex),

    /// An entry already exists at the index being created.
    #[error("entry already exists: {0}")]
    AlreadyExists(LedgerIndex),

    /// The entry at an index is not of the expected kind.
    #[error("entry {index} is a {actual}, expected {expected}")]
    WrongKind {
        index: LedgerIndex,
        expected: EntryKind,
        actual: EntryKind,
    },

    /// A write-set places an entry at an index it does not derive to.
    #[error("{kind} entry does not belong at {index}")]
    MisplacedEntry { index: LedgerIndex, kind: EntryKind },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading snapshots or configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A primitive value failed to parse.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
