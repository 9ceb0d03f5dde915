use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tl_store::{InMemoryLedgerStore, StoreError};
use tl_types::ResultCode;
use tracing::info;

use crate::error::EngineError;
use crate::transaction::{ApplyFlags, TrustSet};
use crate::trust_set::{apply_trust_set, TransitionOutcome};

/// What happened when a transaction was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTransaction {
    pub result: ResultCode,
    /// Entries created, modified, and deleted by the committed write-set.
    /// All zero unless `result` is `tesSUCCESS`.
    pub created: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl AppliedTransaction {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Applies transactions to a ledger one at a time.
///
/// Each transition runs against the current state and its write-set is
/// committed only when it succeeds. Applies are serialized, so every
/// transition sees the state its predecessor left behind.
pub struct TransactionEngine {
    store: InMemoryLedgerStore,
    apply_lock: Mutex<()>,
}

impl TransactionEngine {
    pub fn new(store: InMemoryLedgerStore) -> Self {
        Self {
            store,
            apply_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &InMemoryLedgerStore {
        &self.store
    }

    pub fn into_store(self) -> InMemoryLedgerStore {
        self.store
    }

    /// Run the transition without committing it.
    pub fn preview(&self, tx: &TrustSet, flags: ApplyFlags) -> TransitionOutcome {
        apply_trust_set(&self.store, tx, flags)
    }

    /// Apply `tx` and commit its writes if it succeeds.
    ///
    /// Rejections are reported through [`AppliedTransaction::result`]; an
    /// `Err` means the store itself refused the commit.
    pub fn apply(&self, tx: &TrustSet, flags: ApplyFlags) -> Result<AppliedTransaction, EngineError> {
        let _guard = self.apply_lock.lock().map_err(|_| StoreError::LockPoisoned)?;

        let outcome = apply_trust_set(&self.store, tx, flags);
        let changes = outcome.changes;
        let applied = AppliedTransaction {
            result: outcome.result,
            created: changes.created(),
            modified: changes.modified(),
            deleted: changes.deleted(),
        };

        if applied.is_success() {
            self.store.apply(changes)?;
            info!(
                account = %tx.account,
                destination = %tx.destination(),
                currency = %tx.currency(),
                created = applied.created,
                modified = applied.modified,
                deleted = applied.deleted,
                "trust set committed"
            );
        } else {
            info!(
                account = %tx.account,
                result = %applied.result,
                retry = applied.result.may_succeed_later(),
                "trust set not applied"
            );
        }
        Ok(applied)
    }
}

impl std::fmt::Debug for TransactionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionEngine")
            .field("store", &self.store)
            .finish()
    }
}
