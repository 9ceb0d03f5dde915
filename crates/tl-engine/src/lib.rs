//! Trust-line transition engine for the trustline ledger.
//!
//! Given a TrustSet transaction and a view of the ledger, the engine decides
//! whether the trust line between the two accounts is created, modified, or
//! deleted, keeps both accounts' reserve bookkeeping and owner directories
//! in step, and reports a [`ResultCode`](tl_types::ResultCode).
//!
//! # Quick Start
//!
//! ```rust
//! use tl_engine::{ApplyFlags, TransactionEngine, TrustSet};
//! use tl_store::{AccountRoot, InMemoryLedgerStore};
//! use tl_types::{AccountId, CurrencyId, Drops, IssuedAmount, ResultCode};
//!
//! let store = InMemoryLedgerStore::default();
//! let alice = AccountId::from_passphrase("alice");
//! let bob = AccountId::from_passphrase("bob");
//! store.insert(AccountRoot::new(alice, Drops(1_000_000_000)).into()).unwrap();
//! store.insert(AccountRoot::new(bob, Drops(1_000_000_000)).into()).unwrap();
//!
//! let engine = TransactionEngine::new(store);
//! let usd = CurrencyId::from_code("USD").unwrap();
//! let tx = TrustSet::new(alice, IssuedAmount::new(100, usd, bob));
//! let applied = engine.apply(&tx, ApplyFlags::open()).unwrap();
//! assert_eq!(applied.result, ResultCode::Success);
//! ```

pub mod engine;
pub mod error;
pub mod preflight;
pub mod sides;
pub mod transaction;
pub mod trust_set;

pub use engine::{AppliedTransaction, TransactionEngine};
pub use error::EngineError;
pub use preflight::{run_checks, PreflightCheck, Verdict, STANDARD_CHECKS};
pub use sides::{LineSides, SideState};
pub use transaction::{ApplyFlags, TrustSet};
pub use trust_set::{apply_trust_set, TransitionOutcome};
