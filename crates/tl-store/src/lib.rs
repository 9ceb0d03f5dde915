//! Ledger entry storage for the trustline ledger.
//!
//! This crate holds the keyed ledger entries a transaction reads and writes,
//! and the collaborators the trust-line transition relies on.
//!
//! # Entry Types
//!
//! - [`AccountRoot`] -- base-currency balance and owned-object count
//! - [`TrustLine`] -- bilateral credit relationship, stored low-side first
//! - [`DirectoryNode`] -- one page of an account's owner directory
//!
//! # Views
//!
//! - [`ReadView`] -- read-only access to a ledger, plus its [`LedgerConfig`]
//! - [`Sandbox`] -- working view over a [`ReadView`]; buffers every write and
//!   hands them back as a single [`WriteSet`]
//! - [`InMemoryLedgerStore`] -- `HashMap`-backed ledger that applies a
//!   [`WriteSet`] all-or-nothing
//!
//! # Design Rules
//!
//! 1. A transition never writes to the store directly, only to a sandbox.
//! 2. A write-set is applied completely or not at all.
//! 3. Entries are plain owned values; there are no shared handles.
//! 4. All store errors are propagated, never silently ignored.

pub mod changes;
pub mod config;
pub mod directory;
pub mod entry;
pub mod error;
pub mod fees;
pub mod memory;
pub mod sandbox;
pub mod traits;

pub use changes::{EntryChange, WriteSet};
pub use config::{DirectoryLimits, LedgerConfig};
pub use directory::{describe_owner, dir_add, dir_entries, dir_remove, DirectoryError};
pub use entry::{AccountRoot, DirectoryNode, EntryKind, LedgerEntry, Side, TrustLine, TrustLineFlags};
pub use error::{StoreError, StoreResult};
pub use fees::ReserveSchedule;
pub use memory::{InMemoryLedgerStore, LedgerSnapshot};
pub use sandbox::Sandbox;
pub use traits::ReadView;
