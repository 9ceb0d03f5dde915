//! Foundation types for the trustline ledger.
//!
//! This crate provides the identity, amount, and outcome primitives shared by
//! every other trustline crate. Nothing here touches ledger state; it only
//! describes the values that flow through it.
//!
//! # Key Types
//!
//! - [`AccountId`] -- Ordered 20-byte account identity derived with BLAKE3
//! - [`CurrencyId`] -- 20-byte asset identity; [`CurrencyId::NATIVE`] is the base currency
//! - [`LedgerIndex`] -- 32-byte key of a ledger entry, with deterministic derivations
//! - [`IssuedAmount`] -- Signed, currency-tagged amount with an issuer
//! - [`Drops`] -- Base-currency quantity used for balances and reserves
//! - [`Quality`] -- Per-side exchange-rate multiplier (zero means 1.0)
//! - [`ResultCode`] -- Closed taxonomy of transaction outcomes

pub mod account;
pub mod amount;
pub mod currency;
pub mod error;
pub mod index;
pub mod quality;
pub mod result;

pub use account::{AccountId, AccountMaterial};
pub use amount::{Drops, IssuedAmount};
pub use currency::CurrencyId;
pub use error::TypeError;
pub use index::LedgerIndex;
pub use quality::{Quality, QUALITY_ONE};
pub use result::{ResultClass, ResultCode};
