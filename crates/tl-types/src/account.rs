use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{decode_fixed, TypeError};

/// Material used to derive an [`AccountId`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountMaterial {
    /// A raw 32-byte public key.
    PublicKey([u8; 32]),
    /// A human label, for fixtures and demo ledgers.
    Passphrase(String),
}

/// Identity of a ledger account.
///
/// Twenty opaque bytes, totally ordered by byte value. The ordering is what
/// decides which party of a trust line is the "low" side, so it must never
/// depend on anything but the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// The all-zero account. Stands for "no account".
    pub const ZERO: Self = Self([0u8; 20]);

    /// Reserved placeholder account, used as the issuer of line balances.
    pub const ONE: Self = {
        let mut bytes = [0u8; 20];
        bytes[19] = 1;
        Self(bytes)
    };

    /// Derive an `AccountId` from account material.
    pub fn derive(material: &AccountMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tl-account-v1:");
        match material {
            AccountMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
            AccountMaterial::Passphrase(label) => {
                hasher.update(b"passphrase:");
                hasher.update(label.as_bytes());
            }
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hasher.finalize().as_bytes()[..20]);
        Self(bytes)
    }

    /// Shorthand for deriving from a passphrase label.
    pub fn from_passphrase(label: &str) -> Self {
        Self::derive(&AccountMaterial::Passphrase(label.to_string()))
    }

    /// Create an ephemeral (random) account for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&AccountMaterial::PublicKey(bytes))
    }

    /// Create from raw bytes. Use `derive()` for production code.
    pub const fn from_raw(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns `true` for the all-zero "no account" value.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("ac:{}", hex::encode(&self.0[..4]))
    }

    /// Parse from a hex string (40 hex characters, optional `ac:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("ac:").unwrap_or(s);
        decode_fixed::<20>(s).map(Self)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.short_id())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

impl TryFrom<String> for AccountId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_hex()
    }
}
