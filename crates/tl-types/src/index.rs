use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::currency::CurrencyId;
use crate::error::{decode_fixed, TypeError};

/// Key of a ledger entry.
///
/// Every entry lives at an index derived from the values that identify it.
/// Derivations are domain separated with a one-byte namespace so that two
/// kinds of entry can never collide on the same key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LedgerIndex([u8; 32]);

const SPACE_ACCOUNT: u8 = b'a';
const SPACE_OWNER_DIR: u8 = b'O';
const SPACE_DIR_NODE: u8 = b'd';
const SPACE_TRUST_LINE: u8 = b'r';

fn hash_in(space: u8, parts: &[&[u8]]) -> LedgerIndex {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tl-index-v1:");
    hasher.update(&[space]);
    for part in parts {
        hasher.update(part);
    }
    LedgerIndex(*hasher.finalize().as_bytes())
}

impl LedgerIndex {
    /// Index of an account's root entry.
    pub fn account_root(account: &AccountId) -> Self {
        hash_in(SPACE_ACCOUNT, &[account.as_bytes()])
    }

    /// Index of the root page of an account's owner directory.
    pub fn owner_dir(account: &AccountId) -> Self {
        hash_in(SPACE_OWNER_DIR, &[account.as_bytes()])
    }

    /// Index of page `page` of the directory rooted at `root`. Page 0 is the root.
    pub fn dir_page(root: &LedgerIndex, page: u64) -> Self {
        if page == 0 {
            return *root;
        }
        hash_in(SPACE_DIR_NODE, &[root.as_bytes(), &page.to_be_bytes()])
    }

    /// Index of the trust line between `a` and `b` in `currency`.
    ///
    /// The pair is unordered: `trust_line(a, b, c) == trust_line(b, a, c)`.
    pub fn trust_line(a: &AccountId, b: &AccountId, currency: &CurrencyId) -> Self {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        hash_in(
            SPACE_TRUST_LINE,
            &[low.as_bytes(), high.as_bytes(), currency.as_bytes()],
        )
    }

    /// Create from a raw 32-byte key.
    pub const fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        decode_fixed::<32>(s).map(Self)
    }
}

impl fmt::Debug for LedgerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerIndex({})", self.short_hex())
    }
}

impl fmt::Display for LedgerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for LedgerIndex {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<LedgerIndex> for String {
    fn from(index: LedgerIndex) -> Self {
        index.to_hex()
    }
}
