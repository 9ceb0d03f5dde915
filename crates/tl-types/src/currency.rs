use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{decode_fixed, TypeError};

/// Identity of an asset type.
///
/// Standard currencies keep their three-letter ASCII code at bytes 12..15
/// with every other byte zero. Anything else is an opaque 20-byte value and
/// is rendered as hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyId([u8; 20]);

impl CurrencyId {
    /// The base (native) currency. Never valid as a trust-line currency.
    pub const NATIVE: Self = Self([0u8; 20]);

    /// Build a standard currency from a three-letter code.
    pub fn from_code(code: &str) -> Result<Self, TypeError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphanumeric) {
            return Err(TypeError::InvalidCurrency(code.to_string()));
        }
        let mut arr = [0u8; 20];
        arr[12..15].copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Create from raw bytes.
    pub const fn from_raw(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns `true` for the base currency.
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    /// The three-letter code, if this is a standard currency.
    pub fn code(&self) -> Option<&str> {
        if self.is_native() {
            return None;
        }
        let standard = self.0[..12].iter().all(|b| *b == 0)
            && self.0[15..].iter().all(|b| *b == 0)
            && self.0[12..15].iter().all(u8::is_ascii_alphanumeric);
        if standard {
            std::str::from_utf8(&self.0[12..15]).ok()
        } else {
            None
        }
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a three-letter code or a 40-character hex string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() == 3 {
            Self::from_code(s)
        } else {
            decode_fixed::<20>(s).map(Self)
        }
    }
}

impl fmt::Debug for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyId({self})")
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "{}", self.to_hex()),
        }
    }
}

impl TryFrom<String> for CurrencyId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyId> for String {
    fn from(id: CurrencyId) -> Self {
        id.to_string()
    }
}
