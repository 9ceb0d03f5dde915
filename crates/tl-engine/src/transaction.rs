use serde::{Deserialize, Serialize};
use tl_types::{AccountId, CurrencyId, IssuedAmount};

/// Decoded fields of a TrustSet transaction.
///
/// The limit amount carries three things at once: its value is the
/// requester's new limit, its currency is the line's currency, and its
/// issuer is the counterparty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSet {
    /// The requesting account.
    pub account: AccountId,
    pub limit_amount: IssuedAmount,
    /// Raw quality-in, if the transaction sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_in: Option<u32>,
    /// Raw quality-out, if the transaction sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_out: Option<u32>,
}

impl TrustSet {
    pub fn new(account: AccountId, limit_amount: IssuedAmount) -> Self {
        Self {
            account,
            limit_amount,
            quality_in: None,
            quality_out: None,
        }
    }

    pub fn with_quality_in(mut self, quality: u32) -> Self {
        self.quality_in = Some(quality);
        self
    }

    pub fn with_quality_out(mut self, quality: u32) -> Self {
        self.quality_out = Some(quality);
        self
    }

    /// The counterparty named by the limit amount's issuer.
    pub fn destination(&self) -> AccountId {
        self.limit_amount.issuer
    }

    pub fn currency(&self) -> CurrencyId {
        self.limit_amount.currency
    }
}

/// How a transaction is being applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyFlags {
    /// The ledger is still open (speculative). Reserve requirements are only
    /// enforced in this mode.
    pub open_ledger: bool,
}

impl ApplyFlags {
    pub fn open() -> Self {
        Self { open_ledger: true }
    }

    pub fn closed() -> Self {
        Self { open_ledger: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_and_currency_come_from_limit() {
        let alice = AccountId::from_passphrase("alice");
        let bob = AccountId::from_passphrase("bob");
        let usd = CurrencyId::from_code("USD").unwrap();
        let tx = TrustSet::new(alice, IssuedAmount::new(10, usd, bob)).with_quality_in(7);
        assert_eq!(tx.destination(), bob);
        assert_eq!(tx.currency(), usd);
        assert_eq!(tx.quality_in, Some(7));
        assert_eq!(tx.quality_out, None);
    }

    #[test]
    fn json_omits_unset_qualities() {
        let alice = AccountId::from_passphrase("alice");
        let usd = CurrencyId::from_code("USD").unwrap();
        let tx = TrustSet::new(alice, IssuedAmount::new(10, usd, AccountId::ONE));
        let json = serde_json::to_string(&tx).unwrap();
        assert!(!json.contains("quality"));
        let parsed: TrustSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tx);
    }

    #[test]
    fn flags_constructors() {
        assert!(ApplyFlags::open().open_ledger);
        assert!(!ApplyFlags::closed().open_ledger);
        assert_eq!(ApplyFlags::default(), ApplyFlags::closed());
    }
}
