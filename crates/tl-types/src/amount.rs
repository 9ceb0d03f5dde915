use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::currency::CurrencyId;

/// A signed amount of an issued (non-native) currency.
///
/// The issuer means different things depending on where the amount sits:
/// on a transaction's limit it names the counterparty, on a stored limit it
/// names the side that owns the limit, and on a stored balance it is the
/// [`AccountId::ONE`] placeholder.
///
/// Values are integral units of the currency; fractional limits such as
/// `0.5 USD` are not representable. Negation saturates, so `-i64::MIN` is
/// `i64::MAX` and `-(-x) == x` holds for every value except `i64::MIN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub value: i64,
    pub currency: CurrencyId,
    pub issuer: AccountId,
}

impl IssuedAmount {
    pub fn new(value: i64, currency: CurrencyId, issuer: AccountId) -> Self {
        Self {
            value,
            currency,
            issuer,
        }
    }

    /// A zero amount of `currency` issued by `issuer`.
    pub fn zero(currency: CurrencyId, issuer: AccountId) -> Self {
        Self::new(0, currency, issuer)
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    /// The same value and currency with a different issuer.
    pub fn with_issuer(self, issuer: AccountId) -> Self {
        Self { issuer, ..self }
    }
}

impl Neg for IssuedAmount {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: self.value.saturating_neg(),
            ..self
        }
    }
}

impl fmt::Display for IssuedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.value, self.currency, self.issuer)
    }
}

/// A quantity of the base currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drops(pub u64);

impl Drops {
    pub const ZERO: Self = Self(0);

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

impl fmt::Display for Drops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} drops", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyId {
        CurrencyId::from_code("USD").unwrap()
    }

    #[test]
    fn sign_tests() {
        let issuer = AccountId::from_passphrase("gateway");
        assert!(IssuedAmount::zero(usd(), issuer).is_zero());
        assert!(IssuedAmount::new(5, usd(), issuer).is_positive());
        assert!(IssuedAmount::new(-5, usd(), issuer).is_negative());
        assert!(!IssuedAmount::zero(usd(), issuer).is_positive());
    }

    #[test]
    fn negation_keeps_currency_and_issuer() {
        let issuer = AccountId::ONE;
        let amount = IssuedAmount::new(42, usd(), issuer);
        let negated = -amount;
        assert_eq!(negated.value, -42);
        assert_eq!(negated.currency, usd());
        assert_eq!(negated.issuer, issuer);
        assert_eq!(-negated, amount);
    }

    #[test]
    fn negating_the_minimum_saturates() {
        let amount = IssuedAmount::new(i64::MIN, usd(), AccountId::ONE);
        assert_eq!((-amount).value, i64::MAX);
        assert_eq!((-(-amount)).value, -i64::MAX);
        let amount = IssuedAmount::new(i64::MIN + 1, usd(), AccountId::ONE);
        assert_eq!(-(-amount), amount);
    }

    #[test]
    fn with_issuer_only_changes_issuer() {
        let a = AccountId::from_passphrase("a");
        let b = AccountId::from_passphrase("b");
        let amount = IssuedAmount::new(100, usd(), a).with_issuer(b);
        assert_eq!(amount, IssuedAmount::new(100, usd(), b));
    }

    #[test]
    fn drops_arithmetic_saturates() {
        assert_eq!(Drops(u64::MAX).saturating_add(Drops(1)), Drops(u64::MAX));
        assert_eq!(Drops(10).saturating_mul(3), Drops(30));
        assert!(Drops(1) < Drops(2));
    }
}
