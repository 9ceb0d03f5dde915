//! Ledger-independent checks on a TrustSet.
//!
//! Each check is a pure predicate over the transaction fields. They run in
//! the order of [`STANDARD_CHECKS`] and the first rejection wins, so the
//! order is part of the contract: a transaction that is both negative and
//! self-directed reports the negative limit. The currency check comes
//! last, so it never changes the answer of the three checks before it.

use tl_types::{AccountId, ResultCode};
use tracing::debug;

use crate::transaction::TrustSet;

/// Outcome of a single check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Proceed to the next check.
    Pass,
    /// The transaction is rejected with this result.
    Reject(ResultCode),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// A single preflight check.
pub trait PreflightCheck: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, tx: &TrustSet) -> Verdict;
}

/// Rejects a negative limit: `limit_amount.value < 0`.
pub struct NonNegativeLimit;

impl PreflightCheck for NonNegativeLimit {
    fn name(&self) -> &'static str {
        "non-negative-limit"
    }

    fn check(&self, tx: &TrustSet) -> Verdict {
        if tx.limit_amount.is_negative() {
            Verdict::Reject(ResultCode::BadAmount)
        } else {
            Verdict::Pass
        }
    }
}

/// Rejects a line in the native currency.
pub struct IssuedCurrency;

impl PreflightCheck for IssuedCurrency {
    fn name(&self) -> &'static str {
        "issued-currency"
    }

    fn check(&self, tx: &TrustSet) -> Verdict {
        if tx.currency().is_native() {
            Verdict::Reject(ResultCode::BadCurrency)
        } else {
            Verdict::Pass
        }
    }
}

/// Rejects a counterparty that is absent (zero) or the reserved placeholder.
pub struct DestinationPresent;

impl PreflightCheck for DestinationPresent {
    fn name(&self) -> &'static str {
        "destination-present"
    }

    fn check(&self, tx: &TrustSet) -> Verdict {
        let destination = tx.destination();
        if destination.is_zero() || destination == AccountId::ONE {
            Verdict::Reject(ResultCode::DestinationNeeded)
        } else {
            Verdict::Pass
        }
    }
}

/// Rejects a line from an account to itself.
pub struct NotSelf;

impl PreflightCheck for NotSelf {
    fn name(&self) -> &'static str {
        "not-self"
    }

    fn check(&self, tx: &TrustSet) -> Verdict {
        if tx.destination() == tx.account {
            Verdict::Reject(ResultCode::DestinationIsSource)
        } else {
            Verdict::Pass
        }
    }
}

/// The checks every TrustSet goes through, in evaluation order.
pub const STANDARD_CHECKS: &[&dyn PreflightCheck] =
    &[&NonNegativeLimit, &DestinationPresent, &NotSelf, &IssuedCurrency];

/// Run `checks` in order and return the first rejection, or `Pass`.
pub fn run_checks(checks: &[&dyn PreflightCheck], tx: &TrustSet) -> Verdict {
    for check in checks {
        let verdict = check.check(tx);
        if let Verdict::Reject(code) = verdict {
            debug!(check = check.name(), result = %code, "preflight rejected trust set");
            return verdict;
        }
    }
    Verdict::Pass
}

#[cfg(test)]
mod tests {
    use tl_types::{CurrencyId, IssuedAmount};

    use super::*;

    fn alice() -> AccountId {
        AccountId::from_passphrase("alice")
    }

    fn tx(value: i64, currency: CurrencyId, destination: AccountId) -> TrustSet {
        TrustSet::new(alice(), IssuedAmount::new(value, currency, destination))
    }

    fn usd() -> CurrencyId {
        CurrencyId::from_code("USD").unwrap()
    }

    #[test]
    fn well_formed_passes() {
        let verdict = run_checks(STANDARD_CHECKS, &tx(100, usd(), AccountId::from_passphrase("bob")));
        assert!(verdict.is_pass());
    }

    #[test]
    fn zero_limit_passes_preflight() {
        let verdict = run_checks(STANDARD_CHECKS, &tx(0, usd(), AccountId::from_passphrase("bob")));
        assert!(verdict.is_pass());
    }

    #[test]
    fn negative_limit_is_bad_amount() {
        let verdict = run_checks(STANDARD_CHECKS, &tx(-1, usd(), AccountId::from_passphrase("bob")));
        assert_eq!(verdict, Verdict::Reject(ResultCode::BadAmount));
    }

    #[test]
    fn native_currency_is_rejected() {
        let verdict = run_checks(
            STANDARD_CHECKS,
            &tx(5, CurrencyId::NATIVE, AccountId::from_passphrase("bob")),
        );
        assert_eq!(verdict, Verdict::Reject(ResultCode::BadCurrency));
    }

    #[test]
    fn missing_destination_is_rejected() {
        assert_eq!(
            run_checks(STANDARD_CHECKS, &tx(5, usd(), AccountId::ZERO)),
            Verdict::Reject(ResultCode::DestinationNeeded)
        );
        assert_eq!(
            run_checks(STANDARD_CHECKS, &tx(5, usd(), AccountId::ONE)),
            Verdict::Reject(ResultCode::DestinationNeeded)
        );
    }

    #[test]
    fn self_line_is_rejected() {
        assert_eq!(
            run_checks(STANDARD_CHECKS, &tx(5, usd(), alice())),
            Verdict::Reject(ResultCode::DestinationIsSource)
        );
    }

    #[test]
    fn first_failing_check_wins() {
        // Negative and self-directed: the limit check runs first.
        assert_eq!(
            run_checks(STANDARD_CHECKS, &tx(-5, usd(), alice())),
            Verdict::Reject(ResultCode::BadAmount)
        );
        // A missing destination outranks a native currency.
        assert_eq!(
            run_checks(STANDARD_CHECKS, &tx(5, CurrencyId::NATIVE, AccountId::ZERO)),
            Verdict::Reject(ResultCode::DestinationNeeded)
        );
        // So does a self line.
        assert_eq!(
            run_checks(STANDARD_CHECKS, &tx(5, CurrencyId::NATIVE, alice())),
            Verdict::Reject(ResultCode::DestinationIsSource)
        );
        // Missing destination comes before the self check.
        let mut zero_account = tx(5, usd(), AccountId::ZERO);
        zero_account.account = AccountId::ZERO;
        assert_eq!(
            run_checks(STANDARD_CHECKS, &zero_account),
            Verdict::Reject(ResultCode::DestinationNeeded)
        );
    }

    #[test]
    fn custom_check_lists() {
        let only_self: &[&dyn PreflightCheck] = &[&NotSelf];
        assert!(run_checks(only_self, &tx(-5, usd(), AccountId::from_passphrase("bob"))).is_pass());
    }
}
