use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad class of a [`ResultCode`], used by callers to decide what to do
/// with the transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultClass {
    /// Applied. Every write of the transition is committed.
    Success,
    /// The transaction is invalid regardless of ledger state.
    Malformed,
    /// Applying failed locally; the ledger view was inconsistent.
    Failure,
    /// Could not apply now; retry once other transactions have applied.
    Retry,
    /// Well formed but without effect on this ledger; a fee may be claimed.
    Claimed,
}

/// Outcome of applying a trust-line transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCode {
    #[serde(rename = "tesSUCCESS")]
    Success,

    #[serde(rename = "temBAD_AMOUNT")]
    BadAmount,
    #[serde(rename = "temBAD_CURRENCY")]
    BadCurrency,
    #[serde(rename = "temDST_IS_SRC")]
    DestinationIsSource,
    #[serde(rename = "temDST_NEEDED")]
    DestinationNeeded,

    #[serde(rename = "tefBAD_LEDGER")]
    BadLedger,

    #[serde(rename = "terNO_ACCOUNT")]
    NoAccount,

    #[serde(rename = "tecDIR_FULL")]
    DirectoryFull,
    #[serde(rename = "tecINSUF_RESERVE_LINE")]
    InsufficientReserveLine,
    #[serde(rename = "tecNO_DST")]
    NoDestination,
    #[serde(rename = "tecNO_LINE_INSUF_RESERVE")]
    NoLineInsufficientReserve,
    #[serde(rename = "tecNO_LINE_REDUNDANT")]
    NoLineRedundant,
}

impl ResultCode {
    /// Every code, in numeric order.
    pub const ALL: [ResultCode; 12] = [
        Self::BadAmount,
        Self::BadCurrency,
        Self::DestinationIsSource,
        Self::DestinationNeeded,
        Self::BadLedger,
        Self::NoAccount,
        Self::Success,
        Self::DirectoryFull,
        Self::InsufficientReserveLine,
        Self::NoDestination,
        Self::NoLineInsufficientReserve,
        Self::NoLineRedundant,
    ];

    /// Stable numeric code.
    pub fn code(&self) -> i32 {
        match self {
            Self::BadAmount => -298,
            Self::BadCurrency => -297,
            Self::DestinationIsSource => -280,
            Self::DestinationNeeded => -279,
            Self::BadLedger => -195,
            Self::NoAccount => -96,
            Self::Success => 0,
            Self::DirectoryFull => 121,
            Self::InsufficientReserveLine => 122,
            Self::NoDestination => 124,
            Self::NoLineInsufficientReserve => 126,
            Self::NoLineRedundant => 127,
        }
    }

    /// Short symbolic name.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Success => "tesSUCCESS",
            Self::BadAmount => "temBAD_AMOUNT",
            Self::BadCurrency => "temBAD_CURRENCY",
            Self::DestinationIsSource => "temDST_IS_SRC",
            Self::DestinationNeeded => "temDST_NEEDED",
            Self::BadLedger => "tefBAD_LEDGER",
            Self::NoAccount => "terNO_ACCOUNT",
            Self::DirectoryFull => "tecDIR_FULL",
            Self::InsufficientReserveLine => "tecINSUF_RESERVE_LINE",
            Self::NoDestination => "tecNO_DST",
            Self::NoLineInsufficientReserve => "tecNO_LINE_INSUF_RESERVE",
            Self::NoLineRedundant => "tecNO_LINE_REDUNDANT",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Success => "The transaction was applied.",
            Self::BadAmount => "Can only send positive amounts.",
            Self::BadCurrency => "Trust lines cannot hold the native currency.",
            Self::DestinationIsSource => "Destination may not be source.",
            Self::DestinationNeeded => "Destination not specified.",
            Self::BadLedger => "Ledger in unexpected state.",
            Self::NoAccount => "The source account does not exist.",
            Self::DirectoryFull => "Can not add entry to full directory.",
            Self::InsufficientReserveLine => "Insufficient reserve to add trust line.",
            Self::NoDestination => "Destination does not exist.",
            Self::NoLineInsufficientReserve => "No such line. Too little reserve to create it.",
            Self::NoLineRedundant => "Can't set non-existent line to default.",
        }
    }

    pub fn class(&self) -> ResultClass {
        match self.code() {
            0 => ResultClass::Success,
            c if c <= -200 => ResultClass::Malformed,
            c if c <= -100 => ResultClass::Failure,
            c if c < 0 => ResultClass::Retry,
            _ => ResultClass::Claimed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` if a later attempt against a changed ledger could succeed.
    pub fn may_succeed_later(&self) -> bool {
        matches!(
            self,
            Self::NoAccount
                | Self::NoDestination
                | Self::InsufficientReserveLine
                | Self::NoLineInsufficientReserve
        )
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_follow_code_ranges() {
        assert_eq!(ResultCode::Success.class(), ResultClass::Success);
        assert_eq!(ResultCode::BadAmount.class(), ResultClass::Malformed);
        assert_eq!(ResultCode::DestinationNeeded.class(), ResultClass::Malformed);
        assert_eq!(ResultCode::BadLedger.class(), ResultClass::Failure);
        assert_eq!(ResultCode::NoAccount.class(), ResultClass::Retry);
        assert_eq!(ResultCode::NoLineRedundant.class(), ResultClass::Claimed);
        assert_eq!(ResultCode::DirectoryFull.class(), ResultClass::Claimed);
    }

    #[test]
    fn all_is_sorted_and_unique() {
        let codes: Vec<i32> = ResultCode::ALL.iter().map(ResultCode::code).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn serde_uses_tokens() {
        for code in ResultCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.token()));
        }
    }

    #[test]
    fn retriable_outcomes() {
        assert!(ResultCode::InsufficientReserveLine.may_succeed_later());
        assert!(ResultCode::NoLineInsufficientReserve.may_succeed_later());
        assert!(ResultCode::NoDestination.may_succeed_later());
        assert!(!ResultCode::NoLineRedundant.may_succeed_later());
        assert!(!ResultCode::DestinationIsSource.may_succeed_later());
        assert!(!ResultCode::Success.may_succeed_later());
    }

    #[test]
    fn display_is_token() {
        assert_eq!(ResultCode::NoDestination.to_string(), "tecNO_DST");
    }
}
