//! Bilateral helpers: which side a party occupies and what that side holds.

use tl_store::{Side, TrustLine};
use tl_types::{AccountId, IssuedAmount, Quality};

/// The two parties of a line, resolved to canonical sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSides {
    /// Side of the account submitting the transaction.
    pub requester: Side,
    pub low: AccountId,
    pub high: AccountId,
}

impl LineSides {
    pub fn new(requester: AccountId, counterparty: AccountId) -> Self {
        let side = Side::of(&requester, &counterparty);
        let (low, high) = match side {
            Side::Low => (requester, counterparty),
            Side::High => (counterparty, requester),
        };
        Self {
            requester: side,
            low,
            high,
        }
    }

    pub fn counterparty(&self) -> Side {
        self.requester.opposite()
    }

    pub fn account(&self, side: Side) -> AccountId {
        match side {
            Side::Low => self.low,
            Side::High => self.high,
        }
    }
}

/// Everything one side of a line controls, as that side sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideState {
    pub limit: IssuedAmount,
    /// Effective quality-in; zero means default.
    pub quality_in: Quality,
    /// Effective quality-out; zero means default.
    pub quality_out: Quality,
    /// Balance from this side's perspective.
    pub balance: IssuedAmount,
}

impl SideState {
    /// Read `side`'s state from a line. Absent and `QUALITY_ONE` qualities
    /// both read as default.
    pub fn of(line: &TrustLine, side: Side) -> Self {
        let effective = |q: Option<Quality>| Quality::normalize(q.unwrap_or_default().raw());
        Self {
            limit: line.limit(side),
            quality_in: effective(line.quality_in(side)),
            quality_out: effective(line.quality_out(side)),
            balance: line.balance_for(side),
        }
    }

    /// A side needs a reserve slot while it holds any non-default setting
    /// or is owed a positive balance.
    pub fn requires_reserve(&self) -> bool {
        !self.quality_in.is_default()
            || !self.quality_out.is_default()
            || !self.limit.is_zero()
            || self.balance.is_positive()
    }
}
