use std::fmt;

use serde::{Deserialize, Serialize};
use tl_types::{AccountId, CurrencyId, Drops, IssuedAmount, LedgerIndex, Quality};

/// One party of a trust line, by canonical identifier order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Low,
    High,
}

impl Side {
    /// The side `account` occupies on a line shared with `other`.
    pub fn of(account: &AccountId, other: &AccountId) -> Self {
        if account > other {
            Self::High
        } else {
            Self::Low
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Per-side flags of a trust line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustLineFlags {
    /// The low account currently pays reserve for this line.
    #[serde(default)]
    pub low_reserve: bool,
    /// The high account currently pays reserve for this line.
    #[serde(default)]
    pub high_reserve: bool,
}

impl TrustLineFlags {
    pub const LOW_RESERVE_BIT: u32 = 0x0001_0000;
    pub const HIGH_RESERVE_BIT: u32 = 0x0002_0000;

    /// Flags with only `side`'s reserve bit set.
    pub fn reserved_by(side: Side) -> Self {
        let mut flags = Self::default();
        flags.set_reserve(side, true);
        flags
    }

    pub fn reserve(&self, side: Side) -> bool {
        match side {
            Side::Low => self.low_reserve,
            Side::High => self.high_reserve,
        }
    }

    pub fn set_reserve(&mut self, side: Side, claimed: bool) {
        match side {
            Side::Low => self.low_reserve = claimed,
            Side::High => self.high_reserve = claimed,
        }
    }

    /// On-ledger bit representation.
    pub fn to_bits(self) -> u32 {
        let mut bits = 0;
        if self.low_reserve {
            bits |= Self::LOW_RESERVE_BIT;
        }
        if self.high_reserve {
            bits |= Self::HIGH_RESERVE_BIT;
        }
        bits
    }

    /// Decode from the on-ledger bits. Unknown bits are ignored.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            low_reserve: bits & Self::LOW_RESERVE_BIT != 0,
            high_reserve: bits & Self::HIGH_RESERVE_BIT != 0,
        }
    }
}

/// Root entry of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRoot {
    pub account: AccountId,
    /// Base-currency balance.
    pub balance: Drops,
    /// Number of ledger objects the account keeps reserve for.
    #[serde(default)]
    pub owner_count: u32,
}

impl AccountRoot {
    pub fn new(account: AccountId, balance: Drops) -> Self {
        Self {
            account,
            balance,
            owner_count: 0,
        }
    }

    pub fn index(&self) -> LedgerIndex {
        LedgerIndex::account_root(&self.account)
    }
}

/// A bilateral credit relationship between two accounts in one currency.
///
/// Every field is stored from the low account's perspective. The issuer of
/// `low_limit` is the low account and the issuer of `high_limit` is the
/// high account, which is how the two parties are recovered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLine {
    /// Balance as seen by the low account. The high account sees its negation.
    pub balance: IssuedAmount,
    pub low_limit: IssuedAmount,
    pub high_limit: IssuedAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_quality_in: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_quality_out: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_quality_in: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_quality_out: Option<Quality>,
    #[serde(default)]
    pub flags: TrustLineFlags,
}

impl TrustLine {
    pub fn low_account(&self) -> AccountId {
        self.low_limit.issuer
    }

    pub fn high_account(&self) -> AccountId {
        self.high_limit.issuer
    }

    pub fn account(&self, side: Side) -> AccountId {
        match side {
            Side::Low => self.low_account(),
            Side::High => self.high_account(),
        }
    }

    pub fn currency(&self) -> CurrencyId {
        self.balance.currency
    }

    pub fn index(&self) -> LedgerIndex {
        LedgerIndex::trust_line(&self.low_account(), &self.high_account(), &self.currency())
    }

    /// Balance from `side`'s perspective.
    pub fn balance_for(&self, side: Side) -> IssuedAmount {
        match side {
            Side::Low => self.balance,
            Side::High => -self.balance,
        }
    }

    pub fn limit(&self, side: Side) -> IssuedAmount {
        match side {
            Side::Low => self.low_limit,
            Side::High => self.high_limit,
        }
    }

    pub fn set_limit(&mut self, side: Side, limit: IssuedAmount) {
        match side {
            Side::Low => self.low_limit = limit,
            Side::High => self.high_limit = limit,
        }
    }

    pub fn quality_in(&self, side: Side) -> Option<Quality> {
        match side {
            Side::Low => self.low_quality_in,
            Side::High => self.high_quality_in,
        }
    }

    /// Store (`Some`) or remove (`None`) `side`'s quality-in.
    pub fn set_quality_in(&mut self, side: Side, quality: Option<Quality>) {
        match side {
            Side::Low => self.low_quality_in = quality,
            Side::High => self.high_quality_in = quality,
        }
    }

    pub fn quality_out(&self, side: Side) -> Option<Quality> {
        match side {
            Side::Low => self.low_quality_out,
            Side::High => self.high_quality_out,
        }
    }

    /// Store (`Some`) or remove (`None`) `side`'s quality-out.
    pub fn set_quality_out(&mut self, side: Side, quality: Option<Quality>) {
        match side {
            Side::Low => self.low_quality_out = quality,
            Side::High => self.high_quality_out = quality,
        }
    }
}

/// One page of an owner directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Index of the directory's first page.
    pub root_index: LedgerIndex,
    /// Page number; 0 is the root page.
    pub page: u64,
    /// Account that owns the directory.
    pub owner: AccountId,
    /// Entries listed on this page, in insertion order.
    #[serde(default)]
    pub indexes: Vec<LedgerIndex>,
    /// Next page number; 0 when this is the last page.
    #[serde(default)]
    pub index_next: u64,
    /// Previous page number. On the root page this is the last page.
    #[serde(default)]
    pub index_previous: u64,
}

impl DirectoryNode {
    /// An empty page, before any describer has run.
    pub fn empty(root_index: LedgerIndex, page: u64) -> Self {
        Self {
            root_index,
            page,
            owner: AccountId::ZERO,
            indexes: Vec::new(),
            index_next: 0,
            index_previous: 0,
        }
    }

    pub fn index(&self) -> LedgerIndex {
        LedgerIndex::dir_page(&self.root_index, self.page)
    }

    pub fn is_root(&self) -> bool {
        self.page == 0
    }
}

/// Type tag of a [`LedgerEntry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    AccountRoot,
    TrustLine,
    DirectoryNode,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountRoot => write!(f, "AccountRoot"),
            Self::TrustLine => write!(f, "TrustLine"),
            Self::DirectoryNode => write!(f, "DirectoryNode"),
        }
    }
}

/// Any entry stored in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEntry {
    AccountRoot(AccountRoot),
    TrustLine(TrustLine),
    DirectoryNode(DirectoryNode),
}

impl LedgerEntry {
    /// The index this entry is stored at.
    pub fn index(&self) -> LedgerIndex {
        match self {
            Self::AccountRoot(root) => root.index(),
            Self::TrustLine(line) => line.index(),
            Self::DirectoryNode(node) => node.index(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::AccountRoot(_) => EntryKind::AccountRoot,
            Self::TrustLine(_) => EntryKind::TrustLine,
            Self::DirectoryNode(_) => EntryKind::DirectoryNode,
        }
    }

    pub fn as_account_root(&self) -> Option<&AccountRoot> {
        match self {
            Self::AccountRoot(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_trust_line(&self) -> Option<&TrustLine> {
        match self {
            Self::TrustLine(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_directory_node(&self) -> Option<&DirectoryNode> {
        match self {
            Self::DirectoryNode(node) => Some(node),
            _ => None,
        }
    }
}

impl From<AccountRoot> for LedgerEntry {
    fn from(root: AccountRoot) -> Self {
        Self::AccountRoot(root)
    }
}

impl From<TrustLine> for LedgerEntry {
    fn from(line: TrustLine) -> Self {
        Self::TrustLine(line)
    }
}

impl From<DirectoryNode> for LedgerEntry {
    fn from(node: DirectoryNode) -> Self {
        Self::DirectoryNode(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyId {
        CurrencyId::from_code("USD").unwrap()
    }

    fn line(low: AccountId, high: AccountId) -> TrustLine {
        TrustLine {
            balance: IssuedAmount::new(25, usd(), AccountId::ONE),
            low_limit: IssuedAmount::new(100, usd(), low),
            high_limit: IssuedAmount::zero(usd(), high),
            low_quality_in: None,
            low_quality_out: None,
            high_quality_in: None,
            high_quality_out: None,
            flags: TrustLineFlags::reserved_by(Side::Low),
        }
    }

    fn ordered_pair() -> (AccountId, AccountId) {
        let a = AccountId::from_passphrase("alice");
        let b = AccountId::from_passphrase("bob");
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    #[test]
    fn side_of_uses_identifier_order() {
        let (low, high) = ordered_pair();
        assert_eq!(Side::of(&low, &high), Side::Low);
        assert_eq!(Side::of(&high, &low), Side::High);
        assert_eq!(Side::Low.opposite(), Side::High);
    }

    #[test]
    fn flag_bits_roundtrip() {
        let mut flags = TrustLineFlags::default();
        assert_eq!(flags.to_bits(), 0);
        flags.set_reserve(Side::High, true);
        assert_eq!(flags.to_bits(), TrustLineFlags::HIGH_RESERVE_BIT);
        flags.set_reserve(Side::Low, true);
        assert_eq!(TrustLineFlags::from_bits(flags.to_bits()), flags);
        assert!(TrustLineFlags::from_bits(0x0001_0001).reserve(Side::Low));
        assert!(!TrustLineFlags::from_bits(0x0001_0001).reserve(Side::High));
    }

    #[test]
    fn high_balance_is_negated_low_balance() {
        let (low, high) = ordered_pair();
        let line = line(low, high);
        assert_eq!(line.balance_for(Side::Low).value, 25);
        assert_eq!(line.balance_for(Side::High).value, -25);
    }

    #[test]
    fn accounts_come_from_limit_issuers() {
        let (low, high) = ordered_pair();
        let line = line(low, high);
        assert_eq!(line.account(Side::Low), low);
        assert_eq!(line.account(Side::High), high);
        assert_eq!(line.index(), LedgerIndex::trust_line(&high, &low, &usd()));
    }

    #[test]
    fn quality_setters_are_per_side() {
        let (low, high) = ordered_pair();
        let mut line = line(low, high);
        line.set_quality_in(Side::High, Some(Quality(5)));
        line.set_quality_out(Side::Low, Some(Quality(7)));
        assert_eq!(line.quality_in(Side::High), Some(Quality(5)));
        assert_eq!(line.quality_in(Side::Low), None);
        assert_eq!(line.quality_out(Side::Low), Some(Quality(7)));
        line.set_quality_out(Side::Low, None);
        assert_eq!(line.quality_out(Side::Low), None);
    }

    #[test]
    fn entry_index_and_kind() {
        let account = AccountId::from_passphrase("alice");
        let entry = LedgerEntry::from(AccountRoot::new(account, Drops(10)));
        assert_eq!(entry.kind(), EntryKind::AccountRoot);
        assert_eq!(entry.index(), LedgerIndex::account_root(&account));
        assert!(entry.as_trust_line().is_none());

        let root = LedgerIndex::owner_dir(&account);
        let page = LedgerEntry::from(DirectoryNode::empty(root, 3));
        assert_eq!(page.index(), LedgerIndex::dir_page(&root, 3));
    }

    #[test]
    fn absent_qualities_are_not_serialized() {
        let (low, high) = ordered_pair();
        let json = serde_json::to_string(&LedgerEntry::from(line(low, high))).unwrap();
        assert!(json.contains("\"type\":\"TrustLine\""));
        assert!(!json.contains("quality"));
        let parsed: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LedgerEntry::from(line(low, high)));
    }
}
