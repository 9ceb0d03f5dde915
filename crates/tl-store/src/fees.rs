use serde::{Deserialize, Serialize};
use tl_types::Drops;

/// Reserve schedule of a ledger.
///
/// An account must hold `base + increment * owner_count` of the base
/// currency. The requirement is not scaled by load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveSchedule {
    /// Reserve for an account that owns nothing.
    pub base: Drops,
    /// Additional reserve per owned object.
    pub increment: Drops,
}

impl ReserveSchedule {
    pub fn new(base: Drops, increment: Drops) -> Self {
        Self { base, increment }
    }

    /// Minimum balance for an account owning `owner_count` objects.
    pub fn reserve(&self, owner_count: u32) -> Drops {
        self.base
            .saturating_add(self.increment.saturating_mul(u64::from(owner_count)))
    }
}

impl Default for ReserveSchedule {
    fn default() -> Self {
        Self {
            base: Drops(200_000_000),
            increment: Drops(50_000_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_grows_by_increment() {
        let fees = ReserveSchedule::new(Drops(200), Drops(50));
        assert_eq!(fees.reserve(0), Drops(200));
        assert_eq!(fees.reserve(1), Drops(250));
        assert_eq!(fees.reserve(4), Drops(400));
    }

    #[test]
    fn reserve_saturates() {
        let fees = ReserveSchedule::new(Drops(u64::MAX - 1), Drops(u64::MAX));
        assert_eq!(fees.reserve(u32::MAX), Drops(u64::MAX));
    }

    #[test]
    fn default_schedule() {
        let fees = ReserveSchedule::default();
        assert_eq!(fees.reserve(0), Drops(200_000_000));
        assert_eq!(fees.reserve(2), Drops(300_000_000));
    }
}
