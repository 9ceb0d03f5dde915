use serde::{Deserialize, Serialize};

/// Raw quality value that stands for the default rate of 1.0.
pub const QUALITY_ONE: u32 = 1_000_000_000;

/// Per-side exchange-rate multiplier of a trust line.
///
/// Zero means "use the default rate". A literal [`QUALITY_ONE`] is never
/// kept as such: [`Quality::normalize`] collapses it back to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u32);

impl Quality {
    pub const DEFAULT: Self = Self(0);

    /// Canonical form of a raw rate: `QUALITY_ONE` becomes zero.
    pub fn normalize(raw: u32) -> Self {
        if raw == QUALITY_ONE {
            Self::DEFAULT
        } else {
            Self(raw)
        }
    }

    pub fn is_default(&self) -> bool {
        self.0 == 0
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_one_normalizes_to_default() {
        assert_eq!(Quality::normalize(QUALITY_ONE), Quality::DEFAULT);
        assert!(Quality::normalize(QUALITY_ONE).is_default());
    }

    #[test]
    fn other_rates_are_kept() {
        assert_eq!(Quality::normalize(0), Quality::DEFAULT);
        assert_eq!(Quality::normalize(900_000_000).raw(), 900_000_000);
        assert_eq!(Quality::normalize(QUALITY_ONE + 1).raw(), QUALITY_ONE + 1);
    }
}
