use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pool::{PoolType, Rarity};

/// The 90th pull is a guaranteed legendary.
pub const HARD_PITY: i64 = 90;
/// The 10th pull since the last rare-or-better is at least a rare.
pub const RARE_FLOOR: i64 = 10;

/// Per (user, pool) pity counters. Exclusively mutated by a
/// `DrawSession` holding the per-key draw lock; `version` backs the
/// compare-and-swap in the store so a second writer loses cleanly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    pub user_id: Uuid,
    pub pool_type: PoolType,

    pub pulls_since_rare: i64,
    pub pulls_since_legendary: i64,
    pub next_legendary_is_guaranteed_up: bool,
    pub total_pulls: i64,

    pub version: i64,
    pub updated_at: i64,
}

impl PityState {
    pub fn zeroed(user_id: Uuid, pool_type: PoolType) -> Self {
        Self {
            user_id,
            pool_type,
            ..Self::default()
        }
    }

    /// Advance the counters for one completed draw of `rarity`.
    ///
    /// Invariants: `pulls_since_legendary` resets to 0 exactly on a
    /// legendary; `pulls_since_rare` resets on rare or legendary.
    pub fn record(&mut self, rarity: Rarity) {
        self.total_pulls += 1;
        match rarity {
            Rarity::Legendary => {
                self.pulls_since_legendary = 0;
                self.pulls_since_rare = 0;
            }
            Rarity::Rare => {
                self.pulls_since_legendary += 1;
                self.pulls_since_rare = 0;
            }
            Rarity::Common => {
                self.pulls_since_legendary += 1;
                self.pulls_since_rare += 1;
            }
        }
        debug_assert!(self.pulls_since_legendary < HARD_PITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_reset_per_tier() {
        let mut pity = PityState::zeroed(Uuid::new_v4(), PoolType::Standard);

        pity.record(Rarity::Common);
        assert_eq!(pity.pulls_since_rare, 1);
        assert_eq!(pity.pulls_since_legendary, 1);

        pity.record(Rarity::Rare);
        assert_eq!(pity.pulls_since_rare, 0);
        assert_eq!(pity.pulls_since_legendary, 2);

        pity.record(Rarity::Legendary);
        assert_eq!(pity.pulls_since_rare, 0);
        assert_eq!(pity.pulls_since_legendary, 0);
        assert_eq!(pity.total_pulls, 3);
    }
}
