use crate::error::GachaError;
use crate::pity::{PityState, HARD_PITY, RARE_FLOOR};
use crate::pool::Rarity;
use crate::probability::DrawProbability;
use crate::rng::RandomSource;

/// Resolves the rarity tier of one draw from the pity counters.
///
/// A single uniform roll in `[0, 10000)` decides the tier by threshold:
/// `[0, p5)` is legendary, `[p5, p5 + rare_base)` is rare, the rest is
/// common. A hard-pity legendary (`pulls_since_legendary == 89`) is
/// returned without consuming a roll and outranks the rare floor; on
/// the floor pull (`pulls_since_rare == 9`) the legendary chance is
/// still rolled normally and anything below rare is upgraded to rare.
#[derive(Clone, Debug)]
pub struct RarityRoller {
    prob: DrawProbability,
}

impl RarityRoller {
    pub fn new(prob: DrawProbability) -> Result<Self, GachaError> {
        prob.validate()?;
        Ok(Self { prob })
    }

    pub fn probability(&self) -> &DrawProbability {
        &self.prob
    }

    pub fn roll(&self, pity: &PityState, rng: &mut dyn RandomSource) -> Rarity {
        if pity.pulls_since_legendary >= HARD_PITY - 1 {
            return Rarity::Legendary;
        }

        let legendary_bp = self.prob.legendary_bp(pity.pulls_since_legendary);
        let roll = rng.roll_basis_points();

        if roll < legendary_bp {
            return Rarity::Legendary;
        }
        if pity.pulls_since_rare >= RARE_FLOOR - 1 {
            return Rarity::Rare;
        }
        if roll < legendary_bp + self.prob.rare_base_bp {
            return Rarity::Rare;
        }
        Rarity::Common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolType;
    use crate::rng::SeededRandom;
    use uuid::Uuid;

    fn pity_at(since_legendary: i64, since_rare: i64) -> PityState {
        let mut pity = PityState::zeroed(Uuid::new_v4(), PoolType::Standard);
        pity.pulls_since_legendary = since_legendary;
        pity.pulls_since_rare = since_rare;
        pity
    }

    #[test]
    fn hard_pity_forces_legendary_for_every_seed() {
        let roller = RarityRoller::new(DrawProbability::default()).unwrap();
        for seed in 0..100 {
            let mut rng = SeededRandom::new(seed);
            let rarity = roller.roll(&pity_at(HARD_PITY - 1, 0), &mut rng);
            assert_eq!(rarity, Rarity::Legendary);
        }
    }

    #[test]
    fn rare_floor_guarantees_at_least_rare() {
        let roller = RarityRoller::new(DrawProbability::default()).unwrap();
        for seed in 0..1_000 {
            let mut rng = SeededRandom::new(seed);
            let rarity = roller.roll(&pity_at(0, RARE_FLOOR - 1), &mut rng);
            assert!(rarity >= Rarity::Rare, "seed {seed} rolled {rarity:?}");
        }
    }

    #[test]
    fn hard_pity_outranks_rare_floor() {
        let roller = RarityRoller::new(DrawProbability::default()).unwrap();
        let mut rng = SeededRandom::new(0);
        let rarity = roller.roll(&pity_at(HARD_PITY - 1, RARE_FLOOR - 1), &mut rng);
        assert_eq!(rarity, Rarity::Legendary);
    }

    #[test]
    fn rejects_an_overfull_probability_table() {
        let prob = DrawProbability {
            legendary_base_bp: 6_000,
            rare_base_bp: 5_000,
            ..DrawProbability::default()
        };
        assert!(RarityRoller::new(prob).is_err());
    }
}
