use uuid::Uuid;

use crate::error::GachaError;
use crate::pity::PityState;
use crate::pool::{CardPoolDefinition, PoolType, Rarity};
use crate::rng::RandomSource;

/// Resolves a rolled rarity tier to a concrete card.
///
/// The featured pool carries the 50/50 rule: the first legendary has an
/// even chance of being the UP card; losing the flip sets
/// `next_legendary_is_guaranteed_up` so the following legendary is the
/// UP card deterministically, however many pulls later it lands.
#[derive(Clone, Copy, Debug, Default)]
pub struct CardPicker;

impl CardPicker {
    pub fn pick(
        &self,
        rarity: Rarity,
        pool: &CardPoolDefinition,
        pity: &mut PityState,
        rng: &mut dyn RandomSource,
    ) -> Result<(Uuid, bool), GachaError> {
        if rarity == Rarity::Legendary && pool.pool_type == PoolType::Featured {
            return self.pick_featured_legendary(pool, pity, rng);
        }

        let tier = pool.cards_of(rarity);
        if tier.is_empty() {
            return Err(GachaError::configuration(format!(
                "pool {} has no cards at rarity {}",
                pool.pool_type,
                rarity.stars()
            )));
        }
        Ok((tier[rng.pick_index(tier.len())], false))
    }

    fn pick_featured_legendary(
        &self,
        pool: &CardPoolDefinition,
        pity: &mut PityState,
        rng: &mut dyn RandomSource,
    ) -> Result<(Uuid, bool), GachaError> {
        let up_card = pool.up_card.ok_or_else(|| {
            GachaError::configuration("featured pool has no UP card".to_string())
        })?;

        if pity.next_legendary_is_guaranteed_up {
            pity.next_legendary_is_guaranteed_up = false;
            return Ok((up_card, true));
        }

        if rng.coin_flip() {
            return Ok((up_card, true));
        }

        let off_banner = pool.off_banner_legendaries();
        if off_banner.is_empty() {
            return Err(GachaError::configuration(
                "featured pool has no off-banner legendary".to_string(),
            ));
        }
        pity.next_legendary_is_guaranteed_up = true;
        Ok((off_banner[rng.pick_index(off_banner.len())], false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    fn featured_pool(up: Uuid, other: Uuid) -> CardPoolDefinition {
        CardPoolDefinition {
            pool_type: PoolType::Featured,
            up_card: Some(up),
            legendary_cards: vec![up, other],
            rare_cards: vec![Uuid::new_v4(), Uuid::new_v4()],
            common_cards: vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()],
        }
    }

    #[test]
    fn guaranteed_flag_short_circuits_the_coin() {
        let up = Uuid::new_v4();
        let pool = featured_pool(up, Uuid::new_v4());
        let mut pity = PityState::zeroed(Uuid::new_v4(), PoolType::Featured);
        pity.next_legendary_is_guaranteed_up = true;

        // every seed must return the UP card without flipping
        for seed in 0..50 {
            let mut local = pity.clone();
            let mut rng = SeededRandom::new(seed);
            let (card, is_up) = CardPicker
                .pick(Rarity::Legendary, &pool, &mut local, &mut rng)
                .unwrap();
            assert_eq!(card, up);
            assert!(is_up);
            assert!(!local.next_legendary_is_guaranteed_up);
        }
    }

    #[test]
    fn losing_the_coin_sets_the_carryover_flag() {
        let up = Uuid::new_v4();
        let other = Uuid::new_v4();
        let pool = featured_pool(up, other);

        let mut saw_loss = false;
        for seed in 0..200 {
            let mut pity = PityState::zeroed(Uuid::new_v4(), PoolType::Featured);
            let mut rng = SeededRandom::new(seed);
            let (card, is_up) = CardPicker
                .pick(Rarity::Legendary, &pool, &mut pity, &mut rng)
                .unwrap();
            if !is_up {
                saw_loss = true;
                assert_eq!(card, other);
                assert!(pity.next_legendary_is_guaranteed_up);
            } else {
                assert_eq!(card, up);
                assert!(!pity.next_legendary_is_guaranteed_up);
            }
        }
        assert!(saw_loss, "200 coin flips never lost the 50/50");
    }

    #[test]
    fn standard_legendaries_ignore_the_up_mechanic() {
        let pool = CardPoolDefinition {
            pool_type: PoolType::Standard,
            up_card: None,
            legendary_cards: vec![Uuid::new_v4(), Uuid::new_v4()],
            rare_cards: vec![Uuid::new_v4()],
            common_cards: vec![Uuid::new_v4()],
        };
        let mut pity = PityState::zeroed(Uuid::new_v4(), PoolType::Standard);
        let mut rng = SeededRandom::new(3);
        let (card, is_up) = CardPicker
            .pick(Rarity::Legendary, &pool, &mut pity, &mut rng)
            .unwrap();
        assert!(pool.legendary_cards.contains(&card));
        assert!(!is_up);
        assert!(!pity.next_legendary_is_guaranteed_up);
    }

    #[test]
    fn empty_tier_fails_fatally() {
        let pool = CardPoolDefinition {
            pool_type: PoolType::Standard,
            up_card: None,
            legendary_cards: vec![Uuid::new_v4()],
            rare_cards: vec![],
            common_cards: vec![Uuid::new_v4()],
        };
        let mut pity = PityState::zeroed(Uuid::new_v4(), PoolType::Standard);
        let mut rng = SeededRandom::new(0);
        let err = CardPicker
            .pick(Rarity::Rare, &pool, &mut pity, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GachaError::Configuration(_)));
    }
}
