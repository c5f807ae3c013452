use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GachaError;

/// The two banners the client exposes. Pity counters are fully
/// independent between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolType {
    #[default]
    Standard,
    Featured,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Featured => "featured",
        }
    }

    pub fn parse(value: &str) -> Result<Self, GachaError> {
        match value {
            "standard" => Ok(Self::Standard),
            "featured" => Ok(Self::Featured),
            other => Err(GachaError::InvalidPool(other.to_string())),
        }
    }
}

impl std::fmt::Display for PoolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn stars(&self) -> i16 {
        match self {
            Self::Common => 3,
            Self::Rare => 4,
            Self::Legendary => 5,
        }
    }

    pub fn from_stars(stars: i16) -> Result<Self, GachaError> {
        match stars {
            3 => Ok(Self::Common),
            4 => Ok(Self::Rare),
            5 => Ok(Self::Legendary),
            other => Err(GachaError::configuration(format!(
                "unknown rarity level {other}"
            ))),
        }
    }

    /// The label the client's history view matches on.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Common => "普通",
            Self::Rare => "稀有",
            Self::Legendary => "传说",
        }
    }
}

/// One individual card outcome. Written once, never mutated.
/// `sequence` is the user's lifetime draw index within the pool (the
/// `total_pulls` value after the draw); together with `created_at` it
/// gives the total order the history endpoint pages by.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrawRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pool_type: PoolType,
    pub card_id: Uuid,
    pub rarity: Rarity,
    pub is_up_card: bool,
    pub sequence: i64,
    pub created_at: i64,
}

/// Static banner configuration: which cards sit in which tier, and for
/// the featured banner, which legendary is rate-up.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardPoolDefinition {
    pub pool_type: PoolType,
    pub up_card: Option<Uuid>,
    pub legendary_cards: Vec<Uuid>,
    pub rare_cards: Vec<Uuid>,
    pub common_cards: Vec<Uuid>,
}

impl CardPoolDefinition {
    /// A pool that fails validation must never serve a draw; this is
    /// checked once when the definition is loaded.
    pub fn validate(&self) -> Result<(), GachaError> {
        if self.legendary_cards.is_empty() {
            return Err(GachaError::configuration(format!(
                "pool {} has no legendary cards",
                self.pool_type
            )));
        }
        if self.rare_cards.is_empty() {
            return Err(GachaError::configuration(format!(
                "pool {} has no rare cards",
                self.pool_type
            )));
        }
        if self.common_cards.is_empty() {
            return Err(GachaError::configuration(format!(
                "pool {} has no common cards",
                self.pool_type
            )));
        }

        match (self.pool_type, self.up_card) {
            (PoolType::Featured, None) => Err(GachaError::configuration(
                "featured pool has no UP card".to_string(),
            )),
            (PoolType::Featured, Some(up)) => {
                if !self.legendary_cards.contains(&up) {
                    return Err(GachaError::configuration(
                        "UP card is not part of the legendary tier".to_string(),
                    ));
                }
                if self.legendary_cards.len() < 2 {
                    // the lost 50/50 needs at least one off-banner legendary
                    return Err(GachaError::configuration(
                        "featured pool has no off-banner legendary".to_string(),
                    ));
                }
                Ok(())
            }
            (PoolType::Standard, _) => Ok(()),
        }
    }

    pub fn cards_of(&self, rarity: Rarity) -> &[Uuid] {
        match rarity {
            Rarity::Legendary => &self.legendary_cards,
            Rarity::Rare => &self.rare_cards,
            Rarity::Common => &self.common_cards,
        }
    }

    pub fn off_banner_legendaries(&self) -> Vec<Uuid> {
        match self.up_card {
            Some(up) => self
                .legendary_cards
                .iter()
                .copied()
                .filter(|id| *id != up)
                .collect(),
            None => self.legendary_cards.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn featured_pool() -> CardPoolDefinition {
        let up = Uuid::new_v4();
        CardPoolDefinition {
            pool_type: PoolType::Featured,
            up_card: Some(up),
            legendary_cards: vec![up, Uuid::new_v4()],
            rare_cards: vec![Uuid::new_v4()],
            common_cards: vec![Uuid::new_v4()],
        }
    }

    #[test]
    fn valid_featured_pool_passes() {
        assert!(featured_pool().validate().is_ok());
    }

    #[test]
    fn empty_tier_is_a_configuration_error() {
        let mut pool = featured_pool();
        pool.rare_cards.clear();
        assert!(matches!(
            pool.validate(),
            Err(GachaError::Configuration(_))
        ));
    }

    #[test]
    fn featured_pool_requires_up_card_in_legendary_tier() {
        let mut pool = featured_pool();
        pool.up_card = Some(Uuid::new_v4());
        assert!(pool.validate().is_err());
    }

    #[test]
    fn pool_type_round_trips() {
        assert_eq!(PoolType::parse("featured").unwrap(), PoolType::Featured);
        assert_eq!(PoolType::parse("standard").unwrap(), PoolType::Standard);
        assert!(matches!(
            PoolType::parse("limited"),
            Err(GachaError::InvalidPool(_))
        ));
    }
}
