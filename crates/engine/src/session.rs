use uuid::Uuid;

use satintin_common::get_current_timestamp;

use crate::error::GachaError;
use crate::picker::CardPicker;
use crate::pity::PityState;
use crate::pool::{CardPoolDefinition, DrawRecord, Rarity};
use crate::probability::DrawProbability;
use crate::rng::RandomSource;
use crate::roller::RarityRoller;
use crate::store::PityStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCount {
    Single,
    Ten,
}

impl DrawCount {
    pub fn parse(count: i64) -> Result<Self, GachaError> {
        match count {
            1 => Ok(Self::Single),
            10 => Ok(Self::Ten),
            other => Err(GachaError::InvalidDrawCount(other)),
        }
    }

    pub fn draws(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Ten => 10,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DrawOutcome {
    pub card_id: Uuid,
    pub rarity: Rarity,
    pub is_up_card: bool,
}

/// Ordered results of one batch plus the pity snapshot the UI renders
/// its "distance to pity" from. The per-draw records live in the
/// store; reading them back goes through `DrawHistoryStore`.
#[derive(Clone, Debug)]
pub struct DrawBatch {
    pub outcomes: Vec<DrawOutcome>,
    pub pity: PityState,
}

/// Orchestrates one batch of draws for a single (user, pool) pair.
///
/// The caller must hold the per-(user, pool) draw lock; the version CAS
/// inside `PityStore::commit_draw` is the cross-process backstop.
/// Balance checks happen before this type is ever invoked.
pub struct DrawSession<'a, S: PityStore + ?Sized> {
    store: &'a S,
    roller: RarityRoller,
    picker: CardPicker,
}

impl<'a, S: PityStore + ?Sized> DrawSession<'a, S> {
    pub fn new(store: &'a S, prob: DrawProbability) -> Result<Self, GachaError> {
        Ok(Self {
            store,
            roller: RarityRoller::new(prob)?,
            picker: CardPicker,
        })
    }

    /// Runs `count` rolls, committing pity counters and the history
    /// record together after each individual draw.
    ///
    /// Ten-pull guarantee: if draws 1..9 produced nothing above common
    /// and the naive roll for draw 10 is common as well, draw 10 is
    /// upgraded to rare before anything about it is persisted. Draws
    /// 1..9 and their committed counters are never revisited.
    pub async fn draw(
        &self,
        user_id: Uuid,
        pool: &CardPoolDefinition,
        count: DrawCount,
        rng: &mut dyn RandomSource,
    ) -> Result<DrawBatch, GachaError> {
        pool.validate()?;

        let mut pity = self.store.load_pity(user_id, pool.pool_type).await?;
        let total = count.draws();

        let mut outcomes = Vec::with_capacity(total);
        let mut saw_rare_or_better = false;

        for index in 0..total {
            let mut rarity = self.roller.roll(&pity, rng);

            let is_last_of_ten = count == DrawCount::Ten && index == total - 1;
            if is_last_of_ten && !saw_rare_or_better && rarity == Rarity::Common {
                rarity = Rarity::Rare;
            }

            let (card_id, is_up_card) = self.picker.pick(rarity, pool, &mut pity, rng)?;
            pity.record(rarity);

            let record = DrawRecord {
                id: Uuid::new_v4(),
                user_id,
                pool_type: pool.pool_type,
                card_id,
                rarity,
                is_up_card,
                sequence: pity.total_pulls,
                created_at: get_current_timestamp(),
            };
            self.store.commit_draw(&mut pity, &record).await?;

            saw_rare_or_better |= rarity >= Rarity::Rare;
            outcomes.push(DrawOutcome {
                card_id,
                rarity,
                is_up_card,
            });
        }

        tracing::info!(
            user = %user_id,
            pool = %pool.pool_type,
            draws = total,
            pulls_since_legendary = pity.pulls_since_legendary,
            "draw batch committed"
        );

        Ok(DrawBatch { outcomes, pity })
    }
}
