use std::collections::HashSet;

use uuid::Uuid;

use satintin_clients::{AssetService, CardCatalog, CardTemplate, DRAW_COST_SINGLE, DRAW_COST_TEN};
use satintin_engine::{
    CardPoolStore, DrawCount, DrawHistoryStore, DrawProbability, DrawSession, GachaError,
    PityState, PityStore, PoolType, RandomSource, Rarity,
};

use crate::middleware::AuthenticatedUser;

#[derive(Clone, Debug)]
pub struct DrawResultCard {
    pub card_id: Uuid,
    pub rarity: Rarity,
    pub is_up_card: bool,
    pub template: CardTemplate,
}

#[derive(Clone, Debug)]
pub struct DrawRequestOutcome {
    pub cards: Vec<DrawResultCard>,
    pub is_new_card: bool,
    pub pity: PityState,
}

/// Metadata lookup with the degradation policy the draw and history
/// responses share: a failed lookup is logged and answered with a
/// placeholder template instead of failing the request.
pub(crate) async fn template_or_placeholder<C>(catalog: &C, card_id: Uuid) -> CardTemplate
where
    C: CardCatalog + ?Sized,
{
    match catalog.template(card_id).await {
        Ok(template) => template,
        Err(err) => {
            tracing::warn!(card = %card_id, "card template lookup failed: {err}");
            CardTemplate::default()
        }
    }
}

/// Full draw pipeline behind `POST /card/draw`, generic over the store
/// and collaborator seams so tests can drive it without Postgres or
/// live peer services.
///
/// Order matters: the pool is resolved and the balance debited before
/// the first roll; once draws start committing, a metadata-lookup
/// failure downgrades to a placeholder instead of voiding a paid draw.
pub async fn perform_draw<S, A, C>(
    store: &S,
    asset: &A,
    catalog: &C,
    user: &AuthenticatedUser,
    pool_type: PoolType,
    count: DrawCount,
    probability: DrawProbability,
    rng: &mut dyn RandomSource,
) -> Result<DrawRequestOutcome, GachaError>
where
    S: PityStore + DrawHistoryStore + CardPoolStore,
    A: AssetService + ?Sized,
    C: CardCatalog + ?Sized,
{
    let pool = store.load_pool(pool_type).await?;
    pool.validate()?;

    let owned: HashSet<Uuid> = store.drawn_card_ids(user.user_id).await?.into_iter().collect();

    let cost = match count {
        DrawCount::Single => DRAW_COST_SINGLE,
        DrawCount::Ten => DRAW_COST_TEN,
    };
    let balance = asset.query_stone_amount(&user.token).await?;
    if balance < cost {
        return Err(GachaError::InsufficientBalance {
            required: cost,
            available: balance,
        });
    }
    asset.deduct_stones(&user.token, cost).await?;

    let session = DrawSession::new(store, probability)?;
    let batch = session.draw(user.user_id, &pool, count, rng).await?;

    let is_new_card = batch.outcomes.iter().any(|o| !owned.contains(&o.card_id));

    let mut cards = Vec::with_capacity(batch.outcomes.len());
    for outcome in &batch.outcomes {
        let template = template_or_placeholder(catalog, outcome.card_id).await;
        cards.push(DrawResultCard {
            card_id: outcome.card_id,
            rarity: outcome.rarity,
            is_up_card: outcome.is_up_card,
            template,
        });
    }

    Ok(DrawRequestOutcome {
        cards,
        is_new_card,
        pity: batch.pity,
    })
}
