use axum::{
    extract::{Extension, State},
    middleware,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use satintin_common::format_draw_time;
use satintin_engine::{DrawCount, HistoryPage, PoolType, ThreadRandom};

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess, GenericResponse};
use crate::wish::perform_draw;
use crate::GlobalState;

pub fn card_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/card/draw", post(draw_card))
        .route("/card/draw-history", post(draw_history))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[derive(Debug, Deserialize)]
pub struct DrawCardRequest {
    #[serde(rename = "drawCount")]
    pub draw_count: i64,
    #[serde(rename = "poolType")]
    pub pool_type: String,
}

#[derive(Debug, Serialize)]
struct CardListEntry {
    #[serde(rename = "cardID")]
    card_id: String,
    #[serde(rename = "cardName")]
    card_name: String,
    #[serde(rename = "rarityLevel")]
    rarity_level: String,
    #[serde(rename = "cardType")]
    card_type: String,
    #[serde(rename = "isUpCard")]
    is_up_card: bool,
}

async fn draw_card(
    State(state): State<GlobalState>,
    Extension(user): Extension<crate::AuthenticatedUser>,
    Json(payload): Json<DrawCardRequest>,
) -> Result<AppSuccess, AppError> {
    let pool_type = PoolType::parse(&payload.pool_type).map_err(AppError::from_gacha)?;
    let count = DrawCount::parse(payload.draw_count).map_err(AppError::from_gacha)?;

    // one batch at a time per (user, pool); others queue behind this guard
    let _guard = state.draw_locks.acquire(user.user_id, pool_type).await;

    let mut rng = ThreadRandom;
    let outcome = perform_draw(
        &state.store,
        &state.asset,
        &state.catalog,
        &user,
        pool_type,
        count,
        state.probability.clone(),
        &mut rng,
    )
    .await
    .map_err(AppError::from_gacha)?;

    let card_list: Vec<CardListEntry> = outcome
        .cards
        .iter()
        .map(|card| CardListEntry {
            card_id: card.card_id.to_string(),
            card_name: card.template.card_name.clone(),
            rarity_level: card.rarity.display_name().to_string(),
            card_type: card.template.card_type.clone(),
            is_up_card: card.is_up_card,
        })
        .collect();

    Ok(GenericResponse::ok(json!({
        "cardList": card_list,
        "isNewCard": outcome.is_new_card,
        "pity": {
            "totalPulls": outcome.pity.total_pulls,
            "pullsSinceRare": outcome.pity.pulls_since_rare,
            "pullsSinceLegendary": outcome.pity.pulls_since_legendary,
        },
    })))
}

#[derive(Debug, Deserialize, Default)]
pub struct DrawHistoryRequest {
    #[serde(rename = "poolType")]
    pub pool_type: Option<String>,
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

async fn draw_history(
    State(state): State<GlobalState>,
    Extension(user): Extension<crate::AuthenticatedUser>,
    Json(payload): Json<DrawHistoryRequest>,
) -> Result<AppSuccess, AppError> {
    use satintin_engine::DrawHistoryStore;

    let pool_type = payload
        .pool_type
        .as_deref()
        .map(PoolType::parse)
        .transpose()
        .map_err(AppError::from_gacha)?;
    let page = HistoryPage::new(payload.page, payload.page_size);

    let records = state
        .store
        .history(user.user_id, pool_type, page)
        .await
        .map_err(AppError::from_gacha)?;

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let template =
            crate::wish::template_or_placeholder(&state.catalog, record.card_id).await;
        entries.push(json!({
            "drawId": record.id.to_string(),
            "cardId": record.card_id.to_string(),
            "cardName": template.card_name,
            "cardDescription": template.description,
            "rarity": record.rarity.display_name(),
            "cardType": template.card_type,
            "drawTime": format_draw_time(record.created_at),
            "poolType": record.pool_type.as_str(),
        }));
    }

    Ok(GenericResponse::ok(json!(entries)))
}
