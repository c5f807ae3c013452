use axum::{
    extract::{Extension, State},
    middleware,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use satintin_engine::{PityStore, PoolType};

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess, GenericResponse};
use crate::GlobalState;

pub fn asset_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/asset/draw-count", post(draw_count))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[derive(Debug, Deserialize)]
pub struct DrawCountRequest {
    #[serde(rename = "poolType")]
    pub pool_type: String,
}

/// The client's wish page shows lifetime pulls per pool; that is the
/// `total_pulls` counter, not the history row count.
async fn draw_count(
    State(state): State<GlobalState>,
    Extension(user): Extension<crate::AuthenticatedUser>,
    Json(payload): Json<DrawCountRequest>,
) -> Result<AppSuccess, AppError> {
    let pool_type = PoolType::parse(&payload.pool_type).map_err(AppError::from_gacha)?;

    let pity = state
        .store
        .load_pity(user.user_id, pool_type)
        .await
        .map_err(AppError::from_gacha)?;

    Ok(GenericResponse::ok(json!(pity.total_pulls)))
}
