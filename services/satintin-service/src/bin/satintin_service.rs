use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use satintin_common::EnvVars;
use satintin_service_api::{asset_routes, card_routes, setup_tracing, ApiServerEnv, GlobalState};

/// The client gives up on a draw after 50 seconds; by then the batch is
/// either fully committed or not started, never half-rolled.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(50);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let env = ApiServerEnv::load();
    let state = GlobalState::new().await;

    let app = Router::new()
        .merge(card_routes(state.clone()))
        .merge(asset_routes(state.clone()))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!(":::{}", env.port)).await?;
    tracing::info!("LISTENING ON {}", env.port);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
