use anyhow::anyhow;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use satintin_clients::UserAuthService;

use crate::global_state::GlobalState;
use crate::response::AppError;
use crate::utils::extract_bearer_token;

/// Resolved identity of the caller, inserted as a request extension.
/// The raw token rides along because the asset service is addressed by
/// token, not by user id.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Validates the bearer token against the user service. Unlike the
/// client's old per-page checks this runs on every protected route;
/// an unresolvable token never reaches a handler.
pub async fn authenticate(
    State(state): State<GlobalState>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let token = extract_bearer_token(&req)?;

    let user_id = state
        .users
        .resolve_token(&token)
        .await
        .map_err(AppError::from_gacha)?
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, anyhow!("invalid user token")))?;

    req.extensions_mut()
        .insert(AuthenticatedUser { user_id, token });
    Ok(next.run(req).await)
}
