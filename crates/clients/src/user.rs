use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use satintin_common::ModuleClient;
use satintin_engine::GachaError;

use crate::rpc::RpcEndpoint;

/// Token validation against the user service. A token that does not
/// resolve to a user id is rejected at the middleware, before any
/// handler runs.
#[async_trait]
pub trait UserAuthService: Send + Sync {
    async fn resolve_token(&self, user_token: &str) -> Result<Option<Uuid>, GachaError>;
}

#[derive(Clone)]
pub struct UserAuthClient {
    endpoint: RpcEndpoint,
}

#[derive(Serialize)]
struct ValidateUserTokenMessage<'a> {
    #[serde(rename = "userToken")]
    user_token: &'a str,
}

#[async_trait]
impl ModuleClient for UserAuthClient {
    const NAME: &'static str = "user";
    type Client = RpcEndpoint;

    async fn setup_connection() -> Self {
        let base_url = std::env::var("USER_SERVICE_URL")
            .expect("USER_SERVICE_URL is not set");
        tracing::info!("user service at {base_url}");
        Self {
            endpoint: RpcEndpoint::new(base_url),
        }
    }

    fn get_client(&self) -> &RpcEndpoint {
        &self.endpoint
    }
}

impl UserAuthClient {
    pub fn with_endpoint(endpoint: RpcEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl UserAuthService for UserAuthClient {
    async fn resolve_token(&self, user_token: &str) -> Result<Option<Uuid>, GachaError> {
        let user_id: Option<String> = self
            .endpoint
            .call(
                "ValidateUserTokenMessage",
                &ValidateUserTokenMessage { user_token },
            )
            .await
            .map_err(GachaError::Persistence)?;

        match user_id {
            Some(id) => match id.parse::<Uuid>() {
                Ok(uuid) => Ok(Some(uuid)),
                Err(_) => {
                    tracing::warn!("user service returned a non-uuid id: {id}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}
