use async_trait::async_trait;
use serde::Serialize;

use satintin_common::ModuleClient;
use satintin_engine::GachaError;

use crate::rpc::RpcEndpoint;

/// Stone cost of a single wish.
pub const DRAW_COST_SINGLE: i64 = 160;
/// Stone cost of a ten-pull.
pub const DRAW_COST_TEN: i64 = 1600;

/// Currency collaborator. Checked and debited once, before any roll;
/// the engine never retries it (a double debit would be worse than a
/// failed draw).
#[async_trait]
pub trait AssetService: Send + Sync {
    async fn query_stone_amount(&self, user_token: &str) -> Result<i64, GachaError>;
    async fn deduct_stones(&self, user_token: &str, amount: i64) -> Result<(), GachaError>;
}

#[derive(Clone)]
pub struct AssetClient {
    endpoint: RpcEndpoint,
}

#[derive(Serialize)]
struct QueryAssetStatusMessage<'a> {
    #[serde(rename = "userID")]
    user_id: &'a str,
}

#[derive(Serialize)]
struct DeductAssetMessage<'a> {
    #[serde(rename = "userToken")]
    user_token: &'a str,
    #[serde(rename = "deductAmount")]
    deduct_amount: i64,
}

#[async_trait]
impl ModuleClient for AssetClient {
    const NAME: &'static str = "asset";
    type Client = RpcEndpoint;

    async fn setup_connection() -> Self {
        let base_url = std::env::var("ASSET_SERVICE_URL")
            .expect("ASSET_SERVICE_URL is not set");
        tracing::info!("asset service at {base_url}");
        Self {
            endpoint: RpcEndpoint::new(base_url),
        }
    }

    fn get_client(&self) -> &RpcEndpoint {
        &self.endpoint
    }
}

impl AssetClient {
    pub fn with_endpoint(endpoint: RpcEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl AssetService for AssetClient {
    async fn query_stone_amount(&self, user_token: &str) -> Result<i64, GachaError> {
        // the asset service replies with the bare stone count
        let amount: i64 = self
            .endpoint
            .call("QueryAssetStatusMessage", &QueryAssetStatusMessage { user_id: user_token })
            .await
            .map_err(GachaError::Persistence)?;
        Ok(amount)
    }

    async fn deduct_stones(&self, user_token: &str, amount: i64) -> Result<(), GachaError> {
        let _ack: serde_json::Value = self
            .endpoint
            .call(
                "DeductAssetMessage",
                &DeductAssetMessage {
                    user_token,
                    deduct_amount: amount,
                },
            )
            .await
            .map_err(GachaError::Persistence)?;
        Ok(())
    }
}

impl std::fmt::Debug for AssetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetClient").finish_non_exhaustive()
    }
}
