use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use satintin_common::ModuleClient;
use satintin_engine::GachaError;

use crate::rpc::RpcEndpoint;

/// Static card metadata, looked up when a draw result is shaped for
/// the client. Not part of the pity engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardTemplate {
    #[serde(rename = "cardName")]
    pub card_name: String,
    #[serde(rename = "description", default)]
    pub description: String,
    #[serde(rename = "cardType", default)]
    pub card_type: String,
}

#[async_trait]
pub trait CardCatalog: Send + Sync {
    async fn template(&self, card_id: Uuid) -> Result<CardTemplate, GachaError>;
}

#[derive(Clone)]
pub struct CardCatalogClient {
    endpoint: RpcEndpoint,
}

#[derive(Serialize)]
struct GetCardTemplateByIDMessage<'a> {
    #[serde(rename = "cardID")]
    card_id: &'a str,
}

#[async_trait]
impl ModuleClient for CardCatalogClient {
    const NAME: &'static str = "card-catalog";
    type Client = RpcEndpoint;

    async fn setup_connection() -> Self {
        let base_url = std::env::var("CARD_SERVICE_URL")
            .expect("CARD_SERVICE_URL is not set");
        tracing::info!("card template catalog at {base_url}");
        Self {
            endpoint: RpcEndpoint::new(base_url),
        }
    }

    fn get_client(&self) -> &RpcEndpoint {
        &self.endpoint
    }
}

impl CardCatalogClient {
    pub fn with_endpoint(endpoint: RpcEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl CardCatalog for CardCatalogClient {
    async fn template(&self, card_id: Uuid) -> Result<CardTemplate, GachaError> {
        let id = card_id.to_string();
        self.endpoint
            .call(
                "GetCardTemplateByIDMessage",
                &GetCardTemplateByIDMessage { card_id: &id },
            )
            .await
            .map_err(GachaError::Persistence)
    }
}
