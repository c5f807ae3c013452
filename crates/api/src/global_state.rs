use satintin_clients::{AssetClient, CardCatalogClient, UserAuthClient};
use satintin_common::ModuleClient;
use satintin_database::{PgGachaStore, PostgresClient};
use satintin_engine::DrawProbability;

use crate::locks::DrawLocks;

#[derive(Clone)]
pub struct GlobalState {
    pub store: PgGachaStore,
    pub asset: AssetClient,
    pub users: UserAuthClient,
    pub catalog: CardCatalogClient,
    pub probability: DrawProbability,
    pub draw_locks: DrawLocks,
}

impl GlobalState {
    pub async fn new() -> Self {
        let db = PostgresClient::setup_connection().await;
        let asset = AssetClient::setup_connection().await;
        let users = UserAuthClient::setup_connection().await;
        let catalog = CardCatalogClient::setup_connection().await;

        Self {
            store: PgGachaStore::new(db.get_client().clone()),
            asset,
            users,
            catalog,
            probability: DrawProbability::default(),
            draw_locks: DrawLocks::new(),
        }
    }
}
