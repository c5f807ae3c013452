use anyhow::Result;
use uuid::Uuid;

use satintin_database::{connect, PgGachaStore};
use satintin_engine::{CardPoolDefinition, PoolType};
use satintin_service_api::setup_tracing;

/// Creates the schema and seeds one standard and one featured pool.
///
/// The card ids written here are placeholders; an actual deployment
/// replaces them with ids from the card template catalog before the
/// pools go live.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let pool = connect(false, true).await;
    let store = PgGachaStore::new(pool.clone());

    let up = Uuid::new_v4();
    let shared_legendaries: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let rare_cards: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
    let common_cards: Vec<Uuid> = (0..14).map(|_| Uuid::new_v4()).collect();

    store
        .save_pool(&CardPoolDefinition {
            pool_type: PoolType::Standard,
            up_card: None,
            legendary_cards: shared_legendaries.clone(),
            rare_cards: rare_cards.clone(),
            common_cards: common_cards.clone(),
        })
        .await?;

    let mut featured_legendaries = vec![up];
    featured_legendaries.extend(shared_legendaries);
    store
        .save_pool(&CardPoolDefinition {
            pool_type: PoolType::Featured,
            up_card: Some(up),
            legendary_cards: featured_legendaries,
            rare_cards,
            common_cards,
        })
        .await?;

    tracing::info!("schema created and both pools seeded");
    Ok(())
}
