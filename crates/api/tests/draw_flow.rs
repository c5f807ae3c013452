use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use satintin_clients::{AssetService, CardCatalog, CardTemplate};
use satintin_engine::{
    CardPoolDefinition, DrawCount, DrawHistoryStore, DrawProbability, GachaError,
    MemoryGachaStore, PoolType, Rarity, SeededRandom,
};
use satintin_service_api::{perform_draw, AuthenticatedUser};

/// Asset stub with a mutable balance; deductions only succeed while
/// funds last, mirroring the real service's behavior.
struct StubAsset {
    balance: AtomicI64,
}

impl StubAsset {
    fn with_stones(amount: i64) -> Self {
        Self {
            balance: AtomicI64::new(amount),
        }
    }
}

#[async_trait]
impl AssetService for StubAsset {
    async fn query_stone_amount(&self, _user_token: &str) -> Result<i64, GachaError> {
        Ok(self.balance.load(Ordering::SeqCst))
    }

    async fn deduct_stones(&self, _user_token: &str, amount: i64) -> Result<(), GachaError> {
        self.balance.fetch_sub(amount, Ordering::SeqCst);
        Ok(())
    }
}

/// Catalog that is down; every lookup errors.
struct DeadCatalog;

#[async_trait]
impl CardCatalog for DeadCatalog {
    async fn template(&self, _card_id: Uuid) -> Result<CardTemplate, GachaError> {
        Err(GachaError::Persistence(anyhow::anyhow!(
            "card service unreachable"
        )))
    }
}

struct StubCatalog;

#[async_trait]
impl CardCatalog for StubCatalog {
    async fn template(&self, card_id: Uuid) -> Result<CardTemplate, GachaError> {
        Ok(CardTemplate {
            card_name: format!("card-{}", &card_id.to_string()[..8]),
            description: String::new(),
            card_type: "character".to_string(),
        })
    }
}

fn seeded_store() -> MemoryGachaStore {
    let store = MemoryGachaStore::new();
    let up = Uuid::new_v4();
    let mut legendary_cards = vec![up, Uuid::new_v4()];
    legendary_cards.push(Uuid::new_v4());
    store.insert_pool(CardPoolDefinition {
        pool_type: PoolType::Featured,
        up_card: Some(up),
        legendary_cards,
        rare_cards: (0..5).map(|_| Uuid::new_v4()).collect(),
        common_cards: (0..10).map(|_| Uuid::new_v4()).collect(),
    });
    store
}

fn caller() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        token: "token-abc".to_string(),
    }
}

#[tokio::test]
async fn a_ten_pull_debits_once_and_commits_ten_records() {
    let store = seeded_store();
    let asset = StubAsset::with_stones(2_000);
    let user = caller();
    let mut rng = SeededRandom::new(11);

    let outcome = perform_draw(
        &store,
        &asset,
        &StubCatalog,
        &user,
        PoolType::Featured,
        DrawCount::Ten,
        DrawProbability::default(),
        &mut rng,
    )
    .await
    .unwrap();

    assert_eq!(outcome.cards.len(), 10);
    assert_eq!(outcome.pity.total_pulls, 10);
    assert_eq!(store.record_count(), 10);
    assert_eq!(asset.balance.load(Ordering::SeqCst), 400);
    // a fresh account cannot draw ten duplicates of nothing
    assert!(outcome.is_new_card);
    assert!(outcome.cards.iter().all(|c| !c.template.card_name.is_empty()));
}

#[tokio::test]
async fn insufficient_balance_aborts_before_any_roll() {
    let store = seeded_store();
    let asset = StubAsset::with_stones(150);
    let user = caller();
    let mut rng = SeededRandom::new(1);

    let err = perform_draw(
        &store,
        &asset,
        &StubCatalog,
        &user,
        PoolType::Featured,
        DrawCount::Single,
        DrawProbability::default(),
        &mut rng,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, GachaError::InsufficientBalance { required: 160, available: 150 }));
    assert_eq!(store.record_count(), 0);
    assert_eq!(asset.balance.load(Ordering::SeqCst), 150);
}

#[tokio::test]
async fn unknown_pool_fails_without_charging() {
    let store = seeded_store();
    let asset = StubAsset::with_stones(5_000);
    let user = caller();
    let mut rng = SeededRandom::new(1);

    let err = perform_draw(
        &store,
        &asset,
        &StubCatalog,
        &user,
        PoolType::Standard, // never seeded into the store
        DrawCount::Single,
        DrawProbability::default(),
        &mut rng,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, GachaError::InvalidPool(_)));
    assert_eq!(asset.balance.load(Ordering::SeqCst), 5_000);
}

#[tokio::test]
async fn is_new_card_reflects_prior_ownership() {
    // four-card pool so a couple hundred pulls provably exhaust it
    let store = MemoryGachaStore::new();
    let up = Uuid::new_v4();
    store.insert_pool(CardPoolDefinition {
        pool_type: PoolType::Featured,
        up_card: Some(up),
        legendary_cards: vec![up, Uuid::new_v4()],
        rare_cards: vec![Uuid::new_v4()],
        common_cards: vec![Uuid::new_v4()],
    });
    let asset = StubAsset::with_stones(1_000_000);
    let user = caller();
    let mut rng = SeededRandom::new(23);

    // draw until every card in the pool has been seen at least once
    for _ in 0..200 {
        perform_draw(
            &store,
            &asset,
            &StubCatalog,
            &user,
            PoolType::Featured,
            DrawCount::Ten,
            DrawProbability::default(),
            &mut rng,
        )
        .await
        .unwrap();
    }
    let owned_before = store.drawn_card_ids(user.user_id).await.unwrap().len();
    assert_eq!(owned_before, 4, "2000 draws should have surfaced the whole pool");

    let outcome = perform_draw(
        &store,
        &asset,
        &StubCatalog,
        &user,
        PoolType::Featured,
        DrawCount::Ten,
        DrawProbability::default(),
        &mut rng,
    )
    .await
    .unwrap();
    assert!(!outcome.is_new_card, "no card can be new once the pool is exhausted");

    let rare_or_better = outcome
        .cards
        .iter()
        .filter(|c| c.rarity >= Rarity::Rare)
        .count();
    assert!(rare_or_better >= 1);
}

#[tokio::test]
async fn a_dead_catalog_degrades_to_placeholders_without_voiding_the_draw() {
    let store = seeded_store();
    let asset = StubAsset::with_stones(2_000);
    let user = caller();
    let mut rng = SeededRandom::new(7);

    let outcome = perform_draw(
        &store,
        &asset,
        &DeadCatalog,
        &user,
        PoolType::Featured,
        DrawCount::Ten,
        DrawProbability::default(),
        &mut rng,
    )
    .await
    .unwrap();

    // the draws committed and the stones are spent; only the names are missing
    assert_eq!(outcome.cards.len(), 10);
    assert_eq!(store.record_count(), 10);
    assert_eq!(asset.balance.load(Ordering::SeqCst), 400);
    assert!(outcome.cards.iter().all(|c| c.template.card_name.is_empty()));
}
