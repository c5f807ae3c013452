use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::GachaError;
use crate::pity::PityState;
use crate::pool::{CardPoolDefinition, DrawRecord, PoolType};
use crate::store::{CardPoolStore, DrawHistoryStore, HistoryPage, PityStore};

/// In-process store with the same CAS semantics as the Postgres
/// implementation. Backs the engine test-suite and the sandbox binary;
/// not meant for production traffic.
#[derive(Debug, Default)]
pub struct MemoryGachaStore {
    pity: Mutex<HashMap<(Uuid, PoolType), PityState>>,
    records: Mutex<Vec<DrawRecord>>,
    pools: Mutex<HashMap<PoolType, CardPoolDefinition>>,
}

impl MemoryGachaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pool(&self, pool: CardPoolDefinition) {
        self.pools
            .lock()
            .expect("pool map poisoned")
            .insert(pool.pool_type, pool);
    }

    /// Seed a pre-existing pity state, e.g. a user entering a batch
    /// deep into soft pity.
    pub fn insert_pity(&self, pity: PityState) {
        self.pity
            .lock()
            .expect("pity map poisoned")
            .insert((pity.user_id, pity.pool_type), pity);
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().expect("ledger poisoned").len()
    }
}

#[async_trait]
impl PityStore for MemoryGachaStore {
    async fn load_pity(&self, user_id: Uuid, pool: PoolType) -> Result<PityState, GachaError> {
        let map = self.pity.lock().expect("pity map poisoned");
        Ok(map
            .get(&(user_id, pool))
            .cloned()
            .unwrap_or_else(|| PityState::zeroed(user_id, pool)))
    }

    async fn commit_draw(
        &self,
        pity: &mut PityState,
        record: &DrawRecord,
    ) -> Result<(), GachaError> {
        let mut map = self.pity.lock().expect("pity map poisoned");
        let key = (pity.user_id, pity.pool_type);

        let stored_version = map.get(&key).map(|p| p.version).unwrap_or(0);
        if stored_version != pity.version {
            return Err(GachaError::ConcurrentDrawConflict);
        }

        pity.version += 1;
        pity.updated_at = record.created_at;
        map.insert(key, pity.clone());

        self.records
            .lock()
            .expect("ledger poisoned")
            .push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl DrawHistoryStore for MemoryGachaStore {
    async fn history(
        &self,
        user_id: Uuid,
        pool: Option<PoolType>,
        page: HistoryPage,
    ) -> Result<Vec<DrawRecord>, GachaError> {
        let records = self.records.lock().expect("ledger poisoned");
        let mut matched = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| pool.map(|p| r.pool_type == p).unwrap_or(true))
            .cloned()
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| {
            (b.created_at, b.sequence).cmp(&(a.created_at, a.sequence))
        });

        Ok(matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect())
    }

    async fn drawn_card_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, GachaError> {
        let records = self.records.lock().expect("ledger poisoned");
        let mut ids = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.card_id)
            .collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

#[async_trait]
impl CardPoolStore for MemoryGachaStore {
    async fn load_pool(&self, pool: PoolType) -> Result<CardPoolDefinition, GachaError> {
        self.pools
            .lock()
            .expect("pool map poisoned")
            .get(&pool)
            .cloned()
            .ok_or_else(|| GachaError::InvalidPool(pool.to_string()))
    }
}
