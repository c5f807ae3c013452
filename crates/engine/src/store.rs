use async_trait::async_trait;
use uuid::Uuid;

use crate::error::GachaError;
use crate::pity::PityState;
use crate::pool::{CardPoolDefinition, DrawRecord, PoolType};

/// Write path of the engine. `commit_draw` is the recovery unit: the
/// post-draw pity counters and the draw record persist together or not
/// at all, so a crash mid-batch leaves a consistent, resumable prefix.
#[async_trait]
pub trait PityStore: Send + Sync {
    /// Returns a zeroed state for a first-time (user, pool) pair.
    async fn load_pity(&self, user_id: Uuid, pool: PoolType) -> Result<PityState, GachaError>;

    /// Compare-and-swap on `pity.version`: fails with
    /// `ConcurrentDrawConflict` if the stored version moved since
    /// `load_pity`. On success bumps `pity.version` in place.
    async fn commit_draw(
        &self,
        pity: &mut PityState,
        record: &DrawRecord,
    ) -> Result<(), GachaError>;
}

/// Read path over the append-only draw ledger.
#[async_trait]
pub trait DrawHistoryStore: Send + Sync {
    /// Records for one user, newest first, restartable via LIMIT/OFFSET
    /// pagination (the client's history modal pages a handful at a time).
    async fn history(
        &self,
        user_id: Uuid,
        pool: Option<PoolType>,
        page: HistoryPage,
    ) -> Result<Vec<DrawRecord>, GachaError>;

    /// Distinct card ids the user has ever drawn. Snapshotted before a
    /// batch to decide `isNewCard` afterwards.
    async fn drawn_card_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, GachaError>;
}

#[async_trait]
pub trait CardPoolStore: Send + Sync {
    async fn load_pool(&self, pool: PoolType) -> Result<CardPoolDefinition, GachaError>;
}

#[derive(Clone, Copy, Debug)]
pub struct HistoryPage {
    pub page: i64,
    pub page_size: i64,
}

pub const MAX_PAGE_SIZE: i64 = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

impl Default for HistoryPage {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HistoryPage {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(0).max(0),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        self.page * self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_are_clamped() {
        let page = HistoryPage::new(Some(-3), Some(500));
        assert_eq!(page.page, 0);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);

        let page = HistoryPage::new(Some(2), None);
        assert_eq!(page.offset(), 2 * DEFAULT_PAGE_SIZE);
    }
}
