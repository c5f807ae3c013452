use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use satintin_engine::PoolType;

/// Serializes draw batches per (user, pool): the second request for the
/// same key waits for the first to finish, different keys proceed in
/// parallel. The version CAS in the store remains the backstop for
/// writers outside this process.
///
/// Entries are evicted once nothing holds or awaits them, so the map
/// stays bounded by the number of in-flight draws rather than the
/// number of users ever seen.
#[derive(Clone, Default)]
pub struct DrawLocks {
    inner: Arc<Mutex<HashMap<(Uuid, PoolType), Arc<Mutex<()>>>>>,
}

impl DrawLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: Uuid, pool: PoolType) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            // strong_count == 1 means the map holds the only reference:
            // no guard out, no waiter queued
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry((user_id, pool))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
