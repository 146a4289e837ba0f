use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::room::RoomId;

/// One async lock per room. Work on different rooms never contends.
#[derive(Clone, Default)]
pub struct RoomLocks {
    locks: Arc<Mutex<HashMap<RoomId, Arc<AsyncMutex<()>>>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        RoomLocks::default()
    }

    pub async fn lock(&self, room_id: RoomId) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(self.lock_table().entry(room_id).or_default());
        lock.lock_owned().await
    }

    /// Drops the lock entry of a deleted room. Holders of a guard are not affected.
    pub fn forget(&self, room_id: RoomId) {
        self.lock_table().remove(&room_id);
    }

    pub fn len(&self) -> usize {
        self.lock_table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_table().is_empty()
    }

    fn lock_table(&self) -> MutexGuard<'_, HashMap<RoomId, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
