use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::room::RoomId;

struct ScheduledTimeout {
    generation: u64,
    fire_at: Instant,
    handle: JoinHandle<()>,
}

/// Holds at most one pending round timeout per room.
///
/// Every `schedule` gets a generation number. A timer that wakes up first removes its own
/// entry (only if the entry still carries its generation) and only then runs its task, so
/// a later `cancel` or `schedule` can never abort a callback that is already executing, and
/// a superseded timer that raced past its abort never runs.
#[derive(Clone, Default)]
pub struct RoundTimer {
    timeouts: Arc<Mutex<HashMap<RoomId, ScheduledTimeout>>>,
    next_generation: Arc<AtomicU64>,
}

impl RoundTimer {
    pub fn new() -> Self {
        RoundTimer::default()
    }

    /// Replaces any timer registered for `room_id` with one that runs `task` at `fire_at`.
    pub fn schedule<F>(&self, room_id: RoomId, fire_at: Instant, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut timeouts = self.lock_timeouts();

        if let Some(previous) = timeouts.remove(&room_id) {
            previous.handle.abort();
        }

        let timer = self.clone();
        let handle = tokio::spawn(async move {
            time::sleep_until(fire_at).await;
            if timer.clear(room_id, generation) {
                task.await;
            }
        });

        timeouts.insert(
            room_id,
            ScheduledTimeout {
                generation,
                fire_at,
                handle,
            },
        );
    }

    /// Stops the pending timer of `room_id`, if any. A callback already running is not interrupted.
    pub fn cancel(&self, room_id: RoomId) {
        if let Some(timeout) = self.lock_timeouts().remove(&room_id) {
            timeout.handle.abort();
        }
    }

    pub fn is_scheduled(&self, room_id: RoomId) -> bool {
        self.lock_timeouts().contains_key(&room_id)
    }

    pub fn fire_at(&self, room_id: RoomId) -> Option<Instant> {
        self.lock_timeouts()
            .get(&room_id)
            .map(|timeout| timeout.fire_at)
    }

    /// Drops the entry of a timer that has fired, without aborting it. Returns false when the
    /// entry belongs to another generation, meaning this timer was cancelled or replaced.
    fn clear(&self, room_id: RoomId, generation: u64) -> bool {
        let mut timeouts = self.lock_timeouts();
        match timeouts.get(&room_id) {
            Some(timeout) if timeout.generation == generation => {
                timeouts.remove(&room_id);
                true
            }
            _ => false,
        }
    }

    fn lock_timeouts(&self) -> MutexGuard<'_, HashMap<RoomId, ScheduledTimeout>> {
        self.timeouts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
