use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::game::session::GameSession;
use crate::room::{Room, RoomId};

/// Keyed storage of game sessions. Readers always get copies; writers hand back a whole
/// session with `save`.
pub trait SessionStore: Send + Sync {
    /// Replaces whatever session the room had with a fresh idle one.
    fn create(
        &self,
        room_id: RoomId,
        room_code: &str,
        total_rounds: usize,
        seconds_per_round: u64,
    ) -> GameSession;

    fn get(&self, room_id: RoomId) -> Option<GameSession>;

    fn get_or_create(&self, room: &Room) -> GameSession;

    fn save(&self, session: GameSession);

    fn remove(&self, room_id: RoomId) -> Option<GameSession>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<RoomId, GameSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<RoomId, GameSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn create(
        &self,
        room_id: RoomId,
        room_code: &str,
        total_rounds: usize,
        seconds_per_round: u64,
    ) -> GameSession {
        let session = GameSession::new(room_id, room_code, total_rounds, seconds_per_round);
        self.lock_sessions().insert(room_id, session.clone());
        session
    }

    fn get(&self, room_id: RoomId) -> Option<GameSession> {
        self.lock_sessions().get(&room_id).cloned()
    }

    fn get_or_create(&self, room: &Room) -> GameSession {
        self.lock_sessions()
            .entry(room.id)
            .or_insert_with(|| GameSession::new(room.id, &room.code, 0, 0))
            .clone()
    }

    fn save(&self, session: GameSession) {
        self.lock_sessions().insert(session.room_id(), session);
    }

    fn remove(&self, room_id: RoomId) -> Option<GameSession> {
        self.lock_sessions().remove(&room_id)
    }
}
