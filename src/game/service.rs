use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::OwnedMutexGuard;
use tokio::time::Instant;

use crate::broadcast::{publish_json, topic, BroadcastSink};
use crate::config::GameSettings;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::game::message::{GameEventMessage, GameState, GuessResult, RoomSnapshot};
use crate::game::room_lock::RoomLocks;
use crate::game::session::GameSession;
use crate::game::session_store::SessionStore;
use crate::metrics::{ACTIVE_GAMES, CORRECT_GUESSES, ROUND_TIMEOUTS};
use crate::room::actor_client::RoomDirectory;
use crate::room::{PlayerId, Room, RoomId, RoomStatus};
use crate::timer::RoundTimer;
use crate::word::WordProvider;

/// Drives the rounds of every room. Each mutating operation holds the room's lock for its
/// whole read, decide and write sequence, so triggers coming from HTTP, WebSocket and timers
/// are applied one at a time per room.
#[derive(Clone)]
pub struct GameService {
    settings: GameSettings,
    rooms: RoomDirectory,
    sessions: Arc<dyn SessionStore>,
    timer: RoundTimer,
    broadcaster: Arc<dyn BroadcastSink>,
    words: Arc<dyn WordProvider>,
    locks: RoomLocks,
}

impl GameService {
    pub fn new(
        settings: GameSettings,
        rooms: RoomDirectory,
        sessions: Arc<dyn SessionStore>,
        timer: RoundTimer,
        broadcaster: Arc<dyn BroadcastSink>,
        words: Arc<dyn WordProvider>,
    ) -> Self {
        GameService {
            settings,
            rooms,
            sessions,
            timer,
            broadcaster,
            words,
            locks: RoomLocks::new(),
        }
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub async fn start_game(&self, room_code: &str) -> Result<GameState, Error> {
        let (_guard, room) = self.lock_room(room_code).await?;

        let players = self.rooms.players_ordered(&room.code).await?;
        if players.len() < self.settings.minimum_players {
            return Err(Error::Domain(DomainError::NotEnoughPlayers(
                players.len(),
                self.settings.minimum_players,
            )));
        }
        if room.status == RoomStatus::Playing {
            return Err(Error::Domain(DomainError::GameAlreadyStarted(room.code)));
        }

        self.timer.cancel(room.id);

        let turn_order: Vec<PlayerId> = players.iter().map(|player| player.id).collect();
        let first_drawer_id = turn_order.first().copied().ok_or_else(|| {
            Error::log_and_create_internal(&format!(
                "A game can't start without players. RoomCode: '{}'.",
                room.code
            ))
        })?;

        let mut session = self.sessions.create(
            room.id,
            &room.code,
            turn_order.len(),
            self.settings.round_duration_seconds,
        );
        session.start(self.words.next_word(), first_drawer_id, turn_order)?;
        self.sessions.save(session.clone());

        let room = self.rooms.set_status(room.id, RoomStatus::Playing).await?;
        ACTIVE_GAMES.inc();
        self.schedule_round_timeout(&session);

        self.publish_snapshot(&room, &session).await?;
        publish_json(
            self.broadcaster.as_ref(),
            &topic::game(&room.code),
            &GameEventMessage::round_started(&session),
        );

        log::info!(
            "Game started. RoomCode: '{}', TotalRounds: '{}', DrawerId: '{}'.",
            room.code,
            session.total_rounds(),
            first_drawer_id
        );
        Ok(GameState::from(&session))
    }

    pub async fn guess_word(
        &self,
        room_code: &str,
        player_id: PlayerId,
        text: &str,
    ) -> Result<GuessResult, Error> {
        let (_guard, room) = self.lock_room(room_code).await?;
        let session = self.sessions.get(room.id);

        let guess = text.trim();
        if guess.is_empty() || room.status != RoomStatus::Playing {
            return Ok(GuessResult::incorrect(session));
        }
        let Some(mut session) = session else {
            return Ok(GuessResult::incorrect(None));
        };
        if !session.is_in_progress()
            || session.is_drawer(player_id)
            || session.has_guessed_correctly(player_id)
            || session.word() != Some(guess)
        {
            return Ok(GuessResult::incorrect(Some(session)));
        }

        let player = self.rooms.find_player(player_id).await?;
        if player.room_id != room.id {
            return Err(Error::Domain(DomainError::PlayerNotFound(player_id)));
        }
        self.rooms
            .award_points(player_id, self.settings.score_per_correct_guess)
            .await?;
        session.record_correct_guess(player_id);
        self.sessions.save(session.clone());
        CORRECT_GUESSES.inc();

        log::info!(
            "Correct guess. RoomCode: '{}', PlayerId: '{}', Round: '{}'.",
            room.code,
            player_id,
            session.current_round()
        );
        Ok(GuessResult::correct(session))
    }

    /// Read only, so it does not wait for the room's lock.
    pub async fn can_draw(&self, room_code: &str, player_id: PlayerId) -> Result<bool, Error> {
        let room = match self.rooms.find_by_code(room_code).await {
            Ok(room) => room,
            Err(Error::Domain(DomainError::RoomNotFound(_))) => return Ok(false),
            Err(error) => return Err(error),
        };
        let is_drawer = room.status == RoomStatus::Playing
            && self
                .sessions
                .get(room.id)
                .is_some_and(|session| session.is_drawer(player_id));
        if !is_drawer {
            return Ok(false);
        }
        // the turn order outlives players who left the room
        match self.rooms.find_player(player_id).await {
            Ok(player) => Ok(player.room_id == room.id),
            Err(Error::Domain(DomainError::PlayerNotFound(_))) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Ends the current round of the room. Never fails: stale calls are ignored and
    /// unexpected errors are logged.
    pub async fn execute_round_timeout(&self, room_id: RoomId) {
        self.handle_round_timeout(room_id, None).await
    }

    pub async fn end_game(&self, room_id: RoomId) -> Result<(), Error> {
        let _guard = self.locks.lock(room_id).await;

        if let Some(mut session) = self.sessions.get(room_id) {
            if session.is_in_progress() {
                session.complete()?;
            } else {
                session.reset()?;
            }
            self.sessions.save(session);
        }
        self.release_room(room_id).await
    }

    /// Puts the room back in the lobby and drops its session and timer. Safe to repeat.
    pub async fn cleanup_after_game(&self, room_id: RoomId) -> Result<(), Error> {
        let _guard = self.locks.lock(room_id).await;
        self.release_room(room_id).await
    }

    pub async fn room_snapshot(&self, room: &Room) -> Result<RoomSnapshot, Error> {
        let players = self.rooms.players_ordered(&room.code).await?;
        let session = self.sessions.get_or_create(room);
        Ok(RoomSnapshot::new(room, &players, &session))
    }

    pub async fn publish_room_state(&self, room_code: &str) -> Result<RoomSnapshot, Error> {
        let room = self.rooms.find_by_code(room_code).await?;
        let snapshot = self.room_snapshot(&room).await?;
        publish_json(
            self.broadcaster.as_ref(),
            &topic::state(&room.code),
            &snapshot,
        );
        Ok(snapshot)
    }

    /// Drops everything kept for a deleted room.
    pub fn forget_room(&self, room_id: RoomId) {
        self.timer.cancel(room_id);
        self.sessions.remove(room_id);
        self.locks.forget(room_id);
    }

    async fn lock_room(&self, room_code: &str) -> Result<(OwnedMutexGuard<()>, Room), Error> {
        let room_id = self.rooms.find_by_code(room_code).await?.id;
        let guard = self.locks.lock(room_id).await;
        // the room may have changed or gone while waiting for the lock
        let room = self.rooms.find_by_code(room_code).await?;
        Ok((guard, GameService::ensure_same_room(room_id, room)?))
    }

    /// A code freed by a deleted room can be handed to a new one, whose lock is not held.
    fn ensure_same_room(locked_room_id: RoomId, room: Room) -> Result<Room, Error> {
        if room.id != locked_room_id {
            return Err(Error::Domain(DomainError::RoomNotFound(room.code)));
        }
        Ok(room)
    }

    fn schedule_round_timeout(&self, session: &GameSession) {
        let service = self.clone();
        let room_id = session.room_id();
        let round_started_at = session.round_started_at();
        self.timer.schedule(
            room_id,
            Instant::now() + session.round_duration(),
            async move {
                service
                    .handle_round_timeout(room_id, round_started_at)
                    .await
            },
        );
    }

    async fn handle_round_timeout(&self, room_id: RoomId, round_started_at: Option<SystemTime>) {
        if let Err(error) = self.round_timeout(room_id, round_started_at).await {
            log::error!(
                "The round timeout could not be processed. RoomId: '{room_id}', Error: '{error}'."
            );
        }
    }

    /// `round_started_at` is set when the call comes from a timer, and only the round that
    /// timer was scheduled for may be ended by it.
    async fn round_timeout(
        &self,
        room_id: RoomId,
        round_started_at: Option<SystemTime>,
    ) -> Result<(), Error> {
        let _guard = self.locks.lock(room_id).await;

        let room = match self.rooms.find_by_id(room_id).await {
            Ok(room) => room,
            Err(Error::Domain(DomainError::RoomIdNotFound(_))) => {
                self.timer.cancel(room_id);
                return Ok(());
            }
            Err(error) => return Err(error),
        };
        let mut session = match self.sessions.get(room_id) {
            Some(session) if session.is_in_progress() => session,
            _ => {
                self.timer.cancel(room_id);
                return Ok(());
            }
        };
        if round_started_at.is_some() && round_started_at != session.round_started_at() {
            log::warn!("Ignoring the timeout of a round that already ended. RoomId: '{room_id}'.");
            return Ok(());
        }

        ROUND_TIMEOUTS.inc();
        self.publish_snapshot(&room, &session).await?;

        let progress = session.round_progress();
        publish_json(
            self.broadcaster.as_ref(),
            &topic::game(&room.code),
            &GameEventMessage::round_timeout(&session, progress.finished),
        );

        if progress.finished {
            session.complete()?;
            self.sessions.save(session);
            log::info!("Game finished. RoomCode: '{}'.", room.code);
            return self.release_room(room_id).await;
        }

        let next_drawer_id = session.next_drawer_id().ok_or_else(|| {
            Error::log_and_create_internal(&format!(
                "There is no drawer for the next round. RoomId: '{}', NextIndex: '{}'.",
                room_id, progress.next_index
            ))
        })?;
        session.advance(self.words.next_word(), next_drawer_id)?;
        self.sessions.save(session.clone());

        publish_json(
            self.broadcaster.as_ref(),
            &topic::game(&room.code),
            &GameEventMessage::round_started(&session),
        );
        self.schedule_round_timeout(&session);
        Ok(())
    }

    async fn publish_snapshot(&self, room: &Room, session: &GameSession) -> Result<(), Error> {
        let players = self.rooms.players_ordered(&room.code).await?;
        publish_json(
            self.broadcaster.as_ref(),
            &topic::state(&room.code),
            &RoomSnapshot::new(room, &players, session),
        );
        Ok(())
    }

    async fn release_room(&self, room_id: RoomId) -> Result<(), Error> {
        self.timer.cancel(room_id);
        if let Some(session) = self.sessions.remove(room_id) {
            if session.status().was_started() {
                ACTIVE_GAMES.dec();
            }
        }
        match self.rooms.set_status(room_id, RoomStatus::Waiting).await {
            Ok(_) | Err(Error::Domain(DomainError::RoomIdNotFound(_))) => Ok(()),
            Err(error) => Err(error),
        }
    }
}
