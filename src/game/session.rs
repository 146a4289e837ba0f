use rust_fsm::StateMachineImpl;
use std::time::{Duration, SystemTime};

use crate::error::Error;
use crate::game::session_fsm::{GameSessionFsm, GameSessionFsmInput, GameStatus};
use crate::room::{PlayerId, RoomId};

/// Where the game would go after the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundProgress {
    pub next_index: usize,
    pub finished: bool,
}

/// Per-room record of round and turn progress.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    room_id: RoomId,
    room_code: String,
    total_rounds: usize,
    seconds_per_round: u64,
    current_round: usize,
    turn_order: Vec<PlayerId>,
    current_order_index: usize,
    current_drawer_id: Option<PlayerId>,
    word: Option<String>,
    correct_guessers: Vec<PlayerId>,
    round_started_at: Option<SystemTime>,
    round_ends_at: Option<SystemTime>,
    status: GameStatus,
}

impl GameSession {
    pub fn new(room_id: RoomId, room_code: &str, total_rounds: usize, seconds_per_round: u64) -> Self {
        GameSession {
            room_id,
            room_code: room_code.to_string(),
            total_rounds,
            seconds_per_round,
            current_round: 0,
            turn_order: Vec::default(),
            current_order_index: 0,
            current_drawer_id: None,
            word: None,
            correct_guessers: Vec::default(),
            round_started_at: None,
            round_ends_at: None,
            status: GameSessionFsm::INITIAL_STATE,
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn room_code(&self) -> &str {
        &self.room_code
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    pub fn seconds_per_round(&self) -> u64 {
        self.seconds_per_round
    }

    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.seconds_per_round)
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn current_order_index(&self) -> usize {
        self.current_order_index
    }

    pub fn current_drawer_id(&self) -> Option<PlayerId> {
        self.current_drawer_id
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    pub fn round_started_at(&self) -> Option<SystemTime> {
        self.round_started_at
    }

    pub fn round_ends_at(&self) -> Option<SystemTime> {
        self.round_ends_at
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn is_drawer(&self, player_id: PlayerId) -> bool {
        self.current_drawer_id == Some(player_id)
    }

    pub fn has_guessed_correctly(&self, player_id: PlayerId) -> bool {
        self.correct_guessers.contains(&player_id)
    }

    pub fn record_correct_guess(&mut self, player_id: PlayerId) {
        if !self.has_guessed_correctly(player_id) {
            self.correct_guessers.push(player_id);
        }
    }

    pub fn start(
        &mut self,
        word: String,
        first_drawer_id: PlayerId,
        turn_order: Vec<PlayerId>,
    ) -> Result<(), Error> {
        if turn_order.len() != self.total_rounds {
            return Err(Error::log_and_create_internal(&format!(
                "The turn order must have one drawer per round. RoomId: '{}', TurnOrder: '{}', TotalRounds: '{}'.",
                self.room_id,
                turn_order.len(),
                self.total_rounds
            )));
        }
        self.process_event(&GameSessionFsmInput::Start)?;

        self.turn_order = turn_order;
        self.current_drawer_id = Some(first_drawer_id);
        self.word = Some(word);
        self.current_order_index = 0;
        self.current_round = 1;
        self.correct_guessers.clear();
        self.open_round_window();
        Ok(())
    }

    /// Moves to the next round in place. The caller checks `round_progress` first.
    pub fn advance(&mut self, next_word: String, next_drawer_id: PlayerId) -> Result<(), Error> {
        if self.current_order_index + 1 >= self.total_rounds {
            return Err(Error::log_and_create_internal(&format!(
                "Tried to advance past the last round. RoomId: '{}', CurrentRound: '{}', TotalRounds: '{}'.",
                self.room_id, self.current_round, self.total_rounds
            )));
        }
        self.process_event(&GameSessionFsmInput::Advance)?;

        self.word = Some(next_word);
        self.current_drawer_id = Some(next_drawer_id);
        self.current_order_index += 1;
        self.current_round += 1;
        self.correct_guessers.clear();
        self.open_round_window();
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), Error> {
        self.process_event(&GameSessionFsmInput::Complete)?;
        self.close_round_window();
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), Error> {
        self.process_event(&GameSessionFsmInput::Reset)?;
        self.current_round = 0;
        self.close_round_window();
        Ok(())
    }

    pub fn round_progress(&self) -> RoundProgress {
        let next_index = self.current_order_index + 1;
        RoundProgress {
            next_index,
            finished: next_index >= self.turn_order.len() || next_index >= self.total_rounds,
        }
    }

    pub fn next_drawer_id(&self) -> Option<PlayerId> {
        self.turn_order.get(self.round_progress().next_index).copied()
    }

    fn open_round_window(&mut self) {
        let now = SystemTime::now();
        self.round_started_at = Some(now);
        self.round_ends_at = Some(now + self.round_duration());
    }

    fn close_round_window(&mut self) {
        self.round_started_at = None;
        self.round_ends_at = None;
    }

    fn process_event(&mut self, event: &GameSessionFsmInput) -> Result<(), Error> {
        match GameSessionFsm::transition(&self.status, event) {
            Some(next_status) => {
                self.status = next_status;
                Ok(())
            }
            None => Err(Error::log_and_create_internal(&format!(
                "The game session in state {:?} can't transition with an event {:?}. RoomId: '{}'.",
                self.status, event, self.room_id
            ))),
        }
    }
}
