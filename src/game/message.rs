use serde::{Deserialize, Serialize};

use crate::game::session::GameSession;
use crate::game::session_fsm::GameStatus;
use crate::room::{Player, PlayerId, Room, RoomStatus};

/// Returned to whoever started the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: String,
    pub total_rounds: usize,
    pub current_round: usize,
    pub current_drawer_id: Option<PlayerId>,
    pub word: Option<String>,
}

impl From<&GameSession> for GameState {
    fn from(session: &GameSession) -> Self {
        GameState {
            phase: session.status().as_str().to_string(),
            total_rounds: session.total_rounds(),
            current_round: session.current_round(),
            current_drawer_id: session.current_drawer_id(),
            word: session.word().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventType {
    RoundStarted,
    RoundTimeout,
}

/// Payload published on `rooms/{code}/game`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEventMessage {
    pub r#type: GameEventType,
    pub current_round: usize,
    pub total_rounds: usize,
    pub current_drawer_id: Option<PlayerId>,
    pub word: Option<String>,
    pub game_finished: bool,
}

impl GameEventMessage {
    pub fn round_started(session: &GameSession) -> Self {
        GameEventMessage::new(GameEventType::RoundStarted, session, false)
    }

    pub fn round_timeout(session: &GameSession, game_finished: bool) -> Self {
        GameEventMessage::new(GameEventType::RoundTimeout, session, game_finished)
    }

    fn new(r#type: GameEventType, session: &GameSession, game_finished: bool) -> Self {
        GameEventMessage {
            r#type,
            current_round: session.current_round(),
            total_rounds: session.total_rounds(),
            current_drawer_id: session.current_drawer_id(),
            word: session.word().map(str::to_string),
            game_finished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub player_id: PlayerId,
    pub nickname: String,
    pub is_host: bool,
    pub score: u32,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        PlayerDto {
            player_id: player.id,
            nickname: player.nickname.clone(),
            is_host: player.is_host,
            score: player.score,
        }
    }
}

/// Payload published on `rooms/{code}/state` and returned by the room endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_code: String,
    pub host_player_id: Option<PlayerId>,
    pub players: Vec<PlayerDto>,
    pub status: RoomStatus,
    pub total_rounds: usize,
    pub current_round: usize,
}

impl RoomSnapshot {
    pub fn new(room: &Room, players: &[Player], session: &GameSession) -> Self {
        RoomSnapshot {
            room_code: room.code.clone(),
            host_player_id: room.host_player_id,
            players: players.iter().map(PlayerDto::from).collect(),
            status: room.status,
            total_rounds: session.total_rounds(),
            current_round: session.current_round(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuessResult {
    pub correct: bool,
    pub session: Option<GameSession>,
}

impl GuessResult {
    pub fn incorrect(session: Option<GameSession>) -> Self {
        GuessResult {
            correct: false,
            session,
        }
    }

    pub fn correct(session: GameSession) -> Self {
        GuessResult {
            correct: true,
            session: Some(session),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.status() == GameStatus::InProgress)
    }
}
