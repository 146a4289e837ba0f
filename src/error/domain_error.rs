use thiserror::Error;

use crate::room::{PlayerId, RoomId};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("The room does not exist. RoomCode: '{0}'.")]
    RoomNotFound(String),
    #[error("The room does not exist. RoomId: '{0}'.")]
    RoomIdNotFound(RoomId),
    #[error("The player does not exist. PlayerId: '{0}'.")]
    PlayerNotFound(PlayerId),
    #[error("Not enough players to start the game. ActualPlayers: '{0}', MinimumPlayers: '{1}'.")]
    NotEnoughPlayers(usize, usize),
    #[error("The game has already started. RoomCode: '{0}'.")]
    GameAlreadyStarted(String),
}
