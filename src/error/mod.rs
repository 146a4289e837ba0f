pub mod domain_error;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use self::domain_error::DomainError;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("Domain Error. {0}")]
    Domain(DomainError),
    #[error("Internal Error. Error: '{0}'.")]
    Internal(String),
    #[error("Received a bad formatted message. Message: '{1}', Error: '{0}'.")]
    UnprocessableMessage(String, String),
    #[error("The websocket with the player is closed. Reason: '{0}'.")]
    WebsocketClosed(String),
}

impl Error {
    pub fn log_and_create_internal(message: &str) -> Error {
        log::error!("{message}");
        Error::Internal(message.to_string())
    }

    /// Whether a WebSocket connection should be dropped after reporting this error.
    pub fn is_fatal_for_connection(&self) -> bool {
        match self {
            Error::Internal(_) | Error::WebsocketClosed(_) => true,
            Error::Domain(DomainError::RoomNotFound(_))
            | Error::Domain(DomainError::RoomIdNotFound(_)) => true,
            Error::Domain(_) | Error::UnprocessableMessage(_, _) => false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Domain(DomainError::RoomNotFound(_))
            | Error::Domain(DomainError::RoomIdNotFound(_))
            | Error::Domain(DomainError::PlayerNotFound(_)) => StatusCode::NOT_FOUND,
            Error::Domain(DomainError::NotEnoughPlayers(_, _)) => StatusCode::BAD_REQUEST,
            Error::Domain(DomainError::GameAlreadyStarted(_)) => StatusCode::CONFLICT,
            Error::UnprocessableMessage(_, _) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Internal(_) | Error::WebsocketClosed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for Error {
    fn from(error: DomainError) -> Self {
        Error::Domain(error)
    }
}

/// Body shared by HTTP error responses and WebSocket error frames.
#[derive(Debug, Serialize)]
pub struct ErrorDto {
    pub r#type: String,
    pub title: String,
    pub detail: String,
}

impl From<&Error> for ErrorDto {
    fn from(error: &Error) -> Self {
        let (r#type, title) = match error {
            Error::Domain(DomainError::RoomNotFound(_))
            | Error::Domain(DomainError::RoomIdNotFound(_)) => {
                ("ROOM_NOT_FOUND", "The room does not exist")
            }
            Error::Domain(DomainError::PlayerNotFound(_)) => {
                ("PLAYER_NOT_FOUND", "The player does not exist")
            }
            Error::Domain(DomainError::NotEnoughPlayers(_, _)) => {
                ("NOT_ENOUGH_PLAYERS", "Not enough players to start the game")
            }
            Error::Domain(DomainError::GameAlreadyStarted(_)) => {
                ("GAME_ALREADY_STARTED", "The game has already started")
            }
            Error::Internal(_) => ("INTERNAL_SERVER", "Internal Server error"),
            Error::UnprocessableMessage(_, _) => {
                ("UNPROCESSABLE_MESSAGE", "The message could not be processed")
            }
            Error::WebsocketClosed(_) => ("WEBSOCKET_CLOSED", "The player websocket is closed"),
        };
        ErrorDto {
            r#type: r#type.to_string(),
            title: title.to_string(),
            detail: error.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorDto::from(&self))).into_response()
    }
}
