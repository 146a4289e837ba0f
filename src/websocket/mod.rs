pub mod connection;
pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::{Error, ErrorDto};

use self::message::{WsMessageIn, WsMessageOut};

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(error.to_string(), message.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;
    send_message_string(websocket, &message).await
}

pub async fn send_message_string(websocket: &mut WebSocket, message: &str) -> Result<(), Error> {
    websocket
        .send(Message::Text(message.to_string()))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}

pub async fn send_error(websocket: &mut WebSocket, error: &Error) {
    let message = WsMessageOut::Error {
        error: ErrorDto::from(error),
    };
    if let Err(send_error) = send_message(websocket, &message).await {
        log::warn!("Could not send the error to the player. Error: '{error}', Cause: '{send_error}'.");
    }
}

pub async fn close(websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::info!("Could not close the WebSocket, it may be already closed. Error: '{error}'.")
    }
}
