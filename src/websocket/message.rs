use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorDto;
use crate::room::PlayerId;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum WsMessageIn {
    Chat { message: String },
    Draw(StrokeDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeDto {
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub color: String,
    pub line_width: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WsMessageOut {
    Event { topic: String, payload: Value },
    Error { error: ErrorDto },
}

/// Relayed on `rooms/{code}/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub player_id: PlayerId,
    pub nickname: String,
    pub message: String,
}

/// Relayed on `rooms/{code}/draw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawMessage {
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub stroke: StrokeDto,
}
