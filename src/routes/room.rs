use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::error::Error;
use crate::game::message::{GameState, RoomSnapshot};
use crate::room::service::{CreatedRoom, JoinedRoom, LeaveRoomResponse};
use crate::room::PlayerId;
use crate::startup::AppState;
use crate::websocket::connection::{ConnectionContext, PlayerConnection};

#[derive(Deserialize, Default)]
pub struct NicknameRequest {
    nickname: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    request: Option<Json<NicknameRequest>>,
) -> Result<(StatusCode, Json<CreatedRoom>), Error> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let (room, host) = state.rooms.create_room(request.nickname.as_deref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedRoom {
            room_code: room.code,
            player_id: host.id,
            nickname: host.nickname,
        }),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
) -> Result<Json<RoomSnapshot>, Error> {
    Ok(Json(state.rooms.get_room(&room_code).await?))
}

pub async fn join(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
    request: Option<Json<NicknameRequest>>,
) -> Result<(StatusCode, Json<JoinedRoom>), Error> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let (player, room) = state
        .rooms
        .join_room(&room_code, request.nickname.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(JoinedRoom {
            player_id: player.id,
            nickname: player.nickname,
            room,
        }),
    ))
}

pub async fn leave(
    State(state): State<AppState>,
    Path((room_code, player_id)): Path<(String, PlayerId)>,
) -> Result<Json<LeaveRoomResponse>, Error> {
    Ok(Json(state.rooms.leave_room(&room_code, player_id).await?))
}

pub async fn start_game(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
) -> Result<Json<GameState>, Error> {
    Ok(Json(state.game.start_game(&room_code).await?))
}

pub async fn connect_player_to_websocket(
    State(state): State<AppState>,
    Path((room_code, player_id)): Path<(String, PlayerId)>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    let context = ConnectionContext {
        rooms: state.directory,
        game: state.game,
        broadcaster: state.broadcaster,
        inactivity_timeout: state.config.websocket.inactivity_timeout(),
    };
    websocket_upgrade.on_upgrade(move |websocket| {
        PlayerConnection::create(room_code, player_id, context, websocket)
    })
}
