use rand::Rng;
use serde::Serialize;

use crate::error::Error;
use crate::game::message::RoomSnapshot;
use crate::game::service::GameService;
use crate::room::actor_client::RoomDirectory;
use crate::room::{Player, PlayerId, Room};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoom {
    pub room_code: String,
    pub player_id: PlayerId,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoom {
    pub player_id: PlayerId,
    pub nickname: String,
    pub room: RoomSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomResponse {
    pub room_code: String,
    pub room_deleted: bool,
    pub new_host_player_id: Option<PlayerId>,
    pub remaining_players: usize,
}

/// Lobby side of a room: creation, joining and leaving.
#[derive(Clone)]
pub struct RoomService {
    rooms: RoomDirectory,
    game: GameService,
}

impl RoomService {
    pub fn new(rooms: RoomDirectory, game: GameService) -> Self {
        RoomService { rooms, game }
    }

    pub async fn create_room(&self, nickname: Option<&str>) -> Result<(Room, Player), Error> {
        let nickname = RoomService::nickname_or_default(nickname, "Host");
        let (room, host) = self.rooms.create_room(&nickname).await?;
        log::info!(
            "Room created. RoomCode: '{}', HostId: '{}'.",
            room.code,
            host.id
        );
        Ok((room, host))
    }

    pub async fn get_room(&self, room_code: &str) -> Result<RoomSnapshot, Error> {
        let room = self.rooms.find_by_code(room_code).await?;
        self.game.room_snapshot(&room).await
    }

    pub async fn join_room(
        &self,
        room_code: &str,
        nickname: Option<&str>,
    ) -> Result<(Player, RoomSnapshot), Error> {
        let nickname = RoomService::nickname_or_default(nickname, "Player");
        let player = self.rooms.add_player(room_code, &nickname).await?;
        let snapshot = self.game.publish_room_state(room_code).await?;
        log::info!(
            "Player joined. RoomCode: '{}', PlayerId: '{}', Nickname: '{}'.",
            room_code,
            player.id,
            player.nickname
        );
        Ok((player, snapshot))
    }

    pub async fn leave_room(
        &self,
        room_code: &str,
        player_id: PlayerId,
    ) -> Result<LeaveRoomResponse, Error> {
        let room = self.rooms.find_by_code(room_code).await?;
        let removed = self.rooms.remove_player(room_code, player_id).await?;
        log::info!(
            "Player left. RoomCode: '{}', PlayerId: '{}', RemainingPlayers: '{}'.",
            room_code,
            player_id,
            removed.remaining_players
        );

        if removed.remaining_players == 0 {
            self.game.end_game(room.id).await?;
            self.rooms.delete_room(room.id).await?;
            self.game.forget_room(room.id);
            log::info!("Room deleted. RoomCode: '{room_code}'.");
            return Ok(LeaveRoomResponse {
                room_code: room.code,
                room_deleted: true,
                new_host_player_id: None,
                remaining_players: 0,
            });
        }

        let new_host_player_id = if removed.player.is_host {
            self.rooms.assign_new_host(room_code).await?
        } else {
            None
        };
        self.game.publish_room_state(room_code).await?;

        Ok(LeaveRoomResponse {
            room_code: room.code,
            room_deleted: false,
            new_host_player_id,
            remaining_players: removed.remaining_players,
        })
    }

    fn nickname_or_default(nickname: Option<&str>, prefix: &str) -> String {
        match nickname.map(str::trim) {
            Some(nickname) if !nickname.is_empty() => nickname.to_string(),
            _ => format!("{prefix}{}", rand::thread_rng().gen_range(1000..10000)),
        }
    }
}
