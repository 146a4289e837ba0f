pub mod actor;
pub mod actor_client;
pub mod service;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;

use crate::error::domain_error::DomainError;
use crate::error::Error;

pub type RoomId = u64;
pub type PlayerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "WAITING",
            RoomStatus::Playing => "PLAYING",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub code: String,
    pub status: RoomStatus,
    pub host_player_id: Option<PlayerId>,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub room_id: RoomId,
    pub nickname: String,
    pub score: u32,
    pub is_host: bool,
    pub joined_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedPlayer {
    pub player: Player,
    pub remaining_players: usize,
}

/// In-memory room and player directory. Owned by the directory actor, never shared.
pub struct Rooms {
    rooms: HashMap<RoomId, Room>,
    room_ids_by_code: HashMap<String, RoomId>,
    players: HashMap<PlayerId, Player>,
    next_room_id: RoomId,
    next_player_id: PlayerId,
    code_length: usize,
}

impl Rooms {
    const CODE_ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    pub fn new(code_length: usize) -> Self {
        Rooms {
            rooms: HashMap::default(),
            room_ids_by_code: HashMap::default(),
            players: HashMap::default(),
            next_room_id: 1,
            next_player_id: 1,
            code_length: code_length.max(1),
        }
    }

    pub fn create_room(&mut self, host_nickname: &str) -> (Room, Player) {
        let code = self.create_unique_code();
        let room_id = self.next_room_id;
        self.next_room_id += 1;

        let host = self.insert_player(room_id, host_nickname, true);
        let room = Room {
            id: room_id,
            code: code.clone(),
            status: RoomStatus::Waiting,
            host_player_id: Some(host.id),
            created_at: SystemTime::now(),
        };
        self.rooms.insert(room_id, room.clone());
        self.room_ids_by_code.insert(code, room_id);

        (room, host)
    }

    pub fn add_player(&mut self, code: &str, nickname: &str) -> Result<Player, Error> {
        let room_id = self.find_by_code(code)?.id;
        Ok(self.insert_player(room_id, nickname, false))
    }

    /// Removes a player that belongs to the room with the given code.
    pub fn remove_player(&mut self, code: &str, player_id: PlayerId) -> Result<RemovedPlayer, Error> {
        let room = self.find_by_code(code)?.clone();
        match self.players.get(&player_id) {
            Some(player) if player.room_id == room.id => {}
            _ => return Err(Error::Domain(DomainError::PlayerNotFound(player_id))),
        }
        let player = self
            .players
            .remove(&player_id)
            .ok_or(Error::Domain(DomainError::PlayerNotFound(player_id)))?;

        if room.host_player_id == Some(player_id) {
            if let Some(room) = self.rooms.get_mut(&room.id) {
                room.host_player_id = None;
            }
        }

        Ok(RemovedPlayer {
            player,
            remaining_players: self.count_players(code)?,
        })
    }

    /// Hands the host role to the earliest remaining player.
    pub fn assign_new_host(&mut self, code: &str) -> Result<Option<PlayerId>, Error> {
        let players = self.players_ordered(code)?;
        let new_host = players.first().map(|player| player.id);

        for player in players {
            if let Some(player) = self.players.get_mut(&player.id) {
                player.is_host = Some(player.id) == new_host;
            }
        }
        let room_id = self.find_by_code(code)?.id;
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.host_player_id = new_host;
        }

        Ok(new_host)
    }

    pub fn delete_room(&mut self, room_id: RoomId) -> Option<Room> {
        let room = self.rooms.remove(&room_id)?;
        self.room_ids_by_code.remove(&room.code);
        self.players.retain(|_, player| player.room_id != room_id);
        Some(room)
    }

    pub fn find_by_code(&self, code: &str) -> Result<&Room, Error> {
        self.room_ids_by_code
            .get(code)
            .and_then(|room_id| self.rooms.get(room_id))
            .ok_or_else(|| Error::Domain(DomainError::RoomNotFound(code.to_string())))
    }

    pub fn find_by_id(&self, room_id: RoomId) -> Result<&Room, Error> {
        self.rooms
            .get(&room_id)
            .ok_or(Error::Domain(DomainError::RoomIdNotFound(room_id)))
    }

    /// Players of the room in join order.
    pub fn players_ordered(&self, code: &str) -> Result<Vec<Player>, Error> {
        let room_id = self.find_by_code(code)?.id;
        let mut players: Vec<Player> = self
            .players
            .values()
            .filter(|player| player.room_id == room_id)
            .cloned()
            .collect();
        players.sort_by_key(|player| (player.joined_at, player.id));
        Ok(players)
    }

    pub fn count_players(&self, code: &str) -> Result<usize, Error> {
        let room_id = self.find_by_code(code)?.id;
        Ok(self
            .players
            .values()
            .filter(|player| player.room_id == room_id)
            .count())
    }

    pub fn find_player(&self, player_id: PlayerId) -> Result<&Player, Error> {
        self.players
            .get(&player_id)
            .ok_or(Error::Domain(DomainError::PlayerNotFound(player_id)))
    }

    pub fn award_points(&mut self, player_id: PlayerId, points: u32) -> Result<Player, Error> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(Error::Domain(DomainError::PlayerNotFound(player_id)))?;
        player.score = player.score.saturating_add(points);
        Ok(player.clone())
    }

    pub fn set_status(&mut self, room_id: RoomId, status: RoomStatus) -> Result<Room, Error> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(Error::Domain(DomainError::RoomIdNotFound(room_id)))?;
        room.status = status;
        Ok(room.clone())
    }

    fn insert_player(&mut self, room_id: RoomId, nickname: &str, is_host: bool) -> Player {
        let player = Player {
            id: self.next_player_id,
            room_id,
            nickname: nickname.to_string(),
            score: 0,
            is_host,
            joined_at: SystemTime::now(),
        };
        self.next_player_id += 1;
        self.players.insert(player.id, player.clone());
        player
    }

    fn create_unique_code(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let code: String = (0..self.code_length)
                .map(|_| {
                    let index = rng.gen_range(0..Rooms::CODE_ALPHABET.len());
                    Rooms::CODE_ALPHABET[index] as char
                })
                .collect();
            if !self.room_ids_by_code.contains_key(&code) {
                return code;
            }
        }
    }
}
