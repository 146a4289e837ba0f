use std::fmt::{Display, Formatter};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot::Sender as OneshotSender;

use crate::config::RoomSettings;
use crate::error::Error;
use crate::room::actor_client::RoomDirectory;
use crate::room::{Player, PlayerId, RemovedPlayer, Room, RoomId, RoomStatus, Rooms};

pub struct RoomDirectoryActor {
    rooms: Rooms,
    directory_rx: Receiver<DirectoryCommand>,
}

impl RoomDirectoryActor {
    /// Runs the directory actor in background and returns a client to communicate with it
    pub fn spawn(settings: RoomSettings) -> RoomDirectory {
        let (directory_tx, directory_rx): (Sender<DirectoryCommand>, Receiver<DirectoryCommand>) =
            mpsc::channel(512);

        tokio::spawn(
            RoomDirectoryActor {
                rooms: Rooms::new(settings.code_length),
                directory_rx,
            }
            .start(),
        );

        RoomDirectory { directory_tx }
    }

    async fn start(mut self) {
        while let Some(command) = self.directory_rx.recv().await {
            let name = command.to_string();
            let delivered = match command {
                DirectoryCommand::CreateRoom {
                    nickname,
                    response_tx,
                } => response_tx
                    .send(Ok(self.rooms.create_room(&nickname)))
                    .is_ok(),
                DirectoryCommand::AddPlayer {
                    code,
                    nickname,
                    response_tx,
                } => response_tx
                    .send(self.rooms.add_player(&code, &nickname))
                    .is_ok(),
                DirectoryCommand::RemovePlayer {
                    code,
                    player_id,
                    response_tx,
                } => response_tx
                    .send(self.rooms.remove_player(&code, player_id))
                    .is_ok(),
                DirectoryCommand::AssignNewHost { code, response_tx } => response_tx
                    .send(self.rooms.assign_new_host(&code))
                    .is_ok(),
                DirectoryCommand::DeleteRoom {
                    room_id,
                    response_tx,
                } => response_tx
                    .send(Ok(self.rooms.delete_room(room_id)))
                    .is_ok(),
                DirectoryCommand::FindByCode { code, response_tx } => response_tx
                    .send(self.rooms.find_by_code(&code).cloned())
                    .is_ok(),
                DirectoryCommand::FindById {
                    room_id,
                    response_tx,
                } => response_tx
                    .send(self.rooms.find_by_id(room_id).cloned())
                    .is_ok(),
                DirectoryCommand::PlayersOrdered { code, response_tx } => response_tx
                    .send(self.rooms.players_ordered(&code))
                    .is_ok(),
                DirectoryCommand::CountPlayers { code, response_tx } => response_tx
                    .send(self.rooms.count_players(&code))
                    .is_ok(),
                DirectoryCommand::FindPlayer {
                    player_id,
                    response_tx,
                } => response_tx
                    .send(self.rooms.find_player(player_id).cloned())
                    .is_ok(),
                DirectoryCommand::AwardPoints {
                    player_id,
                    points,
                    response_tx,
                } => response_tx
                    .send(self.rooms.award_points(player_id, points))
                    .is_ok(),
                DirectoryCommand::SetStatus {
                    room_id,
                    status,
                    response_tx,
                } => response_tx
                    .send(self.rooms.set_status(room_id, status))
                    .is_ok(),
            };
            if !delivered {
                log::error!("Processed {name} but the response channel is closed.");
            }
        }
        log::info!("RoomDirectory channel has been dropped. Stopping directory actor.");
    }
}

pub(crate) type Reply<T> = OneshotSender<Result<T, Error>>;

#[derive(Debug)]
pub(crate) enum DirectoryCommand {
    CreateRoom {
        nickname: String,
        response_tx: Reply<(Room, Player)>,
    },
    AddPlayer {
        code: String,
        nickname: String,
        response_tx: Reply<Player>,
    },
    RemovePlayer {
        code: String,
        player_id: PlayerId,
        response_tx: Reply<RemovedPlayer>,
    },
    AssignNewHost {
        code: String,
        response_tx: Reply<Option<PlayerId>>,
    },
    DeleteRoom {
        room_id: RoomId,
        response_tx: Reply<Option<Room>>,
    },
    FindByCode {
        code: String,
        response_tx: Reply<Room>,
    },
    FindById {
        room_id: RoomId,
        response_tx: Reply<Room>,
    },
    PlayersOrdered {
        code: String,
        response_tx: Reply<Vec<Player>>,
    },
    CountPlayers {
        code: String,
        response_tx: Reply<usize>,
    },
    FindPlayer {
        player_id: PlayerId,
        response_tx: Reply<Player>,
    },
    AwardPoints {
        player_id: PlayerId,
        points: u32,
        response_tx: Reply<Player>,
    },
    SetStatus {
        room_id: RoomId,
        status: RoomStatus,
        response_tx: Reply<Room>,
    },
}

impl Display for DirectoryCommand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryCommand::CreateRoom { nickname, .. } => {
                write!(formatter, "CreateRoom(nickname: {nickname})")
            }
            DirectoryCommand::AddPlayer { code, nickname, .. } => {
                write!(formatter, "AddPlayer(code: {code}, nickname: {nickname})")
            }
            DirectoryCommand::RemovePlayer {
                code, player_id, ..
            } => write!(formatter, "RemovePlayer(code: {code}, player_id: {player_id})"),
            DirectoryCommand::AssignNewHost { code, .. } => {
                write!(formatter, "AssignNewHost(code: {code})")
            }
            DirectoryCommand::DeleteRoom { room_id, .. } => {
                write!(formatter, "DeleteRoom(room_id: {room_id})")
            }
            DirectoryCommand::FindByCode { code, .. } => {
                write!(formatter, "FindByCode(code: {code})")
            }
            DirectoryCommand::FindById { room_id, .. } => {
                write!(formatter, "FindById(room_id: {room_id})")
            }
            DirectoryCommand::PlayersOrdered { code, .. } => {
                write!(formatter, "PlayersOrdered(code: {code})")
            }
            DirectoryCommand::CountPlayers { code, .. } => {
                write!(formatter, "CountPlayers(code: {code})")
            }
            DirectoryCommand::FindPlayer { player_id, .. } => {
                write!(formatter, "FindPlayer(player_id: {player_id})")
            }
            DirectoryCommand::AwardPoints {
                player_id, points, ..
            } => write!(formatter, "AwardPoints(player_id: {player_id}, points: {points})"),
            DirectoryCommand::SetStatus {
                room_id, status, ..
            } => write!(
                formatter,
                "SetStatus(room_id: {room_id}, status: {})",
                status.as_str()
            ),
        }
    }
}
