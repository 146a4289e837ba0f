use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;

use crate::error::Error;
use crate::room::actor::{DirectoryCommand, Reply};
use crate::room::{Player, PlayerId, RemovedPlayer, Room, RoomId, RoomStatus};

#[derive(Clone, Debug)]
pub struct RoomDirectory {
    pub(super) directory_tx: Sender<DirectoryCommand>,
}

impl RoomDirectory {
    pub async fn create_room(&self, nickname: &str) -> Result<(Room, Player), Error> {
        self.request(|response_tx| DirectoryCommand::CreateRoom {
            nickname: nickname.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn add_player(&self, code: &str, nickname: &str) -> Result<Player, Error> {
        self.request(|response_tx| DirectoryCommand::AddPlayer {
            code: code.to_string(),
            nickname: nickname.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn remove_player(
        &self,
        code: &str,
        player_id: PlayerId,
    ) -> Result<RemovedPlayer, Error> {
        self.request(|response_tx| DirectoryCommand::RemovePlayer {
            code: code.to_string(),
            player_id,
            response_tx,
        })
        .await
    }

    pub async fn assign_new_host(&self, code: &str) -> Result<Option<PlayerId>, Error> {
        self.request(|response_tx| DirectoryCommand::AssignNewHost {
            code: code.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn delete_room(&self, room_id: RoomId) -> Result<Option<Room>, Error> {
        self.request(|response_tx| DirectoryCommand::DeleteRoom {
            room_id,
            response_tx,
        })
        .await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Room, Error> {
        self.request(|response_tx| DirectoryCommand::FindByCode {
            code: code.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn find_by_id(&self, room_id: RoomId) -> Result<Room, Error> {
        self.request(|response_tx| DirectoryCommand::FindById {
            room_id,
            response_tx,
        })
        .await
    }

    pub async fn players_ordered(&self, code: &str) -> Result<Vec<Player>, Error> {
        self.request(|response_tx| DirectoryCommand::PlayersOrdered {
            code: code.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn count_players(&self, code: &str) -> Result<usize, Error> {
        self.request(|response_tx| DirectoryCommand::CountPlayers {
            code: code.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn find_player(&self, player_id: PlayerId) -> Result<Player, Error> {
        self.request(|response_tx| DirectoryCommand::FindPlayer {
            player_id,
            response_tx,
        })
        .await
    }

    pub async fn award_points(&self, player_id: PlayerId, points: u32) -> Result<Player, Error> {
        self.request(|response_tx| DirectoryCommand::AwardPoints {
            player_id,
            points,
            response_tx,
        })
        .await
    }

    pub async fn set_status(&self, room_id: RoomId, status: RoomStatus) -> Result<Room, Error> {
        self.request(|response_tx| DirectoryCommand::SetStatus {
            room_id,
            status,
            response_tx,
        })
        .await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> DirectoryCommand,
    ) -> Result<T, Error> {
        let (tx, rx) = oneshot::channel();
        let command = command(tx);
        let name = command.to_string();

        self.directory_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The RoomDirectory is not alive. Can't execute {name}. Error: '{error}'."
            ))
        })?;

        rx.await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Sent {name} to the RoomDirectory, but the response channel died. Error: '{error}'."
            ))
        })?
    }
}
