use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::time::{self, Instant};

use crate::broadcast::{publish_json, topic, Broadcaster, Publication};
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::game::service::GameService;
use crate::metrics::CONNECTED_PLAYERS;
use crate::room::actor_client::RoomDirectory;
use crate::room::{Player, PlayerId};
use crate::websocket::message::{ChatMessage, DrawMessage, StrokeDto, WsMessageIn, WsMessageOut};
use crate::websocket::{close, parse_message, send_error, send_message, send_message_string};

/// Everything a connected player needs to be served.
pub struct ConnectionContext {
    pub rooms: RoomDirectory,
    pub game: GameService,
    pub broadcaster: Arc<Broadcaster>,
    pub inactivity_timeout: Duration,
}

/// Serves one player's WebSocket: forwards the publications of their room and turns their
/// chat and draw messages into game actions.
pub struct PlayerConnection {
    room_code: String,
    player: Player,
    game: GameService,
    broadcaster: Arc<Broadcaster>,
    publication_rx: Receiver<Publication>,
    websocket: WebSocket,
    inactivity_timeout: Duration,
}

impl PlayerConnection {
    pub async fn create(
        room_code: String,
        player_id: PlayerId,
        context: ConnectionContext,
        mut websocket: WebSocket,
    ) {
        // subscribe first so nothing published while validating is missed
        let publication_rx = context.broadcaster.subscribe();

        match PlayerConnection::find_member(&context.rooms, &room_code, player_id).await {
            Ok(player) => {
                PlayerConnection {
                    room_code,
                    player,
                    game: context.game,
                    broadcaster: context.broadcaster,
                    publication_rx,
                    websocket,
                    inactivity_timeout: context.inactivity_timeout,
                }
                .start()
                .await
            }
            Err(error) => {
                send_error(&mut websocket, &error).await;
                close(websocket).await;
            }
        }
    }

    async fn find_member(
        rooms: &RoomDirectory,
        room_code: &str,
        player_id: PlayerId,
    ) -> Result<Player, Error> {
        let room = rooms.find_by_code(room_code).await?;
        let player = rooms.find_player(player_id).await?;
        if player.room_id != room.id {
            return Err(Error::Domain(DomainError::PlayerNotFound(player_id)));
        }
        Ok(player)
    }

    async fn start(mut self) {
        CONNECTED_PLAYERS.inc();
        log::info!(
            "Player connected. RoomCode: '{}', PlayerId: '{}'.",
            self.room_code,
            self.player.id
        );

        let room_prefix = topic::room_prefix(&self.room_code);
        let mut inactivity_deadline = Instant::now() + self.inactivity_timeout;

        loop {
            let result = select! {
                publication = self.publication_rx.recv() => {
                    self.receive_publication(&room_prefix, publication).await
                },
                websocket_message = self.websocket.recv() => {
                    inactivity_deadline = Instant::now() + self.inactivity_timeout;
                    self.receive_websocket_message(websocket_message).await
                },
                _ = time::sleep_until(inactivity_deadline) => {
                    self.log_connection_lost("connection timed out; missing 'ping' messages");
                    Err(Error::WebsocketClosed(
                        "connection timed out; missing 'ping' messages".to_string(),
                    ))
                },
            };

            if let Err(error) = result {
                if !matches!(error, Error::WebsocketClosed(_)) {
                    send_error(&mut self.websocket, &error).await;
                }
                if error.is_fatal_for_connection() {
                    break;
                }
            }
        }

        close(self.websocket).await;
        CONNECTED_PLAYERS.dec();
    }

    async fn receive_publication(
        &mut self,
        room_prefix: &str,
        publication: Result<Publication, RecvError>,
    ) -> Result<(), Error> {
        match publication {
            Ok(publication) if publication.topic.starts_with(room_prefix) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::Event {
                        topic: publication.topic,
                        payload: publication.payload,
                    },
                )
                .await
            }
            Ok(_) => Ok(()),
            Err(RecvError::Lagged(skipped)) => {
                log::warn!(
                    "Player fell behind the room events. RoomCode: '{}', PlayerId: '{}', Skipped: '{}'.",
                    self.room_code,
                    self.player.id,
                    skipped
                );
                Ok(())
            }
            Err(RecvError::Closed) => Err(Error::log_and_create_internal(
                "The broadcast channel is closed.",
            )),
        }
    }

    async fn receive_websocket_message(
        &mut self,
        websocket_message: Option<Result<Message, axum::Error>>,
    ) -> Result<(), Error> {
        match websocket_message {
            Some(Ok(Message::Text(text))) => match text.as_str() {
                "ping" => send_message_string(&mut self.websocket, "pong").await,
                message => match parse_message(message)? {
                    WsMessageIn::Chat { message } => self.chat(message).await,
                    WsMessageIn::Draw(stroke) => self.draw(stroke).await,
                },
            },
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => Ok(()),
            Some(Ok(Message::Close(_))) => {
                self.log_connection_lost("browser sent 'Close' websocket frame");
                Err(Error::WebsocketClosed(
                    "browser sent 'Close' websocket frame".to_string(),
                ))
            }
            None => {
                self.log_connection_lost("other end of websocket was closed abruptly");
                Err(Error::WebsocketClosed(
                    "other end of websocket was closed abruptly".to_string(),
                ))
            }
            Some(Err(error)) => Err(Error::UnprocessableMessage(
                error.to_string(),
                "Message cannot be loaded".to_string(),
            )),
            Some(Ok(Message::Binary(_))) => Err(Error::UnprocessableMessage(
                "Unsupported message type".to_string(),
                "Binary".to_string(),
            )),
        }
    }

    async fn chat(&mut self, message: String) -> Result<(), Error> {
        publish_json(
            self.broadcaster.as_ref(),
            &topic::chat(&self.room_code),
            &ChatMessage {
                player_id: self.player.id,
                nickname: self.player.nickname.clone(),
                message: message.clone(),
            },
        );

        let guess = self
            .game
            .guess_word(&self.room_code, self.player.id, &message)
            .await?;
        if guess.correct {
            self.game.publish_room_state(&self.room_code).await?;
        }
        Ok(())
    }

    async fn draw(&mut self, stroke: StrokeDto) -> Result<(), Error> {
        if !self.game.can_draw(&self.room_code, self.player.id).await? {
            return Ok(());
        }
        publish_json(
            self.broadcaster.as_ref(),
            &topic::draw(&self.room_code),
            &DrawMessage {
                player_id: self.player.id,
                stroke,
            },
        );
        Ok(())
    }

    fn log_connection_lost(&self, reason: &str) {
        log::info!(
            "Connection with player lost due to: {}. RoomCode: '{}', PlayerId: '{}'.",
            reason,
            self.room_code,
            self.player.id
        );
    }
}
