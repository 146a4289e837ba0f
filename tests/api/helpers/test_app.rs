use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Response;
use serde::Deserialize;
use serde_json::json;
use sketchroom::config::Config;
use tokio::net::TcpListener;

use super::test_player::TestPlayer;

pub struct TestApp {
    pub base_address: String,
    pub inactivity_timeout: Duration,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoom {
    pub room_code: String,
    pub player_id: u64,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoom {
    pub player_id: u64,
    pub nickname: String,
    pub room: RoomSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_code: String,
    pub host_player_id: Option<u64>,
    pub players: Vec<PlayerDto>,
    pub status: String,
    pub total_rounds: usize,
    pub current_round: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub player_id: u64,
    pub nickname: String,
    pub is_host: bool,
    pub score: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: String,
    pub total_rounds: usize,
    pub current_round: usize,
    pub current_drawer_id: Option<u64>,
    pub word: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDto {
    pub r#type: String,
    pub title: String,
    pub detail: String,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        TestApp::spawn_app_with(|_| {}).await
    }

    pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
        // Binding to port 0 triggers an OS scan for an available port, this way we can run tests in parallel where each runs its own application
        let random_port_address = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(random_port_address)
            .await
            .expect("Failed to bind to bind random port.");
        let address = listener.local_addr().unwrap();
        std::env::set_var("ENVIRONMENT", "dev");
        let config = {
            let mut config = Config::get().expect("Failed to read configuration.");
            config.websocket.inactivity_timeout_seconds = 5;
            customize(&mut config);
            config
        };

        let server = sketchroom::startup::create_web_server(config.clone(), listener);
        let _ = tokio::spawn(server);

        TestApp {
            base_address: format!("localhost:{}", address.port()),
            inactivity_timeout: config.websocket.inactivity_timeout(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("http://{}{path}", self.base_address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_room(&self, nickname: &str) -> CreatedRoom {
        let response = self
            .client
            .post(format!("http://{}/api/rooms", self.base_address))
            .json(&json!({ "nickname": nickname }))
            .send()
            .await
            .expect("Failed to execute CreateRoom request.");
        assert_eq!(response.status().as_u16(), 201);
        response
            .json()
            .await
            .expect("Failed to parse CreatedRoom.")
    }

    pub async fn join_room(&self, room_code: &str, nickname: &str) -> Response {
        self.client
            .post(format!(
                "http://{}/api/rooms/{room_code}/players",
                self.base_address
            ))
            .json(&json!({ "nickname": nickname }))
            .send()
            .await
            .expect("Failed to execute JoinRoom request.")
    }

    pub async fn join_room_ok(&self, room_code: &str, nickname: &str) -> JoinedRoom {
        let response = self.join_room(room_code, nickname).await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse JoinedRoom.")
    }

    pub async fn get_room(&self, room_code: &str) -> Response {
        self.get(&format!("/api/rooms/{room_code}")).await
    }

    pub async fn leave_room(&self, room_code: &str, player_id: u64) -> Response {
        self.client
            .delete(format!(
                "http://{}/api/rooms/{room_code}/players/{player_id}",
                self.base_address
            ))
            .send()
            .await
            .expect("Failed to execute LeaveRoom request.")
    }

    pub async fn start_game(&self, room_code: &str) -> Response {
        self.client
            .post(format!(
                "http://{}/api/rooms/{room_code}/start",
                self.base_address
            ))
            .send()
            .await
            .expect("Failed to execute StartGame request.")
    }

    pub async fn open_raw_websocket(&self, room_code: &str, player_id: u64) -> TestPlayer {
        TestPlayer::connect(&format!(
            "ws://{}/api/rooms/{room_code}/players/{player_id}/ws",
            self.base_address
        ))
        .await
    }

    /// Opens the player's WebSocket and waits until the server is serving it, so no event
    /// published afterwards is missed.
    pub async fn open_websocket(&self, room_code: &str, player_id: u64) -> TestPlayer {
        let mut player = self.open_raw_websocket(room_code, player_id).await;
        player.send_text("ping").await;
        assert_eq!(player.receive_text().await.unwrap(), "pong");
        player
    }
}

pub async fn error_type(response: Response) -> String {
    let error: ErrorDto = response.json().await.expect("Failed to parse ErrorDto.");
    assert!(!error.title.is_empty());
    assert!(!error.detail.is_empty());
    error.r#type
}

