use std::time::Duration;

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestPlayer {
    pub tx: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>,
    pub rx: SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl TestPlayer {
    pub async fn connect(url: &str) -> TestPlayer {
        let (websocket, _) = tokio_tungstenite::connect_async(url)
            .await
            .expect("WebSocket could not be created.");
        let (tx, rx) = websocket.split();
        TestPlayer { tx, rx }
    }

    /// Next text frame, `Err` when the socket closes or nothing arrives in time.
    pub async fn receive_text(&mut self) -> Result<String, String> {
        loop {
            match timeout(RECEIVE_TIMEOUT, self.rx.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => return Ok(text),
                Ok(Some(Ok(Message::Ping(_)))) | Ok(Some(Ok(Message::Pong(_)))) => continue,
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {
                    return Err("Websocket closed.".to_string())
                }
                Ok(Some(Ok(message))) => return Err(format!("Unexpected message {message:?}")),
                Ok(Some(Err(error))) => return Err(format!("Websocket returned an error {error}")),
                Err(_) => return Err("Timed out waiting for a message.".to_string()),
            }
        }
    }

    pub async fn receive_json(&mut self) -> Result<Value, String> {
        let text = self.receive_text().await?;
        serde_json::from_str(&text)
            .map_err(|error| format!("Could not parse the message. Error: '{error}'."))
    }

    /// Skips events of other topics until one whose topic ends with `topic_suffix` arrives.
    pub async fn receive_event(&mut self, topic_suffix: &str) -> Result<Value, String> {
        loop {
            let message = self.receive_json().await?;
            match message["type"].as_str() {
                Some("event")
                    if message["topic"]
                        .as_str()
                        .is_some_and(|topic| topic.ends_with(topic_suffix)) =>
                {
                    return Ok(message["payload"].clone())
                }
                Some("event") => continue,
                Some("error") => return Err(error_type(&message)),
                _ => return Err(format!("Unexpected message {message}")),
            }
        }
    }

    /// Skips events until an error frame arrives and returns its type.
    pub async fn receive_error(&mut self) -> Result<String, String> {
        loop {
            let message = self.receive_json().await?;
            if message["type"] == "error" {
                return Ok(error_type(&message));
            }
        }
    }

    /// Waits for the server to close the connection.
    pub async fn receive_close(&mut self) -> Result<(), String> {
        loop {
            match timeout(RECEIVE_TIMEOUT, self.rx.next()).await {
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) => return Ok(()),
                Ok(Some(Ok(_))) => continue,
                Err(_) => return Err("The websocket was not closed in time.".to_string()),
            }
        }
    }

    pub async fn send_chat(&mut self, message: &str) {
        self.send_json(json!({ "type": "chat", "message": message }))
            .await;
    }

    pub async fn send_stroke(&mut self) {
        self.send_json(json!({
            "type": "draw",
            "fromX": 0.0,
            "fromY": 0.0,
            "toX": 10.0,
            "toY": 10.0,
            "color": "#ff0000",
            "lineWidth": 3.0,
        }))
        .await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.tx
            .send(Message::Text(text.to_string()))
            .await
            .expect("Could not send message");
    }

    async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }
}

fn error_type(message: &Value) -> String {
    message["error"]["type"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
