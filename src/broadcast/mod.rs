use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Fire-and-forget delivery of payloads to the subscribers of a topic.
pub trait BroadcastSink: Send + Sync {
    fn publish(&self, topic: &str, payload: Value);
}

pub mod topic {
    pub fn room_prefix(room_code: &str) -> String {
        format!("rooms/{room_code}/")
    }

    pub fn state(room_code: &str) -> String {
        format!("rooms/{room_code}/state")
    }

    pub fn game(room_code: &str) -> String {
        format!("rooms/{room_code}/game")
    }

    pub fn chat(room_code: &str) -> String {
        format!("rooms/{room_code}/chat")
    }

    pub fn draw(room_code: &str) -> String {
        format!("rooms/{room_code}/draw")
    }
}

/// Serializes `payload` and hands it to the sink. Serialization failures are logged and dropped.
pub fn publish_json<T>(sink: &dyn BroadcastSink, topic: &str, payload: &T)
where
    T: ?Sized + Serialize,
{
    match serde_json::to_value(payload) {
        Ok(value) => sink.publish(topic, value),
        Err(error) => log::error!(
            "Could not serialize the payload for topic '{topic}'. Error: '{error}'."
        ),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Publication {
    pub topic: String,
    pub payload: Value,
}

/// Process-wide sink; every WebSocket connection subscribes and filters by its room's topics.
pub struct Broadcaster {
    broadcast_tx: broadcast::Sender<Publication>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(capacity);
        Broadcaster { broadcast_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Publication> {
        self.broadcast_tx.subscribe()
    }
}

impl BroadcastSink for Broadcaster {
    fn publish(&self, topic: &str, payload: Value) {
        // No subscribers is not an error, nobody is listening to this room yet.
        let _ = self.broadcast_tx.send(Publication {
            topic: topic.to_string(),
            payload,
        });
    }
}
