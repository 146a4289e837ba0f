use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::startup::AppState;

mod health;
mod metrics;
mod room;

pub fn create_router(config: &Config) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api/rooms", post(room::create))
        .route("/api/rooms/:room_code", get(room::get))
        .route("/api/rooms/:room_code/players", post(room::join))
        .route(
            "/api/rooms/:room_code/players/:player_id",
            delete(room::leave),
        )
        .route("/api/rooms/:room_code/start", post(room::start_game))
        .route(
            "/api/rooms/:room_code/players/:player_id/ws",
            get(room::connect_player_to_websocket),
        )
        .layer(if config.allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}
