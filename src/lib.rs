pub mod broadcast;
pub mod config;
pub mod error;
pub mod game;
pub mod metrics;
pub mod room;
pub mod routes;
pub mod startup;
pub mod timer;
pub mod websocket;
pub mod word;
