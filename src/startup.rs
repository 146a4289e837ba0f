use std::future::{Future, IntoFuture};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::broadcast::Broadcaster;
use crate::config::Config;
use crate::game::service::GameService;
use crate::game::session_store::MemorySessionStore;
use crate::metrics::register_metrics;
use crate::room::actor::RoomDirectoryActor;
use crate::room::actor_client::RoomDirectory;
use crate::room::service::RoomService;
use crate::routes;
use crate::timer::RoundTimer;
use crate::word::RandomWords;

const BROADCAST_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomService,
    pub directory: RoomDirectory,
    pub game: GameService,
    pub broadcaster: Arc<Broadcaster>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let directory = RoomDirectoryActor::spawn(config.room.clone());
        let broadcaster = Arc::new(Broadcaster::new(BROADCAST_CAPACITY));
        let game = GameService::new(
            config.game.clone(),
            directory.clone(),
            Arc::new(MemorySessionStore::new()),
            RoundTimer::new(),
            broadcaster.clone(),
            Arc::new(RandomWords::from_file(&config.game.words_file)),
        );

        AppState {
            rooms: RoomService::new(directory.clone(), game.clone()),
            directory,
            game,
            broadcaster,
            config,
        }
    }
}

pub fn create_web_server(
    config: Config,
    listener: TcpListener,
) -> impl Future<Output = io::Result<()>> {
    register_metrics();

    let router = routes::create_router(&config).with_state(AppState::new(config));

    match listener.local_addr() {
        Ok(address) => log::info!("Listening on {address}"),
        Err(error) => log::warn!("Could not read the listening address. Error: '{error}'."),
    }
    axum::serve(listener, router.into_make_service()).into_future()
}
