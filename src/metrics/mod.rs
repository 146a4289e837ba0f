use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_GAMES: IntGauge =
        IntGauge::new("sketchroom_active_games", "Games with a round in progress")
            .expect("metric cannot be created");
    pub static ref CONNECTED_PLAYERS: IntGauge =
        IntGauge::new("sketchroom_connected_players", "Amount of players connected")
            .expect("metric cannot be created");
    pub static ref ROUND_TIMEOUTS: IntCounter =
        IntCounter::new("sketchroom_round_timeouts", "Rounds that ended by timing out")
            .expect("metric cannot be created");
    pub static ref CORRECT_GUESSES: IntCounter =
        IntCounter::new("sketchroom_correct_guesses", "Guesses that matched the secret word")
            .expect("metric cannot be created");
}

static REGISTER: Once = Once::new();

pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: [Box<dyn prometheus::core::Collector>; 4] = [
            Box::new(ACTIVE_GAMES.clone()),
            Box::new(CONNECTED_PLAYERS.clone()),
            Box::new(ROUND_TIMEOUTS.clone()),
            Box::new(CORRECT_GUESSES.clone()),
        ];
        for collector in collectors {
            if let Err(error) = REGISTRY.register(collector) {
                log::error!("Collector cannot be registered. Error: '{error}'.");
            }
        }
    });
}
